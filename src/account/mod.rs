pub mod hasher;
pub mod models;
pub mod policy;
pub mod repo;
pub mod service;

pub use models::{User, UserSummary};
pub use service::{AuthError, RegistrationError};
