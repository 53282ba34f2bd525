pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

pub mod users;
pub use self::users::{delete_user, list_users};

pub mod messages;
pub use self::messages::{add_message, list_messages};

// common functions for the handlers
use regex::Regex;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("a@x.com"));
        assert!(valid_email("user.name@mail.example.org"));
        assert!(!valid_email("not-a-mail"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("a b@x.com"));
        assert!(!valid_email(""));
    }
}
