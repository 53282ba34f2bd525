use crate::api::new;
use crate::cli::actions::Action;
use anyhow::Result;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, dsn } => {
            // Fail fast on an unparseable DSN before touching the database
            let dsn = Url::parse(&dsn)?;

            new(port, dsn.to_string()).await?;
        }
    }

    Ok(())
}
