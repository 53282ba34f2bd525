use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_defaults() {
        let matches = commands::new().get_matches_from(vec!["causerie"]);
        let Action::Server { port, dsn } = handler(&matches).expect("action");
        assert_eq!(port, 8080);
        assert_eq!(dsn, "sqlite://causerie.db");
    }

    #[test]
    fn test_handler_overrides() {
        let matches = commands::new().get_matches_from(vec![
            "causerie",
            "--port",
            "9000",
            "--dsn",
            "sqlite:///tmp/chat.db",
        ]);
        let Action::Server { port, dsn } = handler(&matches).expect("action");
        assert_eq!(port, 9000);
        assert_eq!(dsn, "sqlite:///tmp/chat.db");
    }
}
