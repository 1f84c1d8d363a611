use crate::error::CliError;
use clap::Parser;
use connectors::sql::{base::table::TableRef, mysql::config::MySqlConfig};
use engine_core::{
    retry::RetryPolicy,
    settings::{DEFAULT_BATCH_LIMIT, DEFAULT_INTERVAL_SECS, PollSettings},
};

#[derive(Parser, Debug)]
#[command(
    name = "tailpoll",
    version,
    about = "Polls a table for new rows and prints their content, newest first"
)]
pub struct Cli {
    #[arg(long, env = "TAILPOLL_HOST", default_value = "localhost", help = "Database host")]
    pub host: String,

    #[arg(long, env = "TAILPOLL_PORT", default_value_t = 4000, help = "Database port")]
    pub port: u16,

    #[arg(long, env = "TAILPOLL_USER", default_value = "root", help = "Database user")]
    pub user: String,

    #[arg(
        long,
        env = "TAILPOLL_PASSWORD",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true,
        help = "Database password"
    )]
    pub password: String,

    #[arg(long, env = "TAILPOLL_DB", default_value = "test", help = "Database name")]
    pub db: String,

    #[arg(long, env = "TAILPOLL_TABLE", default_value = "recbot", help = "Table to poll")]
    pub table: String,

    #[arg(
        long,
        env = "TAILPOLL_ID_COLUMN",
        default_value = "id",
        help = "Auto-increment id column"
    )]
    pub id_column: String,

    #[arg(
        long,
        env = "TAILPOLL_CONTENT_COLUMN",
        default_value = "content",
        help = "Column whose content is printed"
    )]
    pub content_column: String,

    #[arg(
        long,
        env = "TAILPOLL_INTERVAL",
        default_value_t = DEFAULT_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Polling interval in seconds"
    )]
    pub interval: u64,

    #[arg(
        long,
        env = "TAILPOLL_SKIP_EXISTS",
        overrides_with = "no_skip_exists",
        help = "Skip the first batch, only poll for new rows"
    )]
    pub skip_exists: bool,

    #[arg(
        long = "no-skip-exists",
        overrides_with = "skip_exists",
        help = "Print the first batch (default)"
    )]
    pub no_skip_exists: bool,

    #[arg(
        long,
        env = "TAILPOLL_LIMIT",
        default_value_t = DEFAULT_BATCH_LIMIT as u64,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Maximum rows fetched per poll"
    )]
    pub limit: u64,

    #[arg(
        long,
        env = "TAILPOLL_START_AFTER",
        help = "Only consider rows with an id greater than this"
    )]
    pub start_after: Option<u64>,

    #[arg(long, env = "TAILPOLL_TLS", help = "Connect over TLS")]
    pub tls: bool,

    #[arg(
        long,
        env = "TAILPOLL_QUERY_RETRIES",
        default_value_t = 0,
        help = "Extra attempts for transient query errors"
    )]
    pub query_retries: usize,
}

impl Cli {
    pub fn mysql_config(&self) -> MySqlConfig {
        MySqlConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            db: self.db.clone(),
            tls: self.tls,
        }
    }

    pub fn table_ref(&self) -> Result<TableRef, CliError> {
        let table = TableRef::new(
            Some(self.db.as_str()),
            &self.table,
            &self.id_column,
            &self.content_column,
        )?;
        Ok(table)
    }

    pub fn poll_settings(&self) -> Result<PollSettings, CliError> {
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        let settings = PollSettings::new(self.interval, limit, self.skip_exists)?
            .with_start_after(self.start_after)
            .with_retry(RetryPolicy::for_database(self.query_retries));
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("tailpoll").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.host, "localhost");
        assert_eq!(cli.port, 4000);
        assert_eq!(cli.user, "root");
        assert_eq!(cli.password, "");
        assert_eq!(cli.db, "test");
        assert_eq!(cli.table, "recbot");

        let settings = cli.poll_settings().unwrap();
        assert_eq!(settings.interval, Duration::from_secs(1));
        assert_eq!(settings.limit, 100);
        assert!(!settings.skip_exists);
        assert!(!settings.retry.is_enabled());
    }

    #[test]
    fn test_skip_exists_flags() {
        assert!(parse(&["--skip-exists"]).unwrap().poll_settings().unwrap().skip_exists);
        assert!(
            !parse(&["--skip-exists", "--no-skip-exists"])
                .unwrap()
                .poll_settings()
                .unwrap()
                .skip_exists
        );
        assert!(
            parse(&["--no-skip-exists", "--skip-exists"])
                .unwrap()
                .poll_settings()
                .unwrap()
                .skip_exists
        );
    }

    #[test]
    fn test_interval_must_be_positive_integer() {
        assert!(parse(&["--interval", "0"]).is_err());
        assert!(parse(&["--interval", "-1"]).is_err());
        assert!(parse(&["--interval", "1.5"]).is_err());
        assert!(parse(&["--interval", "abc"]).is_err());

        let cli = parse(&["--interval", "5"]).unwrap();
        assert_eq!(
            cli.poll_settings().unwrap().interval,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_limit_must_be_positive() {
        assert!(parse(&["--limit", "0"]).is_err());
        assert_eq!(
            parse(&["--limit", "2"]).unwrap().poll_settings().unwrap().limit,
            2
        );
    }

    #[test]
    fn test_table_ref_is_qualified_by_db() {
        let cli = parse(&["--db", "prod", "--table", "events"]).unwrap();
        let table = cli.table_ref().unwrap();
        assert_eq!(table.schema.as_deref(), Some("prod"));
        assert_eq!(table.table, "events");
        assert_eq!(table.id_column, "id");
        assert_eq!(table.content_column, "content");
    }

    #[test]
    fn test_bad_table_name_rejected() {
        let cli = parse(&["--table", "recbot; DROP"]).unwrap();
        assert!(matches!(cli.table_ref(), Err(CliError::Table(_))));
    }

    #[test]
    fn test_connection_options() {
        let cli = parse(&[
            "--host",
            "gateway01.example.com",
            "--port",
            "3306",
            "--user",
            "reader",
            "--password",
            "pw",
            "--tls",
        ])
        .unwrap();

        let config = cli.mysql_config();
        assert_eq!(config.host, "gateway01.example.com");
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "reader");
        assert_eq!(config.password, "pw");
        assert!(config.tls);
    }

    #[test]
    fn test_retry_and_start_after() {
        let cli = parse(&["--query-retries", "3", "--start-after", "42"]).unwrap();
        let settings = cli.poll_settings().unwrap();
        assert_eq!(settings.retry.max_attempts, 4);
        assert_eq!(settings.start_after, Some(42));
    }
}
