use mysql_async::{Opts, OptsBuilder, SslOpts};

/// Statements run on every (re)connect. Reads must never sit inside a
/// long-lived snapshot, or new rows would stay invisible.
const INIT_STATEMENTS: [&str; 1] = ["SET autocommit=1"];

/// Connection parameters for a MySQL-compatible server.
#[derive(Clone)]
pub struct MySqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db: String,
    pub tls: bool,
}

impl MySqlConfig {
    pub fn opts(&self) -> Opts {
        let ssl_opts = self.tls.then(SslOpts::default);
        let password = (!self.password.is_empty()).then(|| self.password.clone());

        OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(password)
            .db_name(Some(self.db.clone()))
            .init(INIT_STATEMENTS.to_vec())
            .ssl_opts(ssl_opts)
            .into()
    }

    /// `user@host:port/db`, without the password.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.db)
    }
}

impl std::fmt::Debug for MySqlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("db", &self.db)
            .field("tls", &self.tls)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MySqlConfig {
        MySqlConfig {
            host: "localhost".into(),
            port: 4000,
            user: "root".into(),
            password: "secret".into(),
            db: "test".into(),
            tls: false,
        }
    }

    #[test]
    fn test_opts_from_config() {
        let opts = config().opts();
        assert_eq!(opts.ip_or_hostname(), "localhost");
        assert_eq!(opts.tcp_port(), 4000);
        assert_eq!(opts.user(), Some("root"));
        assert_eq!(opts.pass(), Some("secret"));
        assert_eq!(opts.db_name(), Some("test"));
        assert!(opts.ssl_opts().is_none());
    }

    #[test]
    fn test_empty_password_is_none() {
        let mut cfg = config();
        cfg.password.clear();
        assert_eq!(cfg.opts().pass(), None);
    }

    #[test]
    fn test_tls_enabled() {
        let mut cfg = config();
        cfg.tls = true;
        assert!(cfg.opts().ssl_opts().is_some());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret"));
        assert_eq!(config().display_target(), "root@localhost:4000/test");
    }
}
