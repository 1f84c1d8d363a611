#![allow(dead_code)]

use connectors::sql::mysql::config::MySqlConfig;
use mysql_async::{Conn, prelude::*};
use std::env;

pub mod utils;

// Test database, overridable through the environment.
const TEST_MYSQL_HOST: &str = "127.0.0.1";
const TEST_MYSQL_PORT: u16 = 4000;
const TEST_MYSQL_USER: &str = "root";
const TEST_MYSQL_DB: &str = "test";

pub const TEST_TABLE: &str = "tailpoll_it";

fn mysql_config() -> MySqlConfig {
    MySqlConfig {
        host: env::var("TAILPOLL_TEST_HOST").unwrap_or_else(|_| TEST_MYSQL_HOST.to_string()),
        port: env::var("TAILPOLL_TEST_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(TEST_MYSQL_PORT),
        user: env::var("TAILPOLL_TEST_USER").unwrap_or_else(|_| TEST_MYSQL_USER.to_string()),
        password: env::var("TAILPOLL_TEST_PASSWORD").unwrap_or_default(),
        db: env::var("TAILPOLL_TEST_DB").unwrap_or_else(|_| TEST_MYSQL_DB.to_string()),
        tls: false,
    }
}

/// Drop & recreate the polled table so it's empty.
async fn reset_test_table(conn: &mut Conn) {
    conn.query_drop(format!("DROP TABLE IF EXISTS {TEST_TABLE}"))
        .await
        .expect("drop test table");
    conn.query_drop(format!(
        "CREATE TABLE {TEST_TABLE} (
            id INT NOT NULL AUTO_INCREMENT,
            content JSON NOT NULL,
            PRIMARY KEY (id)
        )"
    ))
    .await
    .expect("create test table");
}

/// Inserts one row per payload; the server assigns ids in insertion order.
async fn insert_contents(conn: &mut Conn, contents: &[&str]) {
    for content in contents {
        conn.exec_drop(
            format!("INSERT INTO {TEST_TABLE} (content) VALUES (?)"),
            (content.to_string(),),
        )
        .await
        .expect("insert row");
    }
}
