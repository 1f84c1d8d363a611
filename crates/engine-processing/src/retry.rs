use connectors::sql::base::error::DbError;
use engine_core::retry::RetryDisposition;
use mysql_async::{DriverError, Error as MySqlError};

pub fn classify_db_error(err: &DbError) -> RetryDisposition {
    match err {
        DbError::MySql(mysql_err) => classify_mysql_error(mysql_err),
        DbError::Decode { .. } => RetryDisposition::Stop,
        DbError::InvalidIdentifier(_) => RetryDisposition::Stop,
        DbError::Closed => RetryDisposition::Stop,
    }
}

fn classify_mysql_error(err: &MySqlError) -> RetryDisposition {
    match err {
        MySqlError::Io(_) => RetryDisposition::Retry,
        MySqlError::Driver(driver_err) => classify_driver_error(driver_err),
        MySqlError::Server(server_err) => {
            if is_retryable_mysql_server_error(server_err.code, server_err.state.as_str()) {
                RetryDisposition::Retry
            } else {
                RetryDisposition::Stop
            }
        }
        _ => RetryDisposition::Stop,
    }
}

/// Only a broken connection is worth another attempt; the source reconnects
/// before the next query. Parameter and decoding errors are permanent.
fn classify_driver_error(err: &DriverError) -> RetryDisposition {
    match err {
        DriverError::ConnectionClosed
        | DriverError::PoolDisconnected
        | DriverError::PacketOutOfOrder
        | DriverError::UnexpectedPacket { .. } => RetryDisposition::Retry,
        _ => RetryDisposition::Stop,
    }
}

fn is_retryable_mysql_server_error(code: u16, state: &str) -> bool {
    // Transient server errors: lock wait timeout, deadlock, connection
    // refused/lost, too many connections, bad handshake.
    // See: https://dev.mysql.com/doc/mysql-errors/8.0/en/server-error-reference.html
    const RETRYABLE_CODES: [u16; 8] = [1205, 1213, 2002, 2003, 2006, 2013, 1040, 1042];
    if RETRYABLE_CODES.contains(&code) {
        return true;
    }

    matches!(state, "40001" | "HYT00" | "08S01")
}
