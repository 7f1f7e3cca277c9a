//! Diesel and pool error mapping for the order repository.

use tracing::debug;

use crate::domain::ports::OrderRepositoryError;

use super::pool::PoolError;

/// Map pool failures to a repository connection error.
pub fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    OrderRepositoryError::connection(message)
}

/// Map Diesel failures to repository errors.
///
/// Closed connections are reported as connection failures; everything else
/// is a query failure. Database messages are logged at `debug` and not
/// copied into the returned error.
pub fn map_diesel_error(error: diesel::result::Error, operation: &str) -> OrderRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(%error, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            OrderRepositoryError::connection(format!("{operation}: database connection closed"))
        }
        DieselError::DeserializationError(_) => {
            OrderRepositoryError::query(format!("{operation}: row conversion failed"))
        }
        _ => OrderRepositoryError::query(format!("{operation}: database error")),
    }
}
