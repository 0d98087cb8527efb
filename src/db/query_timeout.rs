// Database query timeout protection
use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

pub struct QueryTimeout;

impl QueryTimeout {
    /// Run a query future, failing with an I/O timeout error once
    /// `timeout_duration` elapses so slow queries cannot hold a request open.
    pub async fn execute_with_timeout<F, T>(
        query_fn: F,
        timeout_duration: Duration,
    ) -> Result<T, sqlx::Error>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match timeout(timeout_duration, query_fn).await {
            Ok(result) => result,
            Err(_) => Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("Query timed out after {:?}", timeout_duration),
            ))),
        }
    }

    /// Default timeout for listing queries (5 seconds)
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
}
