//! Utility functions.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Current UTC time as an RFC 3339 string.
pub fn rfc3339_now() -> String {
    let now = OffsetDateTime::now_utc();
    // Display fallback keeps the row writable if formatting ever fails.
    now.format(&Rfc3339).unwrap_or_else(|_| now.to_string())
}

/// Wait for SIGINT or SIGTERM, for graceful server shutdown.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
