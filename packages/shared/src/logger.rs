//! Logging setup utilities for Parley.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Directives for the server library crate and for the binary are both set to
/// `default_log_level`. The `RUST_LOG` environment variable takes precedence
/// when it is present.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "parley_server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use parley_shared::logger::setup_logger;
///
/// setup_logger("parley-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directives used when `RUST_LOG` is not set.
fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "parley_server={level},parley_shared={level},{bin}={level},tower_http={level}",
        level = default_log_level,
        bin = binary_name.replace('-', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_library_and_binary() {
        // テスト項目: デフォルトのフィルタにライブラリとバイナリの両方が含まれる
        // given (前提条件):
        let binary_name = "parley-server";

        // when (操作):
        let directives = default_directives(binary_name, "info");

        // then (期待する結果):
        assert!(directives.contains("parley_server=info"));
        assert!(directives.contains("parley_shared=info"));
        assert!(directives.contains("tower_http=info"));
    }
}
