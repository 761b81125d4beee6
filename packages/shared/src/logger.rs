//! Logger setup shared by every Tsudoi binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Without it, the binary itself, the server
/// library and `tower_http` log at `default_level`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    // A second initialization (e.g. from tests) is ignored.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

fn default_directives(bin_name: &str, level: &str) -> String {
    let crate_target = bin_name.replace('-', "_");
    let mut targets = vec![crate_target.as_str(), "tsudoi_server", "tower_http"];
    targets.dedup();
    targets
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        // テスト項目: バイナリ名のハイフンがターゲット名用にアンダースコアへ変換される
        // when (操作):
        let directives = default_directives("tsudoi-client", "debug");

        // then (期待する結果):
        assert_eq!(
            directives,
            "tsudoi_client=debug,tsudoi_server=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_default_directives_server_not_duplicated() {
        // テスト項目: サーバーバイナリではターゲットが重複しない
        // when (操作):
        let directives = default_directives("tsudoi-server", "info");

        // then (期待する結果):
        assert_eq!(directives, "tsudoi_server=info,tower_http=info");
    }

    #[test]
    fn test_setup_logger_twice_does_not_panic() {
        // テスト項目: ロガーを二回初期化してもパニックしない
        setup_logger("tsudoi-client", "info");
        setup_logger("tsudoi-client", "info");
    }
}
