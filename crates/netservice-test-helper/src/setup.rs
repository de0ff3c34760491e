//! Test setup and initialization utilities.

use netservice_log::{LogConfig, LogFormat, LogLevel};
use once_cell::sync::Lazy;

/// Install a test-writer subscriber once per process.
///
/// `RUST_LOG` overrides the default `warn,netservice=debug` filter. If some
/// other subscriber is already installed, that one is kept.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let config = LogConfig {
            level: LogLevel::Warn,
            format: LogFormat::Pretty,
            source_location: true,
            directives: Some("netservice=debug,netservice_test_helper=trace".to_string()),
            test_writer: true,
            ..LogConfig::default()
        };
        netservice_log::init(config).ok();
    });

    Lazy::force(&INIT);
}

/// Async test case wrapper that logs start and elapsed time.
pub async fn async_test_case<F, Fut, R>(name: &str, test_fn: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    init_tracing();
    tracing::info!("Starting async test: {}", name);
    let start = std::time::Instant::now();

    let result = test_fn().await;

    tracing::info!("Async test {} completed in {:?}", name, start.elapsed());
    result
}
