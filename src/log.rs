use tracing_subscriber::{
    fmt::Layer, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Installs the global subscriber. Defaults to `info` when `RUST_LOG` is unset, and logs
/// flattened json events when `LOG_JSON=true`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_JSON")
        .map(|value| value == "true" || value == "1")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(Layer::default().json().flatten_event(true))
            .init();
    } else {
        registry.with(Layer::default().with_target(false)).init();
    }
}
