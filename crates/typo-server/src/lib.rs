//! Shared startup code for the `typo-payments` server and the `typo-admin`
//! maintenance tool.

pub mod config;

/// Install the global `tracing` subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
