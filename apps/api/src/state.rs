use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// The engine is pure, so nothing here is mutable or pooled.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
