pub mod config;
pub mod handlers;
pub mod info;
pub mod middleware;
pub mod server;
pub mod stats;
pub mod store;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Builds the stats report; owns the store handle.
    pub info: info::InfoService,
}
