use std::sync::Arc;

use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::storage::Storage;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub storage: Storage,
    /// Signs flash cookies.
    pub cookie_key: Key,
}
