use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::RecipeStore;

#[derive(Clone)]
pub struct AppState {
    pub store: RecipeStore,
    pub config: Arc<AppConfig>,
}
