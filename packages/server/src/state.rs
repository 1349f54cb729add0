use std::sync::Arc;

use crate::advisor::SuggestionAdvisor;
use crate::config::AppConfig;
use crate::notify::Notifier;
use crate::store::DonorStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DonorStore>,
    pub notifier: Arc<dyn Notifier>,
    /// `None` when no advisor is configured.
    pub advisor: Option<Arc<dyn SuggestionAdvisor>>,
}
