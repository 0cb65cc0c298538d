use crate::application::services::AutomationService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub automation_service: Arc<AutomationService>,
}
