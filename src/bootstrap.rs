use crate::application::services::{AutomationConfig, AutomationService};
use crate::config::Config;
use crate::domain::errors::DomainResult;
use crate::domain::services::catalog::Catalog;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::providers::HelpdeskApiClient;
use std::sync::Arc;

/// Wire the helpdesk API client into the console service
pub fn build_app_state(config: &Config) -> DomainResult<AppState> {
    let client = Arc::new(HelpdeskApiClient::new(
        &config.helpdesk_api_url,
        config.helpdesk_api_token.clone(),
    )?);
    tracing::info!("Helpdesk API client targeting {}", client.base_url());

    let automation_service = AutomationService::new(
        client.clone(),
        client,
        Arc::new(Catalog::builtin()),
        AutomationConfig {
            custom_field_entity_type: config.custom_field_entity_type.clone(),
        },
    );

    Ok(AppState {
        automation_service: Arc::new(automation_service),
    })
}

/// Warm the vocabulary cache; failure is logged and retried on first use
pub async fn warm_vocabulary(state: &AppState) {
    match state.automation_service.refresh_vocabulary().await {
        Ok(vocabulary) => tracing::info!(
            "Vocabulary ready with {} condition fields",
            vocabulary.condition_fields.len()
        ),
        Err(e) => tracing::warn!("Could not load custom fields at startup: {}", e),
    }
}
