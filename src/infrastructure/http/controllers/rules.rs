use crate::{
    application::services::{RuleDraft, RuleSummary, RuleSummaryEntry},
    domain::entities::AutomationRule,
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub is_active: bool,
}

pub async fn list_rules(State(state): State<AppState>) -> ApiResult<Json<RuleSummary>> {
    let summary = state.automation_service.rule_summary().await?;
    Ok(Json(summary))
}

/// Run a draft through the rule form and submit it.
///
/// Validation failures answer 422 without contacting the helpdesk API.
pub async fn create_rule(
    State(state): State<AppState>,
    Json(draft): Json<RuleDraft>,
) -> ApiResult<(StatusCode, Json<AutomationRule>)> {
    let mut form = state.automation_service.new_form().await?;
    form.open_with(draft)?;
    let rule = state.automation_service.submit_form(&mut form).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Answers with the refetched summary entry, i.e. the state the server confirmed
pub async fn set_rule_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetActiveRequest>,
) -> ApiResult<Json<RuleSummaryEntry>> {
    state
        .automation_service
        .set_rule_active(&id, request.is_active)
        .await?;

    let summary = state.automation_service.rule_summary().await?;
    let entry = summary
        .find(&id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Automation rule {}", id)))?;
    Ok(Json(entry))
}

pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.automation_service.delete_rule(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
