use crate::{
    domain::entities::RuleType,
    domain::services::catalog::TriggerOption,
    domain::services::vocabulary::{ActionRow, ConditionRow, Vocabulary},
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ConditionRowQuery {
    pub operator: Option<String>,
}

pub async fn get_vocabulary(State(state): State<AppState>) -> ApiResult<Json<Vocabulary>> {
    let vocabulary = state.automation_service.vocabulary().await?;
    Ok(Json(vocabulary.as_ref().clone()))
}

pub async fn get_triggers(
    State(state): State<AppState>,
    Path(rule_type): Path<String>,
) -> ApiResult<Json<Vec<TriggerOption>>> {
    let rule_type: RuleType = rule_type.parse().map_err(ApiError::BadRequest)?;
    let vocabulary = state.automation_service.vocabulary().await?;
    Ok(Json(vocabulary.triggers_for(rule_type).to_vec()))
}

/// Operators and value editor for a condition row's field (and chosen operator)
pub async fn get_condition_row(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Query(query): Query<ConditionRowQuery>,
) -> ApiResult<Json<ConditionRow>> {
    let vocabulary = state.automation_service.vocabulary().await?;
    Ok(Json(
        vocabulary.resolve_condition(&field, query.operator.as_deref()),
    ))
}

pub async fn get_action_row(
    State(state): State<AppState>,
    Path(action_type): Path<String>,
) -> ApiResult<Json<ActionRow>> {
    let vocabulary = state.automation_service.vocabulary().await?;
    Ok(Json(vocabulary.resolve_action(&action_type)))
}

/// Refetch custom fields and rebuild the vocabulary
pub async fn refresh_custom_fields(State(state): State<AppState>) -> ApiResult<Json<Vocabulary>> {
    let vocabulary = state.automation_service.refresh_vocabulary().await?;
    Ok(Json(vocabulary.as_ref().clone()))
}
