use crate::domain::entities::{
    AutomationRule, CreateAutomationRuleRequest, CustomFieldDefinition,
    UpdateAutomationRuleRequest,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{AutomationRepository, CustomFieldRepository};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Client for the helpdesk REST API.
///
/// No timeout is set: a request settles only when the server answers or the
/// connection fails.
#[derive(Clone)]
pub struct HelpdeskApiClient {
    http_client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HelpdeskApiClient {
    pub fn new(base_url: &str, api_token: Option<String>) -> DomainResult<Self> {
        let http_client = Client::builder()
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let builder = self.http_client.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> DomainResult<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Helpdesk API request failed: {}", e);
            DomainError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.text().await {
            Ok(body) => error_message_from_body(&body),
            Err(_) => format!("HTTP {} error", status.as_u16()),
        };
        tracing::warn!("Helpdesk API returned {}: {}", status.as_u16(), message);
        Err(map_status(status, message))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> DomainResult<T> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| DomainError::Internal(format!("Invalid response body: {}", e)))
    }
}

/// Prefer the API's `{"error": ...}` / `{"message": ...}` text, else the raw body
fn error_message_from_body(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .or_else(|| value.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    from_json.unwrap_or_else(|| body.chars().take(MAX_ERROR_BODY_CHARS).collect())
}

fn map_status(status: StatusCode, message: String) -> DomainError {
    match status {
        StatusCode::NOT_FOUND => DomainError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            DomainError::ValidationError(message)
        }
        StatusCode::CONFLICT => DomainError::Conflict(message),
        StatusCode::FORBIDDEN => DomainError::Forbidden(message),
        _ => DomainError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait::async_trait]
impl AutomationRepository for HelpdeskApiClient {
    async fn list_automation_rules(&self) -> DomainResult<Vec<AutomationRule>> {
        self.send_json(self.request(Method::GET, "/api/automation-rules"))
            .await
    }

    async fn create_automation_rule(
        &self,
        request: &CreateAutomationRuleRequest,
    ) -> DomainResult<AutomationRule> {
        self.send_json(
            self.request(Method::POST, "/api/automation-rules")
                .json(request),
        )
        .await
    }

    async fn update_automation_rule(
        &self,
        id: &str,
        request: &UpdateAutomationRuleRequest,
    ) -> DomainResult<AutomationRule> {
        let path = format!("/api/automation-rules/{}", id);
        self.send_json(self.request(Method::PATCH, &path).json(request))
            .await
    }

    async fn delete_automation_rule(&self, id: &str) -> DomainResult<()> {
        let path = format!("/api/automation-rules/{}", id);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CustomFieldRepository for HelpdeskApiClient {
    async fn list_custom_fields(
        &self,
        entity_type: &str,
    ) -> DomainResult<Vec<CustomFieldDefinition>> {
        self.send_json(
            self.request(Method::GET, "/api/custom-fields")
                .query(&[("entityType", entity_type)]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = HelpdeskApiClient::new("http://helpdesk.local/", None).unwrap();
        assert_eq!(client.base_url(), "http://helpdesk.local");
    }

    #[test]
    fn test_error_message_prefers_json_error_field() {
        assert_eq!(
            error_message_from_body(r#"{"error": "Rule not found"}"#),
            "Rule not found"
        );
        assert_eq!(
            error_message_from_body(r#"{"message": "Name taken"}"#),
            "Name taken"
        );
    }

    #[test]
    fn test_error_message_truncates_raw_body() {
        let body = "x".repeat(2000);
        assert_eq!(error_message_from_body(&body).len(), MAX_ERROR_BODY_CHARS);
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, "gone".into()),
            DomainError::NotFound(_)
        ));
        assert!(matches!(
            map_status(StatusCode::UNPROCESSABLE_ENTITY, "bad".into()),
            DomainError::ValidationError(_)
        ));
        assert_eq!(
            map_status(StatusCode::BAD_GATEWAY, "down".into()),
            DomainError::Upstream {
                status: 502,
                message: "down".to_string()
            }
        );
    }
}
