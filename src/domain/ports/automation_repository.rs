use crate::domain::entities::{
    AutomationRule, CreateAutomationRuleRequest, UpdateAutomationRuleRequest,
};
use crate::domain::errors::DomainResult;

/// Automation rules held by the helpdesk API
#[async_trait::async_trait]
pub trait AutomationRepository: Send + Sync {
    /// List all rules in server order
    async fn list_automation_rules(&self) -> DomainResult<Vec<AutomationRule>>;

    /// Create a rule from a validated payload
    async fn create_automation_rule(
        &self,
        request: &CreateAutomationRuleRequest,
    ) -> DomainResult<AutomationRule>;

    /// Partially update a rule; only the active flag is ever sent
    async fn update_automation_rule(
        &self,
        id: &str,
        request: &UpdateAutomationRuleRequest,
    ) -> DomainResult<AutomationRule>;

    /// Delete a rule
    async fn delete_automation_rule(&self, id: &str) -> DomainResult<()>;
}
