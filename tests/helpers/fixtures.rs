use helpdesk_console::application::services::{AutomationConfig, AutomationService, RuleDraft};
use helpdesk_console::domain::entities::{
    Action, AutomationRule, Condition, ConditionMatch, CustomFieldDefinition, FieldType, RuleType,
};
use helpdesk_console::domain::services::Catalog;
use std::sync::Arc;

use super::mock_repositories::{MockAutomationRepository, MockCustomFieldRepository};

pub fn priority_score_field() -> CustomFieldDefinition {
    CustomFieldDefinition::new("42", "Priority Score", FieldType::Number)
}

pub fn tier_field() -> CustomFieldDefinition {
    CustomFieldDefinition::new("7", "Customer Tier", FieldType::Dropdown)
        .with_options(["gold", "silver", "bronze"])
}

pub fn create_test_rule(id: &str, rule_type: RuleType, trigger: &str, is_active: bool) -> AutomationRule {
    AutomationRule {
        id: id.to_string(),
        name: format!("Rule {}", id),
        description: None,
        rule_type: Some(rule_type),
        trigger: trigger.to_string(),
        condition_match: ConditionMatch::All,
        conditions: vec![],
        actions: vec![Action::new("close_ticket", None)],
        is_active,
        execution_count: 0,
    }
}

/// The "Escalate urgent" draft used across scenarios
pub fn escalate_urgent_draft() -> RuleDraft {
    RuleDraft {
        name: "Escalate urgent".to_string(),
        description: String::new(),
        rule_type: RuleType::TicketUpdate,
        trigger: "priority_changed".to_string(),
        condition_match: ConditionMatch::All,
        conditions: vec![Condition::new("priority", "is", Some("urgent"))],
        actions: vec![Action::new("assign_to", Some("agent@x.com"))],
    }
}

pub struct TestConsole {
    pub service: AutomationService,
    pub rules: Arc<MockAutomationRepository>,
    pub custom_fields: Arc<MockCustomFieldRepository>,
}

pub fn setup_console(
    rules: Vec<AutomationRule>,
    custom_fields: Vec<CustomFieldDefinition>,
) -> TestConsole {
    let rules = Arc::new(MockAutomationRepository::with_rules(rules));
    let custom_fields = Arc::new(MockCustomFieldRepository::new(custom_fields));
    let service = AutomationService::new(
        rules.clone(),
        custom_fields.clone(),
        Arc::new(Catalog::builtin()),
        AutomationConfig::default(),
    );

    TestConsole {
        service,
        rules,
        custom_fields,
    }
}
