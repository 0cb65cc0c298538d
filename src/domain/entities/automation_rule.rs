use serde::{Deserialize, Deserializer, Serialize};

/// Automation rule as stored by the helpdesk API.
///
/// The console never evaluates rules; `execution_count` is maintained by the
/// external engine and only displayed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRule {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` when the server sent no rule type or one this console does not know
    #[serde(
        default,
        deserialize_with = "lenient_rule_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub rule_type: Option<RuleType>,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub condition_match: ConditionMatch,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub execution_count: u64,
}

/// Rule category, which also selects the trigger catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    TicketCreation,
    TicketUpdate,
    TimeTrigger,
}

impl RuleType {
    /// Fixed display order of rule types
    pub const ALL: [RuleType; 3] = [
        RuleType::TicketCreation,
        RuleType::TicketUpdate,
        RuleType::TimeTrigger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::TicketCreation => "ticket_creation",
            RuleType::TicketUpdate => "ticket_update",
            RuleType::TimeTrigger => "time_trigger",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RuleType::TicketCreation => "Ticket Creation",
            RuleType::TicketUpdate => "Ticket Update",
            RuleType::TimeTrigger => "Time Trigger",
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ticket_creation" => Ok(RuleType::TicketCreation),
            "ticket_update" => Ok(RuleType::TicketUpdate),
            "time_trigger" => Ok(RuleType::TimeTrigger),
            _ => Err(format!("Invalid rule type: {}", s)),
        }
    }
}

fn lenient_rule_type<'de, D>(deserializer: D) -> Result<Option<RuleType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// How the conditions of a rule combine
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConditionMatch {
    #[default]
    All,
    Any,
}

/// A single `field operator value` row.
///
/// `field` is a built-in field key or `cf_<customFieldId>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.map(str::to_string),
        }
    }
}

/// A single action row; `action_type` is built-in or `set_cf_<customFieldId>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Action {
    pub fn new(action_type: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            action_type: action_type.into(),
            value: value.map(str::to_string),
        }
    }
}

/// Body of `POST /api/automation-rules`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAutomationRuleRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rule_type: RuleType,
    pub trigger: String,
    pub condition_match: ConditionMatch,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
}

/// Body of `PATCH /api/automation-rules/:id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAutomationRuleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateAutomationRuleRequest {
    pub fn set_active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_type_serialization() {
        let rule_type = RuleType::TicketUpdate;
        let json = serde_json::to_string(&rule_type).unwrap();
        assert_eq!(json, "\"ticket_update\"");

        let deserialized: RuleType = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, RuleType::TicketUpdate);
    }

    #[test]
    fn test_rule_type_from_str_rejects_unknown() {
        assert_eq!("time_trigger".parse::<RuleType>(), Ok(RuleType::TimeTrigger));
        assert!("sla_breach".parse::<RuleType>().is_err());
    }

    #[test]
    fn test_rule_deserialization_from_api() {
        let rule: AutomationRule = serde_json::from_value(json!({
            "id": "r1",
            "name": "Escalate urgent",
            "ruleType": "ticket_update",
            "trigger": "priority_changed",
            "conditionMatch": "all",
            "conditions": [{"field": "priority", "operator": "is", "value": "urgent"}],
            "actions": [{"type": "assign_to", "value": "agent@x.com"}],
            "isActive": true,
            "executionCount": 12
        }))
        .unwrap();

        assert_eq!(rule.rule_type, Some(RuleType::TicketUpdate));
        assert_eq!(rule.conditions.len(), 1);
        assert_eq!(rule.actions[0].action_type, "assign_to");
        assert_eq!(rule.execution_count, 12);
    }

    #[test]
    fn test_unknown_or_missing_rule_type_is_lenient() {
        let unknown: AutomationRule = serde_json::from_value(json!({
            "id": "r2",
            "name": "Legacy",
            "ruleType": "sla_breach"
        }))
        .unwrap();
        assert_eq!(unknown.rule_type, None);

        let missing: AutomationRule = serde_json::from_value(json!({
            "id": "r3",
            "name": "Older",
            "ruleType": null
        }))
        .unwrap();
        assert_eq!(missing.rule_type, None);
        assert_eq!(missing.condition_match, ConditionMatch::All);
        assert!(missing.actions.is_empty());
    }

    #[test]
    fn test_presence_condition_omits_value() {
        let condition = Condition::new("assignee", "is_not_set", None);
        let json = serde_json::to_value(&condition).unwrap();
        assert_eq!(json, json!({"field": "assignee", "operator": "is_not_set"}));
    }

    #[test]
    fn test_create_request_wire_shape() {
        let request = CreateAutomationRuleRequest {
            name: "Escalate urgent".to_string(),
            description: None,
            rule_type: RuleType::TicketUpdate,
            trigger: "priority_changed".to_string(),
            condition_match: ConditionMatch::Any,
            conditions: vec![],
            actions: vec![Action::new("close_ticket", None)],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ruleType"], json!("ticket_update"));
        assert_eq!(json["conditionMatch"], json!("any"));
        assert_eq!(json["actions"], json!([{"type": "close_ticket"}]));
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_update_request_only_carries_active_flag() {
        let json = serde_json::to_value(UpdateAutomationRuleRequest::set_active(false)).unwrap();
        assert_eq!(json, json!({"isActive": false}));
    }
}
