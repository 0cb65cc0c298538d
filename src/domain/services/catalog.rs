//! Built-in trigger, condition-field, operator and action catalogs.
//!
//! These tables are immutable; tenant custom fields are layered on top by
//! [`VocabularyBuilder`](super::vocabulary::VocabularyBuilder).

use crate::domain::entities::{FieldType, RuleType};
use crate::domain::services::operators::{operators_for_type, Operator, ValueEditor};
use serde::Serialize;
use std::collections::BTreeMap;

pub const TICKET_STATUSES: &[&str] = &["open", "pending", "resolved", "closed"];
pub const TICKET_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];
pub const TICKET_CHANNELS: &[&str] = &["email", "chat", "phone", "web"];

/// Action key whose value must be an agent email address
pub const ASSIGN_TO_ACTION: &str = "assign_to";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOption {
    pub key: String,
    pub label: String,
}

impl TriggerOption {
    fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// A selectable condition field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    /// Key stored in `Condition.field`
    pub value: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_field_id: Option<String>,
}

impl FieldOption {
    fn builtin(value: &str, label: &str, field_type: FieldType, options: &[&str]) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            field_type,
            options: options.iter().map(|o| o.to_string()).collect(),
            custom_field_id: None,
        }
    }
}

/// A selectable action type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOption {
    /// Key stored in `Action.type`
    pub value: String,
    pub label: String,
    pub editor: ValueEditor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_field_id: Option<String>,
}

impl ActionOption {
    fn builtin(value: &str, label: &str, editor: ValueEditor) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            editor,
            custom_field_id: None,
        }
    }
}

/// The static half of the vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub triggers: BTreeMap<RuleType, Vec<TriggerOption>>,
    pub condition_fields: Vec<FieldOption>,
    pub operators: BTreeMap<String, Vec<Operator>>,
    pub action_types: Vec<ActionOption>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let condition_fields = builtin_condition_fields();
        Self {
            triggers: builtin_triggers(),
            operators: builtin_operators(&condition_fields),
            condition_fields,
            action_types: builtin_action_types(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_triggers() -> BTreeMap<RuleType, Vec<TriggerOption>> {
    BTreeMap::from([
        (
            RuleType::TicketCreation,
            vec![TriggerOption::new("ticket_created", "Ticket is created")],
        ),
        (
            RuleType::TicketUpdate,
            vec![
                TriggerOption::new("ticket_updated", "Ticket is updated"),
                TriggerOption::new("status_changed", "Status changed"),
                TriggerOption::new("priority_changed", "Priority changed"),
                TriggerOption::new("assignee_changed", "Assignee changed"),
                TriggerOption::new("customer_replied", "Customer replied"),
                TriggerOption::new("agent_replied", "Agent replied"),
            ],
        ),
        (
            RuleType::TimeTrigger,
            vec![
                TriggerOption::new("hours_since_created", "Hours since created"),
                TriggerOption::new("hours_since_updated", "Hours since updated"),
                TriggerOption::new("hours_since_pending", "Hours since pending"),
                TriggerOption::new("hours_since_resolved", "Hours since resolved"),
            ],
        ),
    ])
}

fn builtin_condition_fields() -> Vec<FieldOption> {
    vec![
        FieldOption::builtin("subject", "Subject", FieldType::Text, &[]),
        FieldOption::builtin("description", "Description", FieldType::Textarea, &[]),
        FieldOption::builtin("status", "Status", FieldType::Dropdown, TICKET_STATUSES),
        FieldOption::builtin("priority", "Priority", FieldType::Dropdown, TICKET_PRIORITIES),
        FieldOption::builtin("channel", "Channel", FieldType::Dropdown, TICKET_CHANNELS),
        FieldOption::builtin("assignee", "Assignee", FieldType::Text, &[]),
        FieldOption::builtin("customer_email", "Customer email", FieldType::Text, &[]),
        FieldOption::builtin("tags", "Tags", FieldType::Multiselect, &[]),
        FieldOption::builtin("created_at", "Created at", FieldType::Date, &[]),
    ]
}

/// Fields whose operators differ from their type's table
const OPERATOR_OVERRIDES: &[(&str, &[Operator])] = &[(
    "assignee",
    &[Operator::Is, Operator::IsNot, Operator::IsSet, Operator::IsNotSet],
)];

fn builtin_operators(fields: &[FieldOption]) -> BTreeMap<String, Vec<Operator>> {
    fields
        .iter()
        .map(|field| {
            let operators = OPERATOR_OVERRIDES
                .iter()
                .find(|(key, _)| *key == field.value)
                .map(|(_, ops)| *ops)
                .unwrap_or_else(|| operators_for_type(&field.field_type));
            (field.value.clone(), operators.to_vec())
        })
        .collect()
}

fn builtin_action_types() -> Vec<ActionOption> {
    let select = |values: &[&str]| ValueEditor::Select {
        options: values.iter().map(|v| v.to_string()).collect(),
    };

    vec![
        ActionOption::builtin(ASSIGN_TO_ACTION, "Assign to agent", ValueEditor::Text),
        ActionOption::builtin("assign_team", "Assign to team", ValueEditor::Text),
        ActionOption::builtin("set_status", "Set status", select(TICKET_STATUSES)),
        ActionOption::builtin("set_priority", "Set priority", select(TICKET_PRIORITIES)),
        ActionOption::builtin("add_tag", "Add tag", ValueEditor::Text),
        ActionOption::builtin("remove_tag", "Remove tag", ValueEditor::Text),
        ActionOption::builtin(
            "send_email_to_customer",
            "Send email to customer",
            ValueEditor::Textarea,
        ),
        ActionOption::builtin("add_internal_note", "Add internal note", ValueEditor::Textarea),
        ActionOption::builtin("close_ticket", "Close ticket", ValueEditor::None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_type_has_triggers() {
        let catalog = Catalog::builtin();
        for rule_type in RuleType::ALL {
            let triggers = catalog.triggers.get(&rule_type).unwrap();
            assert!(!triggers.is_empty(), "{} has no triggers", rule_type);
        }
    }

    #[test]
    fn test_every_builtin_field_has_operators() {
        let catalog = Catalog::builtin();
        for field in &catalog.condition_fields {
            let ops = catalog.operators.get(&field.value).unwrap();
            assert!(!ops.is_empty(), "{} has no operators", field.value);
        }
        assert_eq!(catalog.operators.len(), catalog.condition_fields.len());
    }

    #[test]
    fn test_builtin_operators_follow_field_type() {
        let catalog = Catalog::builtin();
        for field in &catalog.condition_fields {
            let ops = &catalog.operators[&field.value];
            if field.value == "assignee" {
                continue;
            }
            assert_eq!(
                ops.as_slice(),
                operators_for_type(&field.field_type),
                "{} ({})",
                field.value,
                field.field_type
            );
        }
    }

    #[test]
    fn test_assignee_keeps_set_checks() {
        use Operator::*;
        let catalog = Catalog::builtin();
        assert_eq!(catalog.operators["assignee"], vec![Is, IsNot, IsSet, IsNotSet]);
        assert!(catalog.operators["status"].contains(&IsEmpty));
        assert_eq!(
            catalog.operators["created_at"],
            vec![Is, IsBefore, IsAfter, IsEmpty, IsNotEmpty]
        );
    }

    #[test]
    fn test_builtin_keys_are_unique() {
        let catalog = Catalog::builtin();
        let mut fields: Vec<_> = catalog.condition_fields.iter().map(|f| &f.value).collect();
        fields.sort();
        fields.dedup();
        assert_eq!(fields.len(), catalog.condition_fields.len());

        let mut actions: Vec<_> = catalog.action_types.iter().map(|a| &a.value).collect();
        actions.sort();
        actions.dedup();
        assert_eq!(actions.len(), catalog.action_types.len());
    }

    #[test]
    fn test_priority_changed_is_an_update_trigger() {
        let catalog = Catalog::builtin();
        let update = &catalog.triggers[&RuleType::TicketUpdate];
        assert!(update.iter().any(|t| t.key == "priority_changed"));
        assert_eq!(catalog.triggers[&RuleType::TicketCreation][0].key, "ticket_created");
    }
}
