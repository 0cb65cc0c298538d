use crate::domain::entities::{CustomFieldDefinition, RuleType};
use crate::domain::services::catalog::{ActionOption, Catalog, FieldOption, TriggerOption};
use crate::domain::services::operators::{
    editor_for_operator, editor_for_type, operators_for_type, Operator, ValueEditor,
    FALLBACK_OPERATORS,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Everything the rule builder can offer at one point in time:
/// built-in catalogs merged with the tenant's custom fields.
///
/// A `Vocabulary` is never edited; a custom-field change produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    pub triggers: BTreeMap<RuleType, Vec<TriggerOption>>,
    pub condition_fields: Vec<FieldOption>,
    pub operators: BTreeMap<String, Vec<Operator>>,
    pub action_types: Vec<ActionOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorOption {
    pub value: Operator,
    pub label: String,
}

impl From<Operator> for OperatorOption {
    fn from(op: Operator) -> Self {
        Self {
            value: op,
            label: op.label().to_string(),
        }
    }
}

/// Operators and value editor for one condition row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRow {
    pub field: String,
    pub operators: Vec<OperatorOption>,
    pub operator: Operator,
    pub editor: ValueEditor,
}

/// Value editor for one action row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRow {
    pub action_type: String,
    pub editor: ValueEditor,
}

impl Vocabulary {
    /// Vocabulary with no custom fields
    pub fn builtin() -> Self {
        VocabularyBuilder::new(&Catalog::builtin()).build()
    }

    pub fn triggers_for(&self, rule_type: RuleType) -> &[TriggerOption] {
        self.triggers
            .get(&rule_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First catalog entry, selected whenever the rule type changes
    pub fn default_trigger(&self, rule_type: RuleType) -> Option<&TriggerOption> {
        self.triggers_for(rule_type).first()
    }

    pub fn has_trigger(&self, rule_type: RuleType, key: &str) -> bool {
        self.triggers_for(rule_type).iter().any(|t| t.key == key)
    }

    pub fn trigger_label(&self, rule_type: RuleType, key: &str) -> Option<&str> {
        self.triggers_for(rule_type)
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.label.as_str())
    }

    pub fn field(&self, key: &str) -> Option<&FieldOption> {
        self.condition_fields.iter().find(|f| f.value == key)
    }

    pub fn action(&self, key: &str) -> Option<&ActionOption> {
        self.action_types.iter().find(|a| a.value == key)
    }

    /// Operators valid for a condition field key.
    ///
    /// Keys missing from the vocabulary get `{is, is_not}` rather than an error.
    pub fn operators_for(&self, field_key: &str) -> &[Operator] {
        match self.operators.get(field_key) {
            Some(ops) if !ops.is_empty() => ops.as_slice(),
            _ => FALLBACK_OPERATORS,
        }
    }

    /// First valid operator for a field, selected whenever the field changes
    pub fn default_operator(&self, field_key: &str) -> Operator {
        self.operators_for(field_key)
            .first()
            .copied()
            .unwrap_or(Operator::Is)
    }

    pub fn is_valid_operator(&self, field_key: &str, operator: &str) -> bool {
        operator
            .parse::<Operator>()
            .map(|op| self.operators_for(field_key).contains(&op))
            .unwrap_or(false)
    }

    /// Resolve the operator list and value editor for a condition row.
    ///
    /// An operator that is not valid for the field is replaced by the field's
    /// first operator.
    pub fn resolve_condition(&self, field_key: &str, operator: Option<&str>) -> ConditionRow {
        let operators = self.operators_for(field_key);
        let selected = operator
            .and_then(|raw| raw.parse::<Operator>().ok())
            .filter(|op| operators.contains(op))
            .unwrap_or_else(|| self.default_operator(field_key));

        let editor = match self.field(field_key) {
            Some(field) => editor_for_operator(&field.field_type, &field.options, Some(selected)),
            None if selected.is_presence_check() => ValueEditor::None,
            None => ValueEditor::Text,
        };

        ConditionRow {
            field: field_key.to_string(),
            operators: operators.iter().copied().map(OperatorOption::from).collect(),
            operator: selected,
            editor,
        }
    }

    /// Resolve the value editor for an action row; unknown types get a text input
    pub fn resolve_action(&self, action_key: &str) -> ActionRow {
        let editor = self
            .action(action_key)
            .map(|a| a.editor.clone())
            .unwrap_or(ValueEditor::Text);

        ActionRow {
            action_type: action_key.to_string(),
            editor,
        }
    }
}

/// Combines the immutable built-in catalog with the tenant's custom fields
pub struct VocabularyBuilder<'a> {
    catalog: &'a Catalog,
    custom_fields: Vec<CustomFieldDefinition>,
}

impl<'a> VocabularyBuilder<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            custom_fields: Vec::new(),
        }
    }

    pub fn with_custom_fields(mut self, fields: &[CustomFieldDefinition]) -> Self {
        self.custom_fields = fields.to_vec();
        self
    }

    /// Built-ins first, then one entry per selectable custom field in fetch order.
    /// Inactive and archived fields are skipped; repeated ids keep the first.
    pub fn build(&self) -> Vocabulary {
        let mut vocabulary = Vocabulary {
            triggers: self.catalog.triggers.clone(),
            condition_fields: self.catalog.condition_fields.clone(),
            operators: self.catalog.operators.clone(),
            action_types: self.catalog.action_types.clone(),
        };

        let mut seen = HashSet::new();
        for field in self.custom_fields.iter().filter(|f| f.is_selectable()) {
            if !seen.insert(field.id.as_str()) {
                tracing::warn!("Duplicate custom field id '{}' ignored", field.id);
                continue;
            }

            vocabulary
                .triggers
                .entry(RuleType::TicketUpdate)
                .or_default()
                .push(TriggerOption {
                    key: field.trigger_key(),
                    label: format!("{} changed", field.label),
                });

            vocabulary.condition_fields.push(FieldOption {
                value: field.condition_key(),
                label: field.label.clone(),
                field_type: field.field_type.clone(),
                options: field.options.clone(),
                custom_field_id: Some(field.id.clone()),
            });

            vocabulary.operators.insert(
                field.condition_key(),
                operators_for_type(&field.field_type).to_vec(),
            );

            vocabulary.action_types.push(ActionOption {
                value: field.action_key(),
                label: format!("Set {}", field.label),
                editor: editor_for_type(&field.field_type, &field.options),
                custom_field_id: Some(field.id.clone()),
            });
        }

        tracing::debug!(
            "Vocabulary built: {} condition fields, {} action types ({} custom fields)",
            vocabulary.condition_fields.len(),
            vocabulary.action_types.len(),
            seen.len()
        );

        vocabulary
    }
}
