use crate::domain::entities::{
    Action, AutomationRule, Condition, ConditionMatch, CreateAutomationRuleRequest, RuleType,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::catalog::ASSIGN_TO_ACTION;
use crate::domain::services::operators::{Operator, ValueEditor};
use crate::domain::services::vocabulary::{ActionRow, ConditionRow, Vocabulary};
use crate::shared::utils::validate_and_normalize_email;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// The rule being edited in an open form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rule_type: RuleType,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub condition_match: ConditionMatch,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl RuleDraft {
    /// Blank ticket-creation draft with one action row
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let rule_type = RuleType::TicketCreation;
        Self {
            name: String::new(),
            description: String::new(),
            rule_type,
            trigger: vocabulary
                .default_trigger(rule_type)
                .map(|t| t.key.clone())
                .unwrap_or_default(),
            condition_match: ConditionMatch::All,
            conditions: Vec::new(),
            actions: default_action(vocabulary).into_iter().collect(),
        }
    }
}

fn default_condition(vocabulary: &Vocabulary) -> Option<Condition> {
    vocabulary.condition_fields.first().map(|field| Condition {
        field: field.value.clone(),
        operator: vocabulary.default_operator(&field.value).as_str().to_string(),
        value: None,
    })
}

fn default_action(vocabulary: &Vocabulary) -> Option<Action> {
    vocabulary.action_types.first().map(|action| Action {
        action_type: action.value.clone(),
        value: None,
    })
}

/// Inline errors keyed by form path (`name`, `actions`, `conditions[0].value`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Closed,
    Editing,
    Submitting,
}

impl std::fmt::Display for FormPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormPhase::Closed => write!(f, "closed"),
            FormPhase::Editing => write!(f, "editing"),
            FormPhase::Submitting => write!(f, "submitting"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Rule has {} validation error(s)", .0.len())]
    Validation(ValidationErrors),
    #[error("Form is {actual}, expected {expected}")]
    InvalidState {
        expected: FormPhase,
        actual: FormPhase,
    },
    #[error("Unknown {kind} '{key}'")]
    UnknownKey { kind: &'static str, key: String },
    #[error("No {kind} row at index {index}")]
    RowOutOfRange { kind: &'static str, index: usize },
    #[error("Submission failed: {0}")]
    Submission(DomainError),
}

#[derive(Debug, Clone)]
struct FormSession {
    draft: RuleDraft,
    errors: ValidationErrors,
    /// Set by the first submit attempt; from then on every edit re-validates
    validated: bool,
}

impl FormSession {
    fn new(draft: RuleDraft) -> Self {
        Self {
            draft,
            errors: ValidationErrors::default(),
            validated: false,
        }
    }
}

#[derive(Debug, Clone)]
enum FormState {
    Closed,
    Editing(FormSession),
    Submitting(FormSession),
}

impl FormState {
    fn phase(&self) -> FormPhase {
        match self {
            FormState::Closed => FormPhase::Closed,
            FormState::Editing(_) => FormPhase::Editing,
            FormState::Submitting(_) => FormPhase::Submitting,
        }
    }
}

/// Create-rule form: `closed → editing → submitting → closed | editing`.
///
/// The form owns exactly one draft. Closing before submission drops it
/// without any server call; a failed submission returns to `editing` with the
/// draft intact.
#[derive(Debug, Clone)]
pub struct RuleForm {
    vocabulary: Arc<Vocabulary>,
    state: FormState,
}

impl RuleForm {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            vocabulary,
            state: FormState::Closed,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.state.phase()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn draft(&self) -> Option<&RuleDraft> {
        match &self.state {
            FormState::Editing(session) | FormState::Submitting(session) => Some(&session.draft),
            FormState::Closed => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match &self.state {
            FormState::Editing(session) => Some(&session.errors),
            _ => None,
        }
    }

    /// Swap in a recomputed vocabulary. The draft is kept as is; keys that no
    /// longer resolve are reported on the next validation.
    pub fn set_vocabulary(&mut self, vocabulary: Arc<Vocabulary>) {
        self.vocabulary = vocabulary;
        if let FormState::Editing(session) = &mut self.state {
            if session.validated {
                session.errors = validate_draft(&session.draft, &self.vocabulary);
            }
        }
    }

    pub fn open(&mut self) -> Result<(), FormError> {
        let draft = RuleDraft::new(&self.vocabulary);
        self.open_with(draft)
    }

    pub fn open_with(&mut self, draft: RuleDraft) -> Result<(), FormError> {
        if !matches!(self.state, FormState::Closed) {
            return Err(FormError::InvalidState {
                expected: FormPhase::Closed,
                actual: self.phase(),
            });
        }
        self.state = FormState::Editing(FormSession::new(draft));
        Ok(())
    }

    /// Discard the draft. Not allowed while a submission is in flight.
    pub fn cancel(&mut self) -> Result<(), FormError> {
        match self.state {
            FormState::Submitting(_) => Err(FormError::InvalidState {
                expected: FormPhase::Editing,
                actual: FormPhase::Submitting,
            }),
            _ => {
                self.state = FormState::Closed;
                Ok(())
            }
        }
    }

    fn edit<F>(&mut self, apply: F) -> Result<(), FormError>
    where
        F: FnOnce(&mut RuleDraft, &Vocabulary) -> Result<(), FormError>,
    {
        let vocabulary = &self.vocabulary;
        match &mut self.state {
            FormState::Editing(session) => {
                apply(&mut session.draft, vocabulary)?;
                if session.validated {
                    session.errors = validate_draft(&session.draft, vocabulary);
                }
                Ok(())
            }
            other => Err(FormError::InvalidState {
                expected: FormPhase::Editing,
                actual: other.phase(),
            }),
        }
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), FormError> {
        self.edit(|draft, _| {
            draft.name = name.to_string();
            Ok(())
        })
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), FormError> {
        self.edit(|draft, _| {
            draft.description = description.to_string();
            Ok(())
        })
    }

    /// Changing the rule type resets the trigger to that type's first entry
    pub fn select_rule_type(&mut self, rule_type: RuleType) -> Result<(), FormError> {
        self.edit(|draft, vocabulary| {
            draft.rule_type = rule_type;
            draft.trigger = vocabulary
                .default_trigger(rule_type)
                .map(|t| t.key.clone())
                .unwrap_or_default();
            Ok(())
        })
    }

    pub fn set_trigger(&mut self, trigger: &str) -> Result<(), FormError> {
        self.edit(|draft, vocabulary| {
            if !vocabulary.has_trigger(draft.rule_type, trigger) {
                return Err(FormError::UnknownKey {
                    kind: "trigger",
                    key: trigger.to_string(),
                });
            }
            draft.trigger = trigger.to_string();
            Ok(())
        })
    }

    pub fn set_condition_match(&mut self, condition_match: ConditionMatch) -> Result<(), FormError> {
        self.edit(|draft, _| {
            draft.condition_match = condition_match;
            Ok(())
        })
    }

    /// Append a condition on the first available field; returns its index
    pub fn add_condition(&mut self) -> Result<usize, FormError> {
        let mut index = 0;
        self.edit(|draft, vocabulary| {
            let condition = default_condition(vocabulary).ok_or(FormError::UnknownKey {
                kind: "field",
                key: String::new(),
            })?;
            draft.conditions.push(condition);
            index = draft.conditions.len() - 1;
            Ok(())
        })?;
        Ok(index)
    }

    pub fn remove_condition(&mut self, index: usize) -> Result<(), FormError> {
        self.edit(|draft, _| {
            check_row("condition", index, draft.conditions.len())?;
            draft.conditions.remove(index);
            Ok(())
        })
    }

    /// Changing the field resets the operator to the field's first operator
    /// and clears the value
    pub fn set_condition_field(&mut self, index: usize, field: &str) -> Result<(), FormError> {
        self.edit(|draft, vocabulary| {
            check_row("condition", index, draft.conditions.len())?;
            if vocabulary.field(field).is_none() {
                return Err(FormError::UnknownKey {
                    kind: "field",
                    key: field.to_string(),
                });
            }
            let condition = &mut draft.conditions[index];
            condition.field = field.to_string();
            condition.operator = vocabulary.default_operator(field).as_str().to_string();
            condition.value = None;
            Ok(())
        })
    }

    pub fn set_condition_operator(&mut self, index: usize, operator: &str) -> Result<(), FormError> {
        self.edit(|draft, vocabulary| {
            check_row("condition", index, draft.conditions.len())?;
            let condition = &mut draft.conditions[index];
            if !vocabulary.is_valid_operator(&condition.field, operator) {
                return Err(FormError::UnknownKey {
                    kind: "operator",
                    key: operator.to_string(),
                });
            }
            condition.operator = operator.to_string();
            if is_presence(operator) {
                condition.value = None;
            }
            Ok(())
        })
    }

    pub fn set_condition_value(&mut self, index: usize, value: &str) -> Result<(), FormError> {
        self.edit(|draft, _| {
            check_row("condition", index, draft.conditions.len())?;
            draft.conditions[index].value = Some(value.to_string());
            Ok(())
        })
    }

    /// Append an action of the first available type; returns its index
    pub fn add_action(&mut self) -> Result<usize, FormError> {
        let mut index = 0;
        self.edit(|draft, vocabulary| {
            let action = default_action(vocabulary).ok_or(FormError::UnknownKey {
                kind: "action type",
                key: String::new(),
            })?;
            draft.actions.push(action);
            index = draft.actions.len() - 1;
            Ok(())
        })?;
        Ok(index)
    }

    pub fn remove_action(&mut self, index: usize) -> Result<(), FormError> {
        self.edit(|draft, _| {
            check_row("action", index, draft.actions.len())?;
            draft.actions.remove(index);
            Ok(())
        })
    }

    pub fn set_action_type(&mut self, index: usize, action_type: &str) -> Result<(), FormError> {
        self.edit(|draft, vocabulary| {
            check_row("action", index, draft.actions.len())?;
            if vocabulary.action(action_type).is_none() {
                return Err(FormError::UnknownKey {
                    kind: "action type",
                    key: action_type.to_string(),
                });
            }
            let action = &mut draft.actions[index];
            action.action_type = action_type.to_string();
            action.value = None;
            Ok(())
        })
    }

    pub fn set_action_value(&mut self, index: usize, value: &str) -> Result<(), FormError> {
        self.edit(|draft, _| {
            check_row("action", index, draft.actions.len())?;
            draft.actions[index].value = Some(value.to_string());
            Ok(())
        })
    }

    pub fn condition_row(&self, index: usize) -> Result<ConditionRow, FormError> {
        let draft = self.draft().ok_or(FormError::InvalidState {
            expected: FormPhase::Editing,
            actual: FormPhase::Closed,
        })?;
        let condition = draft.conditions.get(index).ok_or(FormError::RowOutOfRange {
            kind: "condition",
            index,
        })?;
        Ok(self
            .vocabulary
            .resolve_condition(&condition.field, Some(&condition.operator)))
    }

    pub fn action_row(&self, index: usize) -> Result<ActionRow, FormError> {
        let draft = self.draft().ok_or(FormError::InvalidState {
            expected: FormPhase::Editing,
            actual: FormPhase::Closed,
        })?;
        let action = draft.actions.get(index).ok_or(FormError::RowOutOfRange {
            kind: "action",
            index,
        })?;
        Ok(self.vocabulary.resolve_action(&action.action_type))
    }

    /// Validate and move to `submitting`, yielding the payload to send.
    ///
    /// On validation failure the form stays in `editing` with inline errors
    /// and nothing is sent.
    pub fn begin_submit(&mut self) -> Result<CreateAutomationRuleRequest, FormError> {
        let mut session = match std::mem::replace(&mut self.state, FormState::Closed) {
            FormState::Editing(session) => session,
            other => {
                let actual = other.phase();
                self.state = other;
                return Err(FormError::InvalidState {
                    expected: FormPhase::Editing,
                    actual,
                });
            }
        };

        session.validated = true;
        session.errors = validate_draft(&session.draft, &self.vocabulary);
        if !session.errors.is_empty() {
            let errors = session.errors.clone();
            tracing::debug!("Rule form rejected with {} error(s)", errors.len());
            self.state = FormState::Editing(session);
            return Err(FormError::Validation(errors));
        }

        let request = build_request(&session.draft, &self.vocabulary);
        self.state = FormState::Submitting(session);
        Ok(request)
    }

    /// Settle an in-flight submission: success closes and resets the form,
    /// failure returns to `editing` keeping the draft for a retry.
    pub fn complete_submit(
        &mut self,
        result: DomainResult<AutomationRule>,
    ) -> Result<AutomationRule, FormError> {
        let session = match std::mem::replace(&mut self.state, FormState::Closed) {
            FormState::Submitting(session) => session,
            other => {
                let actual = other.phase();
                self.state = other;
                return Err(FormError::InvalidState {
                    expected: FormPhase::Submitting,
                    actual,
                });
            }
        };

        match result {
            Ok(rule) => Ok(rule),
            Err(e) => {
                tracing::warn!("Rule '{}' submission failed: {}", session.draft.name, e);
                self.state = FormState::Editing(session);
                Err(FormError::Submission(e))
            }
        }
    }
}

fn check_row(kind: &'static str, index: usize, len: usize) -> Result<(), FormError> {
    if index < len {
        Ok(())
    } else {
        Err(FormError::RowOutOfRange { kind, index })
    }
}

fn is_presence(operator: &str) -> bool {
    crate::domain::services::operators::is_presence_operator(operator)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Checks a value against the editor that produced it
fn check_value(editor: &ValueEditor, value: &str) -> Result<(), String> {
    match editor {
        ValueEditor::Number => value
            .parse::<i64>()
            .map(|_| ())
            .map_err(|_| "Must be a whole number".to_string()),
        ValueEditor::Decimal => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|_| ())
            .ok_or_else(|| "Must be a number".to_string()),
        ValueEditor::Checkbox => match value {
            "true" | "false" => Ok(()),
            _ => Err("Must be true or false".to_string()),
        },
        ValueEditor::Select { options } if !options.is_empty() => {
            if options.iter().any(|o| o == value) {
                Ok(())
            } else {
                Err(format!("Must be one of: {}", options.join(", ")))
            }
        }
        // Multiselect values are comma-separated
        ValueEditor::MultiSelect { options } if !options.is_empty() => {
            let mut items = value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .peekable();
            if items.peek().is_none() {
                return Err("Select at least one option".to_string());
            }
            match items.find(|item| !options.iter().any(|o| o.as_str() == *item)) {
                Some(_) => Err(format!("Each value must be one of: {}", options.join(", "))),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

/// Client-side validation of a draft against a vocabulary
pub fn validate_draft(draft: &RuleDraft, vocabulary: &Vocabulary) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let name_len = draft.name.trim().chars().count();
    if name_len < NAME_MIN_CHARS {
        errors.insert("name", format!("Name must be at least {} characters", NAME_MIN_CHARS));
    } else if name_len > NAME_MAX_CHARS {
        errors.insert("name", format!("Name must be at most {} characters", NAME_MAX_CHARS));
    }

    if draft.description.trim().chars().count() > DESCRIPTION_MAX_CHARS {
        errors.insert(
            "description",
            format!("Description must be at most {} characters", DESCRIPTION_MAX_CHARS),
        );
    }

    if !vocabulary.has_trigger(draft.rule_type, &draft.trigger) {
        errors.insert("trigger", "Select a trigger for this rule type");
    }

    for (i, condition) in draft.conditions.iter().enumerate() {
        let Some(field) = vocabulary.field(&condition.field) else {
            errors.insert(format!("conditions[{}].field", i), "Select a field");
            continue;
        };
        if !vocabulary.is_valid_operator(&condition.field, &condition.operator) {
            errors.insert(format!("conditions[{}].operator", i), "Select an operator");
            continue;
        }
        let row = vocabulary.resolve_condition(&field.value, Some(&condition.operator));
        if !row.editor.requires_value() {
            continue;
        }
        match non_blank(&condition.value) {
            None => errors.insert(format!("conditions[{}].value", i), "Value is required"),
            Some(value) => {
                if let Err(message) = check_value(&row.editor, value) {
                    errors.insert(format!("conditions[{}].value", i), message);
                }
            }
        }
    }

    if draft.actions.is_empty() {
        errors.insert("actions", "At least one action is required");
    }

    for (i, action) in draft.actions.iter().enumerate() {
        let Some(option) = vocabulary.action(&action.action_type) else {
            errors.insert(format!("actions[{}].type", i), "Select an action");
            continue;
        };
        if !option.editor.requires_value() {
            continue;
        }
        match non_blank(&action.value) {
            None => errors.insert(format!("actions[{}].value", i), "Value is required"),
            Some(value) if option.value == ASSIGN_TO_ACTION => {
                if let Err(DomainError::ValidationError(message)) =
                    validate_and_normalize_email(value)
                {
                    errors.insert(format!("actions[{}].value", i), message);
                }
            }
            Some(value) => {
                if let Err(message) = check_value(&option.editor, value) {
                    errors.insert(format!("actions[{}].value", i), message);
                }
            }
        }
    }

    errors
}

/// Payload for a draft that passed validation. Values of presence operators
/// and value-less actions are dropped.
fn build_request(draft: &RuleDraft, vocabulary: &Vocabulary) -> CreateAutomationRuleRequest {
    let description = draft.description.trim();

    let conditions = draft
        .conditions
        .iter()
        .map(|condition| {
            let presence = condition
                .operator
                .parse::<Operator>()
                .map(|op| op.is_presence_check())
                .unwrap_or(false);
            Condition {
                field: condition.field.clone(),
                operator: condition.operator.clone(),
                value: if presence {
                    None
                } else {
                    non_blank(&condition.value).map(str::to_string)
                },
            }
        })
        .collect();

    let actions = draft
        .actions
        .iter()
        .map(|action| {
            let takes_value = vocabulary
                .action(&action.action_type)
                .map(|a| a.editor.requires_value())
                .unwrap_or(true);
            let value = if takes_value {
                non_blank(&action.value).map(|v| {
                    if action.action_type == ASSIGN_TO_ACTION {
                        validate_and_normalize_email(v).unwrap_or_else(|_| v.to_string())
                    } else {
                        v.to_string()
                    }
                })
            } else {
                None
            };
            Action {
                action_type: action.action_type.clone(),
                value,
            }
        })
        .collect();

    CreateAutomationRuleRequest {
        name: draft.name.trim().to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        rule_type: draft.rule_type,
        trigger: draft.trigger.clone(),
        condition_match: draft.condition_match,
        conditions,
        actions,
    }
}
