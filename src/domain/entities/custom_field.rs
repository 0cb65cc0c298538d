use serde::{Deserialize, Serialize};

/// Declared type of a tenant-defined custom field.
///
/// The type alone decides which operators and value editor the rule builder
/// offers. Types this console does not know are kept verbatim in `Unknown`
/// so that a newer backend never breaks the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Decimal,
    Dropdown,
    Multiselect,
    Checkbox,
    Date,
    Unknown(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Decimal => "decimal",
            FieldType::Dropdown => "dropdown",
            FieldType::Multiselect => "multiselect",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Unknown(_))
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "number" => FieldType::Number,
            "decimal" => FieldType::Decimal,
            "dropdown" => FieldType::Dropdown,
            "multiselect" => FieldType::Multiselect,
            "checkbox" => FieldType::Checkbox,
            "date" => FieldType::Date,
            _ => FieldType::Unknown(raw),
        }
    }
}

impl From<&str> for FieldType {
    fn from(raw: &str) -> Self {
        FieldType::from(raw.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Custom field definition as returned by `GET /api/custom-fields`.
///
/// Administered elsewhere; the console only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldDefinition {
    pub id: String,
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

fn default_true() -> bool {
    true
}

impl CustomFieldDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            name: label.to_lowercase().replace(' ', "_"),
            label,
            field_type,
            options: Vec::new(),
            is_required: false,
            is_active: true,
            is_archived: false,
            placeholder: None,
            help_text: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the field may appear in the rule builder
    pub fn is_selectable(&self) -> bool {
        self.is_active && !self.is_archived
    }

    /// Condition field key, `cf_<id>`
    pub fn condition_key(&self) -> String {
        format!("{}{}", CUSTOM_FIELD_PREFIX, self.id)
    }

    /// Action type key, `set_cf_<id>`
    pub fn action_key(&self) -> String {
        format!("{}{}", SET_CUSTOM_FIELD_PREFIX, self.id)
    }

    /// Trigger key, `cf_<id>_changed`
    pub fn trigger_key(&self) -> String {
        format!("{}{}_changed", CUSTOM_FIELD_PREFIX, self.id)
    }
}

pub const CUSTOM_FIELD_PREFIX: &str = "cf_";
pub const SET_CUSTOM_FIELD_PREFIX: &str = "set_cf_";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_round_trips_known_values() {
        let parsed: FieldType = serde_json::from_value(json!("multiselect")).unwrap();
        assert_eq!(parsed, FieldType::Multiselect);
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json!("multiselect"));
    }

    #[test]
    fn test_unknown_field_type_is_preserved() {
        let parsed: FieldType = serde_json::from_value(json!("rating")).unwrap();
        assert_eq!(parsed, FieldType::Unknown("rating".to_string()));
        assert!(!parsed.is_known());
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json!("rating"));
    }

    #[test]
    fn test_custom_field_deserialization_defaults() {
        let field: CustomFieldDefinition = serde_json::from_value(json!({
            "id": "42",
            "name": "priority_score",
            "label": "Priority Score",
            "fieldType": "number"
        }))
        .unwrap();

        assert_eq!(field.field_type, FieldType::Number);
        assert!(field.options.is_empty());
        assert!(field.is_active);
        assert!(!field.is_archived);
        assert!(field.is_selectable());
    }

    #[test]
    fn test_custom_field_keys() {
        let field = CustomFieldDefinition::new("42", "Priority Score", FieldType::Number);
        assert_eq!(field.condition_key(), "cf_42");
        assert_eq!(field.action_key(), "set_cf_42");
        assert_eq!(field.trigger_key(), "cf_42_changed");
        assert_eq!(field.name, "priority_score");
    }

    #[test]
    fn test_archived_field_is_not_selectable() {
        let mut field = CustomFieldDefinition::new("7", "Region", FieldType::Dropdown);
        field.is_archived = true;
        assert!(!field.is_selectable());
    }
}
