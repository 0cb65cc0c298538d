use crate::domain::entities::FieldType;
use serde::{Deserialize, Serialize};

/// Comparison operators offered by the rule builder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Is,
    IsNot,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    IsBefore,
    IsAfter,
    IsEmpty,
    IsNotEmpty,
    IsSet,
    IsNotSet,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Is => "is",
            Operator::IsNot => "is_not",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::IsBefore => "is_before",
            Operator::IsAfter => "is_after",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::IsSet => "is_set",
            Operator::IsNotSet => "is_not_set",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::Contains => "contains",
            Operator::NotContains => "does not contain",
            Operator::GreaterThan => "is greater than",
            Operator::LessThan => "is less than",
            Operator::IsBefore => "is before",
            Operator::IsAfter => "is after",
            Operator::IsEmpty => "is empty",
            Operator::IsNotEmpty => "is not empty",
            Operator::IsSet => "is set",
            Operator::IsNotSet => "is not set",
        }
    }

    /// Presence checks take no value
    pub fn is_presence_check(&self) -> bool {
        matches!(
            self,
            Operator::IsEmpty | Operator::IsNotEmpty | Operator::IsSet | Operator::IsNotSet
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "is" => Ok(Operator::Is),
            "is_not" => Ok(Operator::IsNot),
            "contains" => Ok(Operator::Contains),
            "not_contains" => Ok(Operator::NotContains),
            "greater_than" => Ok(Operator::GreaterThan),
            "less_than" => Ok(Operator::LessThan),
            "is_before" => Ok(Operator::IsBefore),
            "is_after" => Ok(Operator::IsAfter),
            "is_empty" => Ok(Operator::IsEmpty),
            "is_not_empty" => Ok(Operator::IsNotEmpty),
            "is_set" => Ok(Operator::IsSet),
            "is_not_set" => Ok(Operator::IsNotSet),
            _ => Err(format!("Invalid operator: {}", s)),
        }
    }
}

/// Whether a raw operator key names a presence check
pub fn is_presence_operator(operator: &str) -> bool {
    operator
        .parse::<Operator>()
        .map(|op| op.is_presence_check())
        .unwrap_or(false)
}

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Is,
    Operator::IsNot,
    Operator::Contains,
    Operator::NotContains,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const NUMERIC_OPERATORS: &[Operator] = &[
    Operator::Is,
    Operator::IsNot,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const CHOICE_OPERATORS: &[Operator] = &[
    Operator::Is,
    Operator::IsNot,
    Operator::Contains,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const CHECKBOX_OPERATORS: &[Operator] = &[Operator::Is];

const DATE_OPERATORS: &[Operator] = &[
    Operator::Is,
    Operator::IsBefore,
    Operator::IsAfter,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

/// Used for field types this console does not recognise
pub const FALLBACK_OPERATORS: &[Operator] = &[Operator::Is, Operator::IsNot];

/// Ordered operator set for a field type. Never empty.
pub fn operators_for_type(field_type: &FieldType) -> &'static [Operator] {
    match field_type {
        FieldType::Text | FieldType::Textarea => TEXT_OPERATORS,
        FieldType::Number | FieldType::Decimal => NUMERIC_OPERATORS,
        FieldType::Dropdown | FieldType::Multiselect => CHOICE_OPERATORS,
        FieldType::Checkbox => CHECKBOX_OPERATORS,
        FieldType::Date => DATE_OPERATORS,
        FieldType::Unknown(raw) => {
            tracing::debug!("No operator table for field type '{}', using fallback", raw);
            FALLBACK_OPERATORS
        }
    }
}

/// Input widget the UI renders for a row's value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueEditor {
    /// No input; the row takes no value
    None,
    Text,
    Textarea,
    Number,
    Decimal,
    Select { options: Vec<String> },
    MultiSelect { options: Vec<String> },
    Checkbox,
    Date,
}

impl ValueEditor {
    pub fn requires_value(&self) -> bool {
        !matches!(self, ValueEditor::None)
    }
}

/// Value editor for a field type; unknown types get a plain text input
pub fn editor_for_type(field_type: &FieldType, options: &[String]) -> ValueEditor {
    match field_type {
        FieldType::Text => ValueEditor::Text,
        FieldType::Textarea => ValueEditor::Textarea,
        FieldType::Number => ValueEditor::Number,
        FieldType::Decimal => ValueEditor::Decimal,
        FieldType::Dropdown => ValueEditor::Select {
            options: options.to_vec(),
        },
        FieldType::Multiselect => ValueEditor::MultiSelect {
            options: options.to_vec(),
        },
        FieldType::Checkbox => ValueEditor::Checkbox,
        FieldType::Date => ValueEditor::Date,
        FieldType::Unknown(_) => ValueEditor::Text,
    }
}

/// Editor for a condition row; presence operators suppress the input entirely
pub fn editor_for_operator(
    field_type: &FieldType,
    options: &[String],
    operator: Option<Operator>,
) -> ValueEditor {
    match operator {
        Some(op) if op.is_presence_check() => ValueEditor::None,
        _ => editor_for_type(field_type, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Operator::*;

    #[test]
    fn test_operator_table_per_field_type() {
        let text = vec![Is, IsNot, Contains, NotContains, IsEmpty, IsNotEmpty];
        let numeric = vec![Is, IsNot, GreaterThan, LessThan, IsEmpty, IsNotEmpty];
        let choice = vec![Is, IsNot, Contains, IsEmpty, IsNotEmpty];
        let date = vec![Is, IsBefore, IsAfter, IsEmpty, IsNotEmpty];

        assert_eq!(operators_for_type(&FieldType::Text), text.as_slice());
        assert_eq!(operators_for_type(&FieldType::Textarea), text.as_slice());
        assert_eq!(operators_for_type(&FieldType::Number), numeric.as_slice());
        assert_eq!(operators_for_type(&FieldType::Decimal), numeric.as_slice());
        assert_eq!(operators_for_type(&FieldType::Dropdown), choice.as_slice());
        assert_eq!(operators_for_type(&FieldType::Multiselect), choice.as_slice());
        assert_eq!(operators_for_type(&FieldType::Checkbox), &[Is]);
        assert_eq!(operators_for_type(&FieldType::Date), date.as_slice());
    }

    #[test]
    fn test_operator_sets_have_no_duplicates() {
        for field_type in [
            FieldType::Text,
            FieldType::Number,
            FieldType::Dropdown,
            FieldType::Checkbox,
            FieldType::Date,
        ] {
            let ops = operators_for_type(&field_type);
            let mut seen = std::collections::HashSet::new();
            assert!(ops.iter().all(|op| seen.insert(*op)), "{}", field_type);
        }
    }

    #[test]
    fn test_unknown_type_falls_back_silently() {
        let unknown = FieldType::Unknown("rating".to_string());
        assert_eq!(operators_for_type(&unknown), &[Is, IsNot]);
        assert_eq!(editor_for_type(&unknown, &[]), ValueEditor::Text);
    }

    #[test]
    fn test_presence_operators_suppress_editor() {
        for op in [IsEmpty, IsNotEmpty, IsSet, IsNotSet] {
            assert!(op.is_presence_check());
            let editor = editor_for_operator(&FieldType::Number, &[], Some(op));
            assert_eq!(editor, ValueEditor::None);
            assert!(!editor.requires_value());
        }
        assert_eq!(
            editor_for_operator(&FieldType::Number, &[], Some(GreaterThan)),
            ValueEditor::Number
        );
    }

    #[test]
    fn test_operator_keys_parse_back() {
        for op in [Is, IsNot, Contains, NotContains, GreaterThan, LessThan, IsBefore, IsAfter] {
            assert_eq!(op.as_str().parse::<Operator>(), Ok(op));
        }
        assert!(is_presence_operator("is_set"));
        assert!(!is_presence_operator("is"));
        assert!(!is_presence_operator("bogus"));
    }

    #[test]
    fn test_choice_editor_keeps_option_order() {
        let options = vec!["gold".to_string(), "silver".to_string()];
        assert_eq!(
            editor_for_type(&FieldType::Dropdown, &options),
            ValueEditor::Select { options }
        );
    }
}
