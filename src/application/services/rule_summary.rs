use crate::domain::entities::{AutomationRule, ConditionMatch, RuleType};
use crate::domain::services::vocabulary::Vocabulary;
use serde::Serialize;

/// One row of the rule list. Counters are shown exactly as the server sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSummaryEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rule_type: RuleType,
    pub trigger: String,
    pub trigger_label: String,
    pub condition_match: ConditionMatch,
    pub condition_count: usize,
    pub action_count: usize,
    pub is_active: bool,
    pub execution_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBucket {
    pub rule_type: RuleType,
    pub label: String,
    pub rules: Vec<RuleSummaryEntry>,
}

/// Read-only projection of persisted rules grouped by rule type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSummary {
    pub buckets: Vec<RuleBucket>,
    pub total: usize,
    pub active: usize,
}

/// Bucket a rule lands in. Missing or unknown types count as ticket creation.
// TODO: revisit once the API guarantees ruleType; the fallback can hide bad rows
pub fn effective_rule_type(rule: &AutomationRule) -> RuleType {
    match rule.rule_type {
        Some(rule_type) => rule_type,
        None => {
            tracing::warn!(
                "Rule '{}' ({}) has no recognised rule type, listing it under {}",
                rule.name,
                rule.id,
                RuleType::TicketCreation
            );
            RuleType::TicketCreation
        }
    }
}

impl RuleSummaryEntry {
    fn from_rule(rule: &AutomationRule, rule_type: RuleType, vocabulary: &Vocabulary) -> Self {
        let trigger_label = vocabulary
            .trigger_label(rule_type, &rule.trigger)
            .unwrap_or(&rule.trigger)
            .to_string();

        Self {
            id: rule.id.clone(),
            name: rule.name.clone(),
            description: rule.description.clone(),
            rule_type,
            trigger: rule.trigger.clone(),
            trigger_label,
            condition_match: rule.condition_match,
            condition_count: rule.conditions.len(),
            action_count: rule.actions.len(),
            is_active: rule.is_active,
            execution_count: rule.execution_count,
        }
    }
}

impl RuleSummary {
    /// Group rules into the three fixed buckets, keeping server order inside each
    pub fn from_rules(rules: &[AutomationRule], vocabulary: &Vocabulary) -> Self {
        let mut buckets: Vec<RuleBucket> = RuleType::ALL
            .iter()
            .map(|rule_type| RuleBucket {
                rule_type: *rule_type,
                label: rule_type.label().to_string(),
                rules: Vec::new(),
            })
            .collect();

        for rule in rules {
            let rule_type = effective_rule_type(rule);
            let entry = RuleSummaryEntry::from_rule(rule, rule_type, vocabulary);
            if let Some(bucket) = buckets.iter_mut().find(|b| b.rule_type == rule_type) {
                bucket.rules.push(entry);
            }
        }

        Self {
            buckets,
            total: rules.len(),
            active: rules.iter().filter(|r| r.is_active).count(),
        }
    }

    pub fn bucket(&self, rule_type: RuleType) -> &[RuleSummaryEntry] {
        self.buckets
            .iter()
            .find(|b| b.rule_type == rule_type)
            .map(|b| b.rules.as_slice())
            .unwrap_or(&[])
    }

    pub fn find(&self, id: &str) -> Option<&RuleSummaryEntry> {
        self.buckets
            .iter()
            .flat_map(|b| b.rules.iter())
            .find(|r| r.id == id)
    }
}
