pub mod automation_service;
pub mod rule_form;
pub mod rule_summary;

pub use automation_service::{AutomationConfig, AutomationService};
pub use rule_form::{FormError, FormPhase, RuleDraft, RuleForm, ValidationErrors};
pub use rule_summary::{RuleBucket, RuleSummary, RuleSummaryEntry};
