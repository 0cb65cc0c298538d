use crate::application::services::rule_form::{FormError, RuleForm};
use crate::application::services::rule_summary::RuleSummary;
use crate::domain::entities::{
    AutomationRule, CreateAutomationRuleRequest, CustomFieldDefinition,
    UpdateAutomationRuleRequest,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{AutomationRepository, CustomFieldRepository};
use crate::domain::services::catalog::Catalog;
use crate::domain::services::vocabulary::{Vocabulary, VocabularyBuilder};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct AutomationConfig {
    /// Entity whose custom fields feed the rule builder
    pub custom_field_entity_type: String,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            custom_field_entity_type: "ticket".to_string(),
        }
    }
}

/// Cached rule list. `generation` moves on every invalidation; a fetch is
/// stored only if no invalidation happened while it was in flight.
#[derive(Default)]
struct RuleCache {
    generation: u64,
    rules: Option<Arc<Vec<AutomationRule>>>,
}

/// Rule-builder console service.
///
/// Caches the rule list and the merged vocabulary. Mutations go to the
/// helpdesk API first; the rule cache is dropped only once the API confirms,
/// so reads never show state the server has not accepted.
#[derive(Clone)]
pub struct AutomationService {
    automation_repo: Arc<dyn AutomationRepository>,
    custom_field_repo: Arc<dyn CustomFieldRepository>,
    catalog: Arc<Catalog>,
    config: AutomationConfig,
    rules: Arc<RwLock<RuleCache>>,
    vocabulary: Arc<RwLock<Option<Arc<Vocabulary>>>>,
}

fn record_mutation(operation: &'static str, result: &DomainResult<impl Sized>) {
    let outcome = if result.is_ok() { "success" } else { "failure" };
    metrics::counter!(
        "console_rule_mutations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

impl AutomationService {
    pub fn new(
        automation_repo: Arc<dyn AutomationRepository>,
        custom_field_repo: Arc<dyn CustomFieldRepository>,
        catalog: Arc<Catalog>,
        config: AutomationConfig,
    ) -> Self {
        Self {
            automation_repo,
            custom_field_repo,
            catalog,
            config,
            rules: Arc::new(RwLock::new(RuleCache::default())),
            vocabulary: Arc::new(RwLock::new(None)),
        }
    }

    // Rules

    /// Rules in server order, fetched on first use and after any invalidation
    pub async fn list_rules(&self) -> DomainResult<Arc<Vec<AutomationRule>>> {
        let generation = {
            let cache = self.rules.read().await;
            if let Some(rules) = cache.rules.as_ref() {
                tracing::debug!("Serving {} automation rule(s) from cache", rules.len());
                return Ok(Arc::clone(rules));
            }
            cache.generation
        };

        let rules = Arc::new(self.automation_repo.list_automation_rules().await?);
        tracing::debug!("Fetched {} automation rule(s)", rules.len());

        let mut cache = self.rules.write().await;
        if cache.generation == generation {
            cache.rules = Some(Arc::clone(&rules));
        } else {
            tracing::debug!("Rule list changed during fetch, not caching it");
        }
        Ok(rules)
    }

    pub async fn invalidate_rules(&self) {
        let mut cache = self.rules.write().await;
        cache.generation = cache.generation.wrapping_add(1);
        cache.rules = None;
    }

    pub async fn rule_summary(&self) -> DomainResult<RuleSummary> {
        let rules = self.list_rules().await?;
        let vocabulary = self.vocabulary().await?;
        Ok(RuleSummary::from_rules(&rules, &vocabulary))
    }

    pub async fn create_rule(
        &self,
        request: &CreateAutomationRuleRequest,
    ) -> DomainResult<AutomationRule> {
        let result = self.automation_repo.create_automation_rule(request).await;
        record_mutation("create", &result);

        match &result {
            Ok(rule) => {
                self.invalidate_rules().await;
                tracing::info!(
                    "Automation rule '{}' ({}) created as {}",
                    rule.name,
                    rule.id,
                    request.rule_type
                );
            }
            Err(e) => tracing::error!("Failed to create automation rule '{}': {}", request.name, e),
        }
        result
    }

    /// Validate and submit an open form. The form ends `closed` on success
    /// and back in `editing` on any failure.
    pub async fn submit_form(&self, form: &mut RuleForm) -> Result<AutomationRule, FormError> {
        let request = form.begin_submit()?;
        let result = self.create_rule(&request).await;
        form.complete_submit(result)
    }

    /// Set the active flag. The cached list keeps the old flag until the API
    /// confirms the change.
    pub async fn set_rule_active(&self, id: &str, is_active: bool) -> DomainResult<AutomationRule> {
        let request = UpdateAutomationRuleRequest::set_active(is_active);
        let result = self.automation_repo.update_automation_rule(id, &request).await;
        record_mutation(if is_active { "enable" } else { "disable" }, &result);

        match &result {
            Ok(rule) => {
                self.invalidate_rules().await;
                tracing::info!(
                    "Automation rule '{}' ({}) {}",
                    rule.name,
                    rule.id,
                    if rule.is_active { "enabled" } else { "disabled" }
                );
            }
            Err(e) => tracing::error!("Failed to update automation rule {}: {}", id, e),
        }
        result
    }

    /// Flip the active flag of a rule as currently listed
    pub async fn toggle_rule(&self, id: &str) -> DomainResult<AutomationRule> {
        let rules = self.list_rules().await?;
        let current = rules
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Automation rule {}", id)))?;
        self.set_rule_active(id, !current.is_active).await
    }

    pub async fn delete_rule(&self, id: &str) -> DomainResult<()> {
        let result = self.automation_repo.delete_automation_rule(id).await;
        record_mutation("delete", &result);

        match &result {
            Ok(()) => {
                self.invalidate_rules().await;
                tracing::info!("Automation rule {} deleted", id);
            }
            Err(e) => tracing::error!("Failed to delete automation rule {}: {}", id, e),
        }
        result
    }

    // Vocabulary

    pub async fn vocabulary(&self) -> DomainResult<Arc<Vocabulary>> {
        if let Some(vocabulary) = self.vocabulary.read().await.as_ref() {
            return Ok(Arc::clone(vocabulary));
        }
        self.refresh_vocabulary().await
    }

    /// Refetch custom fields and rebuild the vocabulary
    pub async fn refresh_vocabulary(&self) -> DomainResult<Arc<Vocabulary>> {
        let fields = self
            .custom_field_repo
            .list_custom_fields(&self.config.custom_field_entity_type)
            .await?;
        Ok(self.apply_custom_fields(&fields).await)
    }

    /// Rebuild the vocabulary from a custom-field list and swap it in
    pub async fn apply_custom_fields(&self, fields: &[CustomFieldDefinition]) -> Arc<Vocabulary> {
        let vocabulary = Arc::new(
            VocabularyBuilder::new(&self.catalog)
                .with_custom_fields(fields)
                .build(),
        );
        metrics::counter!("console_vocabulary_rebuilds_total").increment(1);
        tracing::info!(
            "Rule vocabulary rebuilt from {} custom field(s)",
            fields.len()
        );
        *self.vocabulary.write().await = Some(Arc::clone(&vocabulary));
        vocabulary
    }

    /// A closed form bound to the current vocabulary
    pub async fn new_form(&self) -> DomainResult<RuleForm> {
        Ok(RuleForm::new(self.vocabulary().await?))
    }
}
