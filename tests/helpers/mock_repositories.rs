use helpdesk_console::domain::entities::{
    AutomationRule, CreateAutomationRuleRequest, CustomFieldDefinition,
    UpdateAutomationRuleRequest,
};
use helpdesk_console::domain::errors::{DomainError, DomainResult};
use helpdesk_console::domain::ports::{AutomationRepository, CustomFieldRepository};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// In-memory stand-in for the helpdesk rule endpoints
#[derive(Default)]
pub struct MockAutomationRepository {
    rules: Mutex<Vec<AutomationRule>>,
    next_id: AtomicUsize,
    fail_mutations: AtomicBool,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    /// When set, updates signal `update_started` then wait on `update_gate`
    gated_updates: AtomicBool,
    pub update_started: Arc<Notify>,
    pub update_gate: Arc<Notify>,
    /// When set, lists snapshot the rules, signal `list_started` then wait on `list_gate`
    gated_lists: AtomicBool,
    pub list_started: Arc<Notify>,
    pub list_gate: Arc<Notify>,
}

impl MockAutomationRepository {
    pub fn with_rules(rules: Vec<AutomationRule>) -> Self {
        let repo = Self::default();
        repo.next_id.store(rules.len() + 1, Ordering::SeqCst);
        *repo.rules.lock().unwrap() = rules;
        repo
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn gate_updates(&self) {
        self.gated_updates.store(true, Ordering::SeqCst);
    }

    pub fn gate_lists(&self, gated: bool) {
        self.gated_lists.store(gated, Ordering::SeqCst);
    }

    pub fn stored(&self, id: &str) -> Option<AutomationRule> {
        self.rules.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    pub fn stored_count(&self) -> usize {
        self.rules.lock().unwrap().len()
    }

    fn check_failure(&self) -> DomainResult<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(DomainError::Upstream {
                status: 503,
                message: "helpdesk unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AutomationRepository for MockAutomationRepository {
    async fn list_automation_rules(&self) -> DomainResult<Vec<AutomationRule>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.rules.lock().unwrap().clone();
        if self.gated_lists.load(Ordering::SeqCst) {
            self.list_started.notify_one();
            self.list_gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn create_automation_rule(
        &self,
        request: &CreateAutomationRuleRequest,
    ) -> DomainResult<AutomationRule> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let rule = AutomationRule {
            id: format!("rule-{}", id),
            name: request.name.clone(),
            description: request.description.clone(),
            rule_type: Some(request.rule_type),
            trigger: request.trigger.clone(),
            condition_match: request.condition_match,
            conditions: request.conditions.clone(),
            actions: request.actions.clone(),
            is_active: true,
            execution_count: 0,
        };
        self.rules.lock().unwrap().push(rule.clone());
        Ok(rule)
    }

    async fn update_automation_rule(
        &self,
        id: &str,
        request: &UpdateAutomationRuleRequest,
    ) -> DomainResult<AutomationRule> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.gated_updates.load(Ordering::SeqCst) {
            self.update_started.notify_one();
            self.update_gate.notified().await;
        }
        self.check_failure()?;

        let mut rules = self.rules.lock().unwrap();
        let rule = rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Automation rule {}", id)))?;
        if let Some(is_active) = request.is_active {
            rule.is_active = is_active;
        }
        Ok(rule.clone())
    }

    async fn delete_automation_rule(&self, id: &str) -> DomainResult<()> {
        self.check_failure()?;
        let mut rules = self.rules.lock().unwrap();
        let before = rules.len();
        rules.retain(|r| r.id != id);
        if rules.len() == before {
            return Err(DomainError::NotFound(format!("Automation rule {}", id)));
        }
        Ok(())
    }
}

/// In-memory custom field endpoint; the list can be swapped between fetches
pub struct MockCustomFieldRepository {
    fields: Mutex<Vec<CustomFieldDefinition>>,
    pub requested_entity_types: Mutex<Vec<String>>,
}

impl MockCustomFieldRepository {
    pub fn new(fields: Vec<CustomFieldDefinition>) -> Self {
        Self {
            fields: Mutex::new(fields),
            requested_entity_types: Mutex::new(Vec::new()),
        }
    }

    pub fn replace(&self, fields: Vec<CustomFieldDefinition>) {
        *self.fields.lock().unwrap() = fields;
    }
}

#[async_trait::async_trait]
impl CustomFieldRepository for MockCustomFieldRepository {
    async fn list_custom_fields(
        &self,
        entity_type: &str,
    ) -> DomainResult<Vec<CustomFieldDefinition>> {
        self.requested_entity_types
            .lock()
            .unwrap()
            .push(entity_type.to_string());
        Ok(self.fields.lock().unwrap().clone())
    }
}
