use crate::domain::entities::CustomFieldDefinition;
use crate::domain::errors::DomainResult;

/// Tenant custom field definitions, read-only
#[async_trait::async_trait]
pub trait CustomFieldRepository: Send + Sync {
    /// Definitions for one entity type (`ticket`, `contact`), in server order
    async fn list_custom_fields(&self, entity_type: &str)
        -> DomainResult<Vec<CustomFieldDefinition>>;
}
