pub mod automation_repository;
pub mod custom_field_repository;

pub use automation_repository::AutomationRepository;
pub use custom_field_repository::CustomFieldRepository;
