pub mod automation_rule;
pub mod custom_field;

pub use automation_rule::*;
pub use custom_field::*;
