pub mod catalog;
pub mod operators;
pub mod vocabulary;

pub use catalog::Catalog;
pub use operators::{Operator, ValueEditor};
pub use vocabulary::{Vocabulary, VocabularyBuilder};
