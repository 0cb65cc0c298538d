pub mod error;
pub mod state;

pub use error::*;
pub use state::*;
