//! Application use cases (business logic orchestration).

mod submit_generation;
mod tools;

pub use submit_generation::{SubmitError, SubmitGeneration};
pub use tools::{RunTool, Tool};
