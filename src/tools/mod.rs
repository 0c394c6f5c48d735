//! Function tools the single-shot runner can execute on the model's behalf.

pub mod arguments;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use tool::{FunctionTool, Tool, ToolExecutionContext};
pub use types::ToolParameters;
