//! Tool system for function calling.

pub mod arguments;
pub mod search;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use search::{SearchDepth, SearchHit, TavilySearchTool};
pub use tool::Tool;
pub use types::ToolParameters;
