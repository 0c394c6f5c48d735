//! Model Context Protocol probing.
//!
//! The agent runtime launches and talks to MCP providers itself. This module
//! only starts a stdio provider long enough to ask which tools it serves, so
//! an allow-list can be checked against reality.

pub mod probe;

pub use probe::{list_stdio_tools, McpToolSchema};
