//! OpenWeatherMap tools served over the Model Context Protocol (MCP).
//!
//! The crate is split into a thin protocol layer (`message`, `tool`,
//! `transport`, `server`) and a weather domain layer (`owm`, `geo`, `stats`,
//! `report`, `tools`). Every tool call is a single upstream HTTP request
//! followed by pure formatting; there is no shared mutable state between
//! invocations.

pub mod error;
pub mod geo;
pub mod message;
pub mod owm;
pub mod report;
pub mod server;
pub mod stats;
pub mod tool;
pub mod tools;
pub mod transport;

pub use error::Error;
pub use owm::{OwmClient, OwmConfig};
pub use server::{McpServer, ServerConfig};
pub use tool::{Tool, ToolRegistry};
