//! Anime detail MCP server.
//!
//! Exposes a `get-anime-detail` tool backed by the Jikan API, serves the
//! companion widget as a UI resource, and implements the widget's
//! presentation logic in [`widget`].

pub mod anime;
pub mod assets;
pub mod config;
pub mod error;
pub mod jikan;
pub mod mcp;
pub mod server;
pub mod widget;
pub mod widget_resource;

pub use config::Config;
pub use server::build_app;
