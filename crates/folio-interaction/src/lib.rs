//! folio-interaction — assistant client implementations.

pub mod config;
pub mod http_assistant;
pub mod scripted;

pub use http_assistant::ApiAssistantClient;
pub use scripted::ScriptedAssistant;
