//! Notifications the host delivers to the widget.

use serde::Deserialize;
use serde_json::Value;

use crate::anime::AnimeStructuredContent;

pub const TOOL_INPUT: &str = "ui/notifications/tool-input";
pub const TOOL_INPUT_PARTIAL: &str = "ui/notifications/tool-input-partial";
pub const TOOL_RESULT: &str = "ui/notifications/tool-result";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ToolArguments {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub arguments: Option<ToolArguments>,
}

impl ToolInput {
    /// The trimmed query, if there is a non-blank one.
    pub fn query(&self) -> Option<&str> {
        let query = self.arguments.as_ref()?.query.as_deref()?.trim();
        (!query.is_empty()).then_some(query)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ToolInput(ToolInput),
    ToolInputPartial(ToolInput),
    /// `None` when the result carried no usable structured content.
    ToolResult(Option<AnimeStructuredContent>),
}

impl HostEvent {
    /// Decode a host notification. Unknown methods yield `None`; a tool
    /// input whose arguments don't decode is treated as carrying no query.
    pub fn from_notification(method: &str, params: Value) -> Option<Self> {
        match method {
            TOOL_INPUT => Some(Self::ToolInput(decode_input(params))),
            TOOL_INPUT_PARTIAL => Some(Self::ToolInputPartial(decode_input(params))),
            TOOL_RESULT => {
                let content = params
                    .get("structuredContent")
                    .cloned()
                    .and_then(|content| serde_json::from_value(content).ok());
                Some(Self::ToolResult(content))
            }
            _ => None,
        }
    }
}

fn decode_input(params: Value) -> ToolInput {
    serde_json::from_value(params).unwrap_or_default()
}
