//! View state of one open widget.

use crate::anime::{AnimeLookup, AnimeStructuredContent};

use super::card::AnimeCardProps;
use super::event::HostEvent;

pub const NO_DETAILS_MESSAGE: &str = "No anime details were returned.";
pub const OPEN_LINK_REJECTED_MESSAGE: &str = "Host rejected ui/open-link request.";

/// A card on screen and the detail page it links to.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub card: AnimeCardProps,
    pub url: Option<String>,
}

/// `Loading` and `Error` keep the last rendered card so it stays visible.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WidgetState {
    #[default]
    Idle,
    Loading {
        query: String,
        previous: Option<Rendered>,
    },
    Ready {
        query: String,
        result: Rendered,
    },
    Error {
        query: Option<String>,
        message: String,
        previous: Option<Rendered>,
    },
}

impl WidgetState {
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { query, .. } | Self::Ready { query, .. } => Some(query),
            Self::Error { query, .. } => query.as_deref(),
        }
    }

    /// The card currently on screen, if any.
    pub fn rendered(&self) -> Option<&Rendered> {
        match self {
            Self::Idle => None,
            Self::Ready { result, .. } => Some(result),
            Self::Loading { previous, .. } | Self::Error { previous, .. } => previous.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Detail-page url, available only while a card is shown.
    pub fn open_link_target(&self) -> Option<&str> {
        self.rendered()?.url.as_deref()
    }

    /// Apply one host event, producing the next state.
    pub fn apply(self, event: HostEvent) -> Self {
        match event {
            HostEvent::ToolInput(input) | HostEvent::ToolInputPartial(input) => {
                match input.query() {
                    Some(query) => Self::Loading {
                        query: query.to_string(),
                        previous: self.into_rendered(),
                    },
                    None => self,
                }
            }
            HostEvent::ToolResult(Some(AnimeStructuredContent {
                query,
                anime: AnimeLookup::Found(anime),
            })) => Self::Ready {
                query,
                result: Rendered {
                    card: AnimeCardProps::from(&anime),
                    url: anime.url,
                },
            },
            HostEvent::ToolResult(content) => {
                let query = match content {
                    Some(content) => Some(content.query),
                    None => self.query().map(str::to_owned),
                };
                Self::Error {
                    query,
                    message: NO_DETAILS_MESSAGE.to_string(),
                    // The card stays on screen but no longer has a detail page.
                    previous: self
                        .into_rendered()
                        .map(|rendered| Rendered { url: None, ..rendered }),
                }
            }
        }
    }

    /// Switch to `Error` with `message`, keeping whatever is on screen.
    pub fn fail(self, message: impl Into<String>) -> Self {
        Self::Error {
            query: self.query().map(str::to_owned),
            message: message.into(),
            previous: self.into_rendered(),
        }
    }

    fn into_rendered(self) -> Option<Rendered> {
        match self {
            Self::Idle => None,
            Self::Ready { result, .. } => Some(result),
            Self::Loading { previous, .. } | Self::Error { previous, .. } => previous,
        }
    }
}
