//! Presentation logic of the anime detail widget.
//!
//! The widget runs inside an MCP host. The host pushes tool input and tool
//! results as notifications; [`AnimeWidget`] folds them into a single
//! [`WidgetState`] and renders it. Opening the detail page goes back through
//! the host via [`HostBridge`].

pub mod card;
pub mod event;
pub mod state;

use std::future::Future;

use thiserror::Error;

pub use card::AnimeCardProps;
pub use event::HostEvent;
pub use state::{Rendered, WidgetState};

use card::html_escape;
use state::OPEN_LINK_REJECTED_MESSAGE;

#[derive(Debug, Error)]
#[error("host rejected request: {0}")]
pub struct HostError(pub String);

/// Requests the widget can make of its host.
pub trait HostBridge {
    fn open_link(&self, url: &str) -> impl Future<Output = Result<(), HostError>>;
}

/// Connection to the host bridge.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HostConnection {
    #[default]
    Connecting,
    Connected,
    /// Initialization failed; nothing else is rendered.
    Failed(String),
}

#[derive(Debug, Default)]
pub struct AnimeWidget {
    connection: HostConnection,
    state: WidgetState,
}

impl AnimeWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn connection(&self) -> &HostConnection {
        &self.connection
    }

    pub fn set_connection(&mut self, connection: HostConnection) {
        self.connection = connection;
    }

    pub fn handle(&mut self, event: HostEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);
    }

    /// Decode and apply a raw host notification. Returns whether it was one
    /// the widget listens to.
    pub fn handle_notification(&mut self, method: &str, params: serde_json::Value) -> bool {
        match HostEvent::from_notification(method, params) {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    /// Whether the card currently shows its open-link button: connected,
    /// with a detail url and a title.
    pub fn can_open_link(&self) -> bool {
        matches!(self.connection, HostConnection::Connected)
            && self
                .state
                .rendered()
                .is_some_and(|r| r.url.is_some() && r.card.title_english.is_some())
    }

    /// Ask the host to open the detail page. No-op when no link is shown.
    pub async fn open_link<B: HostBridge>(&mut self, bridge: &B) {
        if !self.can_open_link() {
            return;
        }
        let Some(url) = self.state.open_link_target().map(str::to_owned) else {
            return;
        };
        if let Err(e) = bridge.open_link(&url).await {
            tracing::warn!(%url, "open-link rejected: {e}");
            let state = std::mem::take(&mut self.state);
            self.state = state.fail(OPEN_LINK_REJECTED_MESSAGE);
        }
    }

    pub fn render(&self) -> String {
        match &self.connection {
            HostConnection::Failed(message) => {
                return format!(
                    r#"<div class="banner banner--error">Error initializing widget: {}</div>"#,
                    html_escape(message)
                );
            }
            HostConnection::Connecting => {
                return r#"<div class="placeholder">Connecting to MCP host...</div>"#.to_string();
            }
            HostConnection::Connected => {}
        }

        let mut html = String::new();
        if let Some(message) = self.state.error() {
            html.push_str(&format!(
                r#"<div class="banner banner--error">{}</div>"#,
                html_escape(message)
            ));
        }
        match self.state.rendered() {
            Some(rendered) => html.push_str(&rendered.card.render(rendered.url.is_some())),
            None => html.push_str(
                r#"<div class="placeholder">Waiting for anime data from the host...</div>"#,
            ),
        }
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    struct FakeHost {
        accept: bool,
        opened: RefCell<Vec<String>>,
    }

    impl FakeHost {
        fn new(accept: bool) -> Self {
            Self {
                accept,
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl HostBridge for FakeHost {
        async fn open_link(&self, url: &str) -> Result<(), HostError> {
            self.opened.borrow_mut().push(url.to_string());
            if self.accept {
                Ok(())
            } else {
                Err(HostError("denied".into()))
            }
        }
    }

    fn connected() -> AnimeWidget {
        let mut widget = AnimeWidget::new();
        widget.set_connection(HostConnection::Connected);
        widget
    }

    fn deliver_bleach(widget: &mut AnimeWidget) {
        assert!(widget.handle_notification(
            event::TOOL_RESULT,
            json!({
                "structuredContent": {
                    "query": "Bleach",
                    "anime": {
                        "image_url": null,
                        "url": "https://myanimelist.net/anime/269",
                        "title_english": "Bleach",
                        "rating": "PG-13",
                        "score": 7.9,
                        "synopsis": null,
                        "year": 2004,
                        "genres": ["Action"],
                        "studios": []
                    }
                }
            }),
        ));
    }

    #[test]
    fn render_follows_connection_first() {
        let mut widget = AnimeWidget::new();
        assert!(widget.render().contains("Connecting to MCP host..."));

        widget.set_connection(HostConnection::Failed("no bridge <x>".into()));
        let html = widget.render();
        assert!(html.contains("Error initializing widget: no bridge &lt;x&gt;"));
        assert!(!html.contains("Waiting"));
    }

    #[test]
    fn connected_widget_waits_then_shows_card() {
        let mut widget = connected();
        assert!(widget.render().contains("Waiting for anime data"));

        widget.handle_notification(event::TOOL_INPUT, json!({ "arguments": { "query": "Bleach" } }));
        assert!(matches!(widget.state(), WidgetState::Loading { .. }));

        deliver_bleach(&mut widget);
        let html = widget.render();
        assert!(html.contains("<h2>Bleach</h2>"));
        assert!(html.contains("Open in MyAnimeList"));
        assert!(!html.contains("banner"));
    }

    #[test]
    fn error_banner_sits_above_placeholder() {
        let mut widget = connected();
        widget.handle_notification(
            event::TOOL_RESULT,
            json!({ "structuredContent": { "query": "zzz", "anime": null } }),
        );
        let html = widget.render();
        let banner = html.find("No anime details were returned.").unwrap();
        let placeholder = html.find("Waiting for anime data").unwrap();
        assert!(banner < placeholder);
    }

    #[test]
    fn unknown_notifications_are_not_handled() {
        let mut widget = connected();
        assert!(!widget.handle_notification("ui/notifications/size-changed", json!({})));
        assert_eq!(widget.state(), &WidgetState::Idle);
    }

    #[tokio::test]
    async fn open_link_goes_through_host() {
        let mut widget = connected();
        deliver_bleach(&mut widget);

        let host = FakeHost::new(true);
        widget.open_link(&host).await;
        assert_eq!(*host.opened.borrow(), vec!["https://myanimelist.net/anime/269"]);
        assert!(matches!(widget.state(), WidgetState::Ready { .. }));
    }

    #[tokio::test]
    async fn rejected_open_link_shows_error_and_keeps_card() {
        let mut widget = connected();
        deliver_bleach(&mut widget);

        widget.open_link(&FakeHost::new(false)).await;
        assert_eq!(widget.state().error(), Some(OPEN_LINK_REJECTED_MESSAGE));
        let html = widget.render();
        assert!(html.contains(OPEN_LINK_REJECTED_MESSAGE));
        assert!(html.contains("<h2>Bleach</h2>"));
    }

    #[tokio::test]
    async fn open_link_needs_a_url() {
        let mut widget = connected();
        let host = FakeHost::new(true);
        widget.open_link(&host).await;
        assert!(host.opened.borrow().is_empty());
        assert!(!widget.can_open_link());
    }

    #[tokio::test]
    async fn empty_result_disables_the_previous_link() {
        let mut widget = connected();
        deliver_bleach(&mut widget);
        assert!(widget.can_open_link());

        widget.handle_notification(
            event::TOOL_RESULT,
            json!({ "structuredContent": { "query": "zzz", "anime": null } }),
        );
        assert!(!widget.can_open_link());
        let html = widget.render();
        assert!(html.contains("No anime details were returned."));
        assert!(html.contains("<h2>Bleach</h2>"));
        assert!(!html.contains("Open in MyAnimeList"));

        let host = FakeHost::new(true);
        widget.open_link(&host).await;
        assert!(host.opened.borrow().is_empty());
    }

    #[tokio::test]
    async fn untitled_card_has_no_link_to_open() {
        let mut widget = connected();
        widget.handle_notification(
            event::TOOL_RESULT,
            json!({
                "structuredContent": {
                    "query": "x",
                    "anime": { "url": "https://myanimelist.net/anime/1", "title_english": null }
                }
            }),
        );
        assert_eq!(widget.state().open_link_target(), Some("https://myanimelist.net/anime/1"));
        assert!(!widget.can_open_link());
        assert!(!widget.render().contains("Open in MyAnimeList"));

        let host = FakeHost::new(true);
        widget.open_link(&host).await;
        assert!(host.opened.borrow().is_empty());
    }
}
