//! The widget HTML exposed as an MCP UI resource.

use std::sync::Arc;

use rmcp::model::{
    AnnotateAble, Meta, RawResource, ReadResourceResult, Resource, ResourceContents,
};
use serde_json::{Map, Value};

use crate::assets::AssetSource;

/// MIME type hosts use to recognise UI documents.
pub const UI_MIME_TYPE: &str = "text/html+mcp";

pub const ANIME_WIDGET_URI: &str = "ui://widget/anime-detail-widget.html";

const FALLBACK_HTML: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Error</title>
  </head>
  <body>
    <div>Error loading widget HTML</div>
  </body>
</html>"#;

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub name: String,
    pub html_path: String,
    pub resource_uri: String,
    pub description: String,
    /// Origins the widget may fetch from.
    pub connect_domains: Option<Vec<String>>,
    /// Origins the widget may load images, scripts and media from.
    pub resource_domains: Option<Vec<String>>,
    pub domain: Option<String>,
    pub prefers_border: Option<bool>,
}

impl WidgetConfig {
    pub fn anime_detail() -> Self {
        Self {
            name: "anime-detail-widget".into(),
            html_path: "/anime-detail-widget.html".into(),
            resource_uri: ANIME_WIDGET_URI.into(),
            description: "Card showing the poster, score and synopsis of an anime".into(),
            connect_domains: None,
            resource_domains: Some(vec!["https://cdn.myanimelist.net".into()]),
            domain: None,
            prefers_border: Some(true),
        }
    }

    /// `ui` metadata block, or `None` when no option is configured.
    pub fn ui_meta(&self) -> Option<Meta> {
        let csp: Vec<(&str, Value)> = [
            ("connectDomains", self.connect_domains.as_ref()),
            ("resourceDomains", self.resource_domains.as_ref()),
        ]
        .into_iter()
        .filter_map(|(key, domains)| Some((key, Value::from(domains?.clone()))))
        .collect();

        let ui: Map<String, Value> = [
            ("csp", (!csp.is_empty()).then(|| object(csp))),
            ("domain", self.domain.clone().map(Value::from)),
            ("prefersBorder", self.prefers_border.map(Value::from)),
        ]
        .into_iter()
        .filter_map(|(key, value)| Some((key.to_string(), value?)))
        .collect();

        if ui.is_empty() {
            return None;
        }
        let mut meta = Map::new();
        meta.insert("ui".into(), Value::Object(ui));
        Some(Meta(meta))
    }
}

fn object(pairs: Vec<(&str, Value)>) -> Value {
    Value::Object(
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    )
}

/// A registered widget: its static descriptor plus where to load it from.
#[derive(Clone)]
pub struct WidgetResource {
    assets: Option<Arc<dyn AssetSource>>,
    config: WidgetConfig,
}

impl WidgetResource {
    pub fn new(assets: Option<Arc<dyn AssetSource>>, config: WidgetConfig) -> Self {
        Self { assets, config }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Entry for `resources/list`.
    pub fn resource(&self) -> Resource {
        let mut raw = RawResource::new(self.config.resource_uri.clone(), self.config.name.clone());
        raw.description = Some(self.config.description.clone());
        raw.mime_type = Some(UI_MIME_TYPE.to_string());
        raw.no_annotation()
    }

    /// Resolve `resources/read`; `None` if `uri` is not this widget.
    pub async fn read(&self, uri: &str) -> Option<ReadResourceResult> {
        if uri != self.config.resource_uri {
            return None;
        }
        let html = self.load_html().await;
        Some(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some(UI_MIME_TYPE.to_string()),
                text: html,
                meta: self.config.ui_meta(),
            }],
        })
    }

    async fn load_html(&self) -> String {
        let result = match &self.assets {
            Some(assets) => assets.fetch(&self.config.html_path).await,
            None => Err(crate::error::AssetError::Unavailable),
        };
        match result {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(
                    widget = %self.config.name,
                    path = %self.config.html_path,
                    "failed to load widget HTML: {e}"
                );
                FALLBACK_HTML.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticAssets;
    use serde_json::json;

    fn bare_config() -> WidgetConfig {
        WidgetConfig {
            connect_domains: None,
            resource_domains: None,
            domain: None,
            prefers_border: None,
            ..WidgetConfig::anime_detail()
        }
    }

    fn text_contents(result: &ReadResourceResult) -> (&str, &str, Option<&Meta>) {
        match &result.contents[..] {
            [ResourceContents::TextResourceContents {
                mime_type,
                text,
                meta,
                ..
            }] => (
                mime_type.as_deref().unwrap_or_default(),
                text.as_str(),
                meta.as_ref(),
            ),
            other => panic!("unexpected contents: {other:?}"),
        }
    }

    fn widget(assets: StaticAssets, config: WidgetConfig) -> WidgetResource {
        WidgetResource::new(Some(Arc::new(assets)), config)
    }

    #[test]
    fn no_options_means_no_meta_block() {
        assert!(bare_config().ui_meta().is_none());
    }

    #[test]
    fn csp_and_hints_are_emitted_when_configured() {
        let config = WidgetConfig {
            connect_domains: Some(vec!["https://api.jikan.moe".into()]),
            domain: Some("anime.example".into()),
            ..WidgetConfig::anime_detail()
        };
        let meta = config.ui_meta().unwrap();
        assert_eq!(
            Value::Object(meta.0),
            json!({
                "ui": {
                    "csp": {
                        "connectDomains": ["https://api.jikan.moe"],
                        "resourceDomains": ["https://cdn.myanimelist.net"]
                    },
                    "domain": "anime.example",
                    "prefersBorder": true
                }
            })
        );
    }

    #[test]
    fn prefers_border_false_is_still_emitted() {
        let config = WidgetConfig {
            prefers_border: Some(false),
            ..bare_config()
        };
        let meta = config.ui_meta().unwrap();
        assert_eq!(Value::Object(meta.0), json!({ "ui": { "prefersBorder": false } }));
    }

    #[test]
    fn list_entry_describes_the_widget() {
        let resource = widget(StaticAssets::new(), WidgetConfig::anime_detail()).resource();
        assert_eq!(resource.raw.uri, ANIME_WIDGET_URI);
        assert_eq!(resource.raw.name, "anime-detail-widget");
        assert_eq!(resource.raw.mime_type.as_deref(), Some(UI_MIME_TYPE));
    }

    #[tokio::test]
    async fn read_serves_bundled_html_with_meta() {
        let assets = StaticAssets::new().with("/anime-detail-widget.html", "<div id=\"root\"></div>");
        let resource = widget(assets, WidgetConfig::anime_detail());

        let result = resource.read(ANIME_WIDGET_URI).await.unwrap();
        let (mime, text, meta) = text_contents(&result);
        assert_eq!(mime, UI_MIME_TYPE);
        assert_eq!(text, "<div id=\"root\"></div>");
        assert_eq!(
            meta.unwrap().0["ui"]["csp"]["resourceDomains"],
            json!(["https://cdn.myanimelist.net"])
        );
    }

    #[tokio::test]
    async fn read_without_options_omits_meta() {
        let assets = StaticAssets::new().with("/anime-detail-widget.html", "<p></p>");
        let result = widget(assets, bare_config()).read(ANIME_WIDGET_URI).await.unwrap();
        let (_, _, meta) = text_contents(&result);
        assert!(meta.is_none());

        let serialized = serde_json::to_value(&result).unwrap();
        assert!(serialized["contents"][0].get("_meta").is_none());
    }

    #[tokio::test]
    async fn missing_html_falls_back_to_error_page() {
        let result = widget(StaticAssets::new(), WidgetConfig::anime_detail())
            .read(ANIME_WIDGET_URI)
            .await
            .unwrap();
        let (_, text, _) = text_contents(&result);
        assert!(text.contains("Error loading widget HTML"));

        let unbound = WidgetResource::new(None, WidgetConfig::anime_detail());
        let result = unbound.read(ANIME_WIDGET_URI).await.unwrap();
        let (_, text, _) = text_contents(&result);
        assert!(text.contains("Error loading widget HTML"));
    }

    #[tokio::test]
    async fn unknown_uri_is_not_resolved() {
        let resource = widget(StaticAssets::new(), WidgetConfig::anime_detail());
        assert!(resource.read("ui://widget/other.html").await.is_none());
    }
}
