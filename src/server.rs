//! HTTP entry point: a landing page and the MCP endpoint.

use std::sync::Arc;

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::StreamableHttpService;
use tower_http::trace::TraceLayer;

use crate::assets::{AssetSource, DirAssets};
use crate::config::Config;
use crate::error::UpstreamError;
use crate::jikan::JikanClient;
use crate::mcp::AnimeMcp;
use crate::widget_resource::{WidgetConfig, WidgetResource};

const LANDING_PAGE: &str = r#"<main style="font-family: system-ui, -apple-system, sans-serif; max-width: 640px; margin: 4rem auto; padding: 0 1.5rem; line-height: 1.6;">
  <h1 style="font-size: 1.6rem; margin-bottom: 0.5rem;">Anime Detail MCP Server</h1>
  <p>This server exposes an MCP endpoint at <code>/mcp</code>. Connect with an MCP-compatible host to use the widgets.</p>
  <p>If you reached this page in a browser, there's nothing else to do here.</p>
</main>"#;

async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// Build the router: `GET /` and the MCP service under `/mcp`.
pub fn build_app(config: &Config) -> Result<Router, UpstreamError> {
    let api = JikanClient::new(config.api_base_url.clone(), config.request_timeout)?;
    let assets: Arc<dyn AssetSource> = Arc::new(DirAssets::new(&config.assets_dir));
    let widget = Arc::new(WidgetResource::new(Some(assets), WidgetConfig::anime_detail()));

    let mcp_service = StreamableHttpService::new(
        move || Ok(AnimeMcp::new(api.clone(), widget.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Ok(Router::new()
        .route("/", get(landing))
        .nest_service("/mcp", mcp_service)
        .layer(TraceLayer::new_for_http()))
}
