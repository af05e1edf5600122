/*
 * Anime detail MCP server.
 * Copyright (c) 2026 the anime-mcp authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 *
 * MCP (Model Context Protocol) server for the anime detail widget.
 * Exposes the `get-anime-detail` tool and the widget HTML as a UI resource
 * over Streamable HTTP transport.
 */

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::ToolCallContext;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::schemars::JsonSchema;
use rmcp::service::RequestContext;
use rmcp::{tool, tool_router, ErrorData as McpError, RoleServer, ServerHandler};
use serde::Deserialize;
use serde_json::json;

use crate::anime::{AnimeLookup, AnimeStructuredContent};
use crate::jikan::JikanClient;
use crate::widget_resource::WidgetResource;

pub const ANIME_TOOL_NAME: &str = "get-anime-detail";

#[derive(Clone)]
pub struct AnimeMcp {
    tool_router: ToolRouter<Self>,
    api: JikanClient,
    widget: Arc<WidgetResource>,
}

// -- Parameter types ----------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnimeQuery {
    /// Anime title to search for, e.g. "Naruto".
    #[schemars(length(min = 1))]
    pub query: String,
}

// -- Internal helpers (not MCP tools) -----------------------------------------

/// Text summary plus `structuredContent` for a finished lookup.
fn lookup_result(query: String, anime: AnimeLookup) -> Result<CallToolResult, McpError> {
    let content = AnimeStructuredContent { query, anime };
    let structured = serde_json::to_value(&content).map_err(|e| {
        McpError::internal_error(format!("Failed to encode anime result: {e}"), None)
    })?;

    let mut result = CallToolResult::success(vec![Content::text(content.summary())]);
    result.structured_content = Some(structured);
    Ok(result)
}

// -- MCP Tool implementations ------------------------------------------------

#[tool_router]
impl AnimeMcp {
    pub fn new(api: JikanClient, widget: Arc<WidgetResource>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            api,
            widget,
        }
    }

    /// Tool definitions, with the widget attached through `_meta`.
    pub fn tools(&self) -> Vec<Tool> {
        let uri = &self.widget.config().resource_uri;
        self.tool_router
            .list_all()
            .into_iter()
            .map(|mut tool| {
                if tool.name == ANIME_TOOL_NAME {
                    let mut meta = serde_json::Map::new();
                    meta.insert("ui/resourceUri".into(), json!(uri));
                    meta.insert("ui".into(), json!({ "resourceUri": uri }));
                    tool.meta = Some(Meta(meta));
                }
                tool
            })
            .collect()
    }

    #[tool(
        name = "get-anime-detail",
        description = "Look up an anime by title on MyAnimeList and show its poster, score, genres and synopsis"
    )]
    async fn get_anime_detail(
        &self,
        Parameters(AnimeQuery { query }): Parameters<AnimeQuery>,
    ) -> Result<CallToolResult, McpError> {
        if query.trim().is_empty() {
            return Err(McpError::invalid_params("`query` must not be empty", None));
        }

        let anime = self.api.search(&query).await.map_err(|e| {
            tracing::warn!(%query, "anime lookup failed: {e}");
            McpError::internal_error(format!("Failed to fetch anime details: {e}"), None)
        })?;

        match &anime {
            AnimeLookup::Found(found) => tracing::info!(
                %query,
                title = found.title_english.as_deref().unwrap_or("<untitled>"),
                "anime found"
            ),
            AnimeLookup::Empty => tracing::info!(%query, "no anime found"),
        }

        lookup_result(query, anime)
    }
}

// -- ServerHandler glue -------------------------------------------------------

impl ServerHandler for AnimeMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                title: Some("Anime Detail".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Anime lookup server. Call `get-anime-detail` with an anime title; \
                 hosts that support UI resources render the result with the attached widget."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(vec![self.widget.resource()]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.widget.read(&request.uri).await.ok_or_else(|| {
            McpError::resource_not_found(format!("Resource not found: {}", request.uri), None)
        })
    }
}
