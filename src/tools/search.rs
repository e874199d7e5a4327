//! Tavily web search, exposed to the model as its single tool.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info};

use super::arguments::ToolArguments;
use super::tool::Tool;
use super::types::ToolParameters;
use crate::config::DEFAULT_TAVILY_BASE_URL;
use crate::error::{Result, ScoutError};
use crate::provider::http::{bearer_headers, ensure_success};

/// Name the model calls the tool by.
pub const TOOL_NAME: &str = "tavily_search_results_json";

const TOOL_DESCRIPTION: &str = "A search engine optimized for comprehensive, accurate, \
and trusted results. Useful for when you need to answer questions about current events. \
Input should be a search query.";

const DEFAULT_MAX_RESULTS: u32 = 5;

/// How much effort the backend spends per query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

/// One ranked result as handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub content: String,
}

pub struct TavilySearchTool {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    max_results: u32,
    search_depth: SearchDepth,
    parameters: ToolParameters,
}

impl TavilySearchTool {
    pub fn new(client: reqwest::Client, api_key: SecretString, base_url: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_TAVILY_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            search_depth: SearchDepth::default(),
            parameters: ToolParameters::object()
                .string("query", "search query to look up", true)
                .build(),
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_search_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = depth;
        self
    }

    /// Run one query; hits keep the backend's ranking.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScoutError::InvalidArgument("search query is empty".into()));
        }

        let body = TavilyRequest {
            api_key: self.api_key.expose_secret(),
            query,
            max_results: self.max_results,
            search_depth: self.search_depth,
            include_answer: false,
            include_raw_content: false,
            include_images: false,
        };

        debug!(query, max_results = self.max_results, depth = %self.search_depth, "Tavily search");

        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .headers(bearer_headers(self.api_key.expose_secret()))
            .json(&body)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let raw = resp.text().await?;
        let data: TavilyResponse = serde_json::from_str(&raw)?;
        let hits: Vec<SearchHit> = data
            .results
            .into_iter()
            .map(|r| SearchHit {
                url: r.url,
                content: r.content,
            })
            .collect();

        info!(query, hits = hits.len(), "search finished");
        Ok(hits)
    }
}

impl std::fmt::Debug for TavilySearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilySearchTool")
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .field("search_depth", &self.search_depth)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value> {
        let query = args.get_str("query")?;
        let hits = self.search(query).await?;
        Ok(serde_json::to_value(hits)?)
    }
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: SearchDepth,
    include_answer: bool,
    include_raw_content: bool,
    include_images: bool,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    url: String,
    #[serde(default)]
    content: String,
}
