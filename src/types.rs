use serde::{Deserialize, Serialize};

/// Query string accepted by `GET /search` on both variants.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    /// 1-based pagination cursor; Google variant only.
    #[serde(default)]
    pub start: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Normalized DuckDuckGo instant answer.
///
/// Field names are part of the public JSON contract; upstream empty strings
/// are mapped to nulls.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstantAnswer {
    pub query: String,
    pub heading: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(rename = "abstractSource")]
    pub abstract_source: Option<String>,
    #[serde(rename = "abstractURL")]
    pub abstract_url: Option<String>,
    #[serde(rename = "relatedTopics")]
    pub related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RelatedTopic {
    pub text: String,
    pub url: String,
}

/// Normalized Google Custom Search page.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WebSearchPage {
    pub query: String,
    #[serde(rename = "nextStart")]
    pub next_start: Option<u32>,
    pub items: Vec<WebSearchItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WebSearchItem {
    pub title: String,
    pub snippet: String,
    pub url: String,
    #[serde(rename = "displayUrl")]
    pub display_url: String,
}

// DuckDuckGo Instant Answer API types
#[derive(Debug, Deserialize)]
pub struct DdgResponse {
    #[serde(rename = "Heading", default)]
    pub heading: String,
    #[serde(rename = "Abstract", default)]
    pub abstract_text: String,
    #[serde(rename = "AbstractSource", default)]
    pub abstract_source: String,
    #[serde(rename = "AbstractURL", default)]
    pub abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    pub related_topics: Vec<DdgTopic>,
}

/// Either a direct `{Text, FirstURL}` pair or a group carrying its own
/// `Topics` list of such pairs.
#[derive(Debug, Deserialize)]
pub struct DdgTopic {
    #[serde(rename = "Text")]
    pub text: Option<String>,
    #[serde(rename = "FirstURL")]
    pub first_url: Option<String>,
    #[serde(rename = "Topics", default)]
    pub topics: Vec<DdgTopic>,
}

// Google Custom Search API types
#[derive(Debug, Deserialize)]
pub struct CseResponse {
    #[serde(default)]
    pub items: Vec<CseItem>,
    #[serde(default)]
    pub queries: Option<CseQueries>,
}

#[derive(Debug, Deserialize)]
pub struct CseQueries {
    #[serde(rename = "nextPage", default)]
    pub next_page: Vec<CsePage>,
}

#[derive(Debug, Deserialize)]
pub struct CsePage {
    #[serde(rename = "startIndex")]
    pub start_index: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CseItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
    #[serde(rename = "displayLink", default)]
    pub display_link: String,
}
