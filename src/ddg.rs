use std::sync::Arc;

use tracing::{debug, info};

use crate::types::{DdgResponse, DdgTopic, InstantAnswer, RelatedTopic};
use crate::{DdgState, UpstreamError};

pub const DDG_API_URL: &str = "https://api.duckduckgo.com/";

/// Flattened related topics are capped at this many entries.
const MAX_RELATED_TOPICS: usize = 8;

/// Serve `query` from cache or the DuckDuckGo Instant Answer API.
///
/// A cache hit returns the stored value as-is, so repeated queries inside the
/// TTL serialize to byte-identical JSON without a second upstream call.
pub async fn instant_answer(
    state: &Arc<DdgState>,
    query: &str,
) -> Result<InstantAnswer, UpstreamError> {
    let cache_key = format!("ddg:{query}");
    if let Some(cached) = state.cache.get(&cache_key).await {
        debug!("cache hit for query");
        return Ok(cached);
    }

    info!("fetching instant answer for: {}", query);
    let upstream = fetch_instant_answer(&state.http_client, &state.api_url, query).await?;
    let normalized = normalize(query, upstream);
    state.cache.insert(cache_key, normalized.clone()).await;
    Ok(normalized)
}

/// One GET against the instant-answer endpoint; no retries.
async fn fetch_instant_answer(
    client: &reqwest::Client,
    api_url: &str,
    query: &str,
) -> Result<DdgResponse, UpstreamError> {
    let response = client
        .get(api_url)
        .query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ])
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "".into());
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<DdgResponse>().await?)
}

/// Pure reshaping of the upstream payload. Upstream empty strings become
/// nulls, mirroring the falsy checks the instant-answer consumers expect.
pub fn normalize(query: &str, upstream: DdgResponse) -> InstantAnswer {
    InstantAnswer {
        query: query.to_string(),
        heading: non_empty(upstream.heading),
        abstract_text: non_empty(upstream.abstract_text),
        abstract_source: non_empty(upstream.abstract_source),
        abstract_url: non_empty(upstream.abstract_url),
        related_topics: flatten_topics(upstream.related_topics),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Flatten one level of topic grouping: direct pairs pass through, grouped
/// entries contribute their nested pairs, anything missing text or URL is
/// dropped. Upstream order is preserved and the result is capped.
pub fn flatten_topics(topics: Vec<DdgTopic>) -> Vec<RelatedTopic> {
    let mut flattened = Vec::new();
    for topic in topics {
        let DdgTopic {
            text,
            first_url,
            topics: nested,
        } = topic;
        if let Some(pair) = topic_pair(text, first_url) {
            flattened.push(pair);
        } else {
            for child in nested {
                if let Some(pair) = topic_pair(child.text, child.first_url) {
                    flattened.push(pair);
                }
            }
        }
    }
    flattened.truncate(MAX_RELATED_TOPICS);
    flattened
}

fn topic_pair(text: Option<String>, url: Option<String>) -> Option<RelatedTopic> {
    match (text, url) {
        (Some(text), Some(url)) if !text.is_empty() && !url.is_empty() => {
            Some(RelatedTopic { text, url })
        }
        _ => None,
    }
}
