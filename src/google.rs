use crate::types::{CseResponse, WebSearchItem, WebSearchPage};
use crate::UpstreamError;

const CSE_API_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// One GET against Google Custom Search; pagination via the 1-based `start`
/// index. Non-success statuses surface as `UpstreamError::Status` so the
/// handler can forward them verbatim.
pub async fn web_search(
    client: &reqwest::Client,
    api_key: &str,
    cx: &str,
    query: &str,
    start: u32,
) -> Result<WebSearchPage, UpstreamError> {
    let start_param = start.to_string();
    let response = client
        .get(CSE_API_URL)
        .query(&[
            ("key", api_key),
            ("cx", cx),
            ("q", query),
            ("start", start_param.as_str()),
        ])
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

    let upstream = response.json::<CseResponse>().await?;
    Ok(normalize(query, upstream))
}

/// Pure reshaping; item order and count are preserved. The next-page cursor
/// comes from `queries.nextPage[0].startIndex` and is null when any level of
/// that path is absent.
pub fn normalize(query: &str, upstream: CseResponse) -> WebSearchPage {
    let next_start = upstream
        .queries
        .and_then(|queries| queries.next_page.into_iter().next())
        .and_then(|page| page.start_index);

    WebSearchPage {
        query: query.to_string(),
        next_start,
        items: upstream
            .items
            .into_iter()
            .map(|item| WebSearchItem {
                title: item.title,
                snippet: item.snippet,
                url: item.link,
                display_url: item.display_link,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_items_and_next_page_cursor() {
        let upstream: CseResponse = serde_json::from_value(serde_json::json!({
            "items": [
                {"title": "T", "snippet": "S", "link": "L", "displayLink": "D"}
            ],
            "queries": {
                "nextPage": [{"startIndex": 11}]
            }
        }))
        .unwrap();

        let page = normalize("q", upstream);
        assert_eq!(page.query, "q");
        assert_eq!(page.next_start, Some(11));
        assert_eq!(
            page.items,
            vec![WebSearchItem {
                title: "T".to_string(),
                snippet: "S".to_string(),
                url: "L".to_string(),
                display_url: "D".to_string(),
            }]
        );
    }

    #[test]
    fn missing_next_page_yields_null_cursor() {
        let upstream: CseResponse = serde_json::from_value(serde_json::json!({
            "items": [],
            "queries": {}
        }))
        .unwrap();

        assert!(normalize("q", upstream).next_start.is_none());
    }

    #[test]
    fn missing_queries_yields_null_cursor() {
        let upstream: CseResponse = serde_json::from_str("{}").unwrap();
        let page = normalize("q", upstream);
        assert!(page.next_start.is_none());
        assert!(page.items.is_empty());
    }

    #[test]
    fn item_order_is_preserved() {
        let upstream: CseResponse = serde_json::from_value(serde_json::json!({
            "items": [
                {"title": "first", "snippet": "", "link": "l1", "displayLink": ""},
                {"title": "second", "snippet": "", "link": "l2", "displayLink": ""},
                {"title": "third", "snippet": "", "link": "l3", "displayLink": ""}
            ]
        }))
        .unwrap();

        let titles: Vec<_> = normalize("q", upstream)
            .items
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }
}
