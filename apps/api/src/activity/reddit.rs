//! Reddit listing client — the production `ActivitySource`.
//!
//! Uses an app-only OAuth token (client credentials grant). The token is
//! requested per fetch; nothing is cached between requests. Limits above one
//! listing page are served by following the `after` cursor.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::activity::{ActivityError, ActivityKind, ActivitySource, RawActivity};
use crate::config::Config;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";
/// Listing endpoints return at most this many children per page.
const MAX_LISTING_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
    /// Cursor for the next page; `None` on the last page.
    #[serde(default)]
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: ThingData,
}

/// Union of the comment (`t1`) and submission (`t3`) fields we read.
#[derive(Debug, Deserialize)]
struct ThingData {
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    selftext: Option<String>,
    subreddit: String,
    permalink: String,
}

impl ThingData {
    fn into_raw(self, kind: ActivityKind) -> RawActivity {
        let (title, body) = match kind {
            ActivityKind::Comment => (None, self.body.unwrap_or_default()),
            ActivityKind::Post => (
                Some(self.title.unwrap_or_default()),
                self.selftext.unwrap_or_default(),
            ),
        };
        RawActivity {
            title,
            body,
            group: format!("r/{}", self.subreddit),
            permalink: self.permalink,
        }
    }
}

#[derive(Clone)]
pub struct RedditClient {
    client: Client,
    client_id: String,
    secret: String,
    user_agent: String,
}

impl RedditClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            client_id: config.reddit_client_id.clone(),
            secret: config.reddit_secret.clone(),
            user_agent: config.reddit_user_agent.clone(),
        }
    }

    async fn access_token(&self) -> Result<String, ActivityError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.secret))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ActivityError::Auth(format!("status {status}: {body}")));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl ActivitySource for RedditClient {
    async fn fetch(
        &self,
        username: &str,
        kind: ActivityKind,
        limit: usize,
    ) -> Result<Vec<RawActivity>, ActivityError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let token = self.access_token().await?;
        let mut items = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let size = page_size(limit - items.len());
            let listing = self
                .fetch_page(&token, username, kind, size, after.as_deref())
                .await?;

            let fetched = listing.data.children.len();
            let cursor = listing.data.after.clone();
            items.extend(parse_children(listing, kind));

            match next_cursor(items.len(), limit, fetched, cursor) {
                Some(next) => after = Some(next),
                None => break,
            }
        }

        items.truncate(limit);
        debug!("Fetched {} {}s for {}", items.len(), kind, username);
        Ok(items)
    }
}

impl RedditClient {
    async fn fetch_page(
        &self,
        token: &str,
        username: &str,
        kind: ActivityKind,
        size: usize,
        after: Option<&str>,
    ) -> Result<Listing, ActivityError> {
        let mut query = vec![
            ("sort", "new".to_string()),
            ("limit", size.to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let response = self
            .client
            .get(listing_url(username, kind))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        match classify_status(status) {
            ListingStatus::Ok => Ok(response.json().await?),
            ListingStatus::AccountMissing => {
                Err(ActivityError::AccountNotFound(username.to_string()))
            }
            ListingStatus::Failed => {
                let message = response.text().await.unwrap_or_default();
                Err(ActivityError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingStatus {
    Ok,
    /// Deleted, suspended or never-existing account.
    AccountMissing,
    Failed,
}

fn classify_status(status: StatusCode) -> ListingStatus {
    if status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN {
        ListingStatus::AccountMissing
    } else if status.is_success() {
        ListingStatus::Ok
    } else {
        ListingStatus::Failed
    }
}

/// Children requested for the next page.
fn page_size(remaining: usize) -> usize {
    remaining.min(MAX_LISTING_LIMIT)
}

/// The cursor to follow, or `None` once `limit` is met or the listing is exhausted.
fn next_cursor(
    collected: usize,
    limit: usize,
    fetched: usize,
    after: Option<String>,
) -> Option<String> {
    if collected >= limit || fetched == 0 {
        return None;
    }
    after
}

fn listing_url(username: &str, kind: ActivityKind) -> String {
    let section = match kind {
        ActivityKind::Comment => "comments",
        ActivityKind::Post => "submitted",
    };
    format!("{API_BASE}/user/{username}/{section}")
}

fn parse_children(listing: Listing, kind: ActivityKind) -> Vec<RawActivity> {
    listing
        .data
        .children
        .into_iter()
        .map(|thing| thing.data.into_raw(kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use crate::persona::generator::tests::test_config;

    #[test]
    fn test_listing_url_per_kind() {
        assert_eq!(
            listing_url("kojied", ActivityKind::Comment),
            "https://oauth.reddit.com/user/kojied/comments"
        );
        assert_eq!(
            listing_url("kojied", ActivityKind::Post),
            "https://oauth.reddit.com/user/kojied/submitted"
        );
    }

    #[test]
    fn test_parse_comment_listing() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": null,
                "children": [
                    {"kind": "t1", "data": {
                        "body": "Borrow checker finally clicked.",
                        "subreddit": "rust",
                        "permalink": "/r/rust/comments/x1/c1/",
                        "score": 12
                    }}
                ]
            }
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        let raw = parse_children(listing, ActivityKind::Comment);

        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].title, None);
        assert_eq!(raw[0].body, "Borrow checker finally clicked.");
        assert_eq!(raw[0].group, "r/rust");
        assert_eq!(raw[0].permalink, "/r/rust/comments/x1/c1/");
    }

    #[test]
    fn test_parse_submission_listing_keeps_title() {
        let json = r#"{
            "data": {
                "children": [
                    {"kind": "t3", "data": {
                        "title": "Show r/rust: a tiny persona renderer",
                        "selftext": "",
                        "subreddit": "rust",
                        "permalink": "/r/rust/comments/p1/show/"
                    }}
                ]
            }
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        let raw = parse_children(listing, ActivityKind::Post);

        assert_eq!(raw[0].title.as_deref(), Some("Show r/rust: a tiny persona renderer"));
        assert_eq!(raw[0].body, "");
    }

    #[test]
    fn test_parse_empty_listing() {
        let listing: Listing = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert!(listing.data.after.is_none());
        assert!(parse_children(listing, ActivityKind::Comment).is_empty());
    }

    #[test]
    fn test_listing_after_cursor_is_read() {
        let listing: Listing =
            serde_json::from_str(r#"{"data": {"children": [], "after": "t1_abc"}}"#).unwrap();
        assert_eq!(listing.data.after.as_deref(), Some("t1_abc"));
    }

    #[test]
    fn test_missing_or_hidden_account_statuses() {
        assert_eq!(classify_status(StatusCode::NOT_FOUND), ListingStatus::AccountMissing);
        assert_eq!(classify_status(StatusCode::FORBIDDEN), ListingStatus::AccountMissing);
    }

    #[test]
    fn test_other_statuses() {
        assert_eq!(classify_status(StatusCode::OK), ListingStatus::Ok);
        assert_eq!(classify_status(StatusCode::TOO_MANY_REQUESTS), ListingStatus::Failed);
        assert_eq!(classify_status(StatusCode::UNAUTHORIZED), ListingStatus::Failed);
        assert_eq!(classify_status(StatusCode::INTERNAL_SERVER_ERROR), ListingStatus::Failed);
    }

    #[test]
    fn test_page_size_caps_at_listing_maximum() {
        assert_eq!(page_size(30), 30);
        assert_eq!(page_size(100), 100);
        assert_eq!(page_size(250), 100);
    }

    #[test]
    fn test_next_cursor_follows_until_limit() {
        // 250 requested: pages of 100, 100, then 50.
        assert_eq!(next_cursor(100, 250, 100, Some("a".into())), Some("a".to_string()));
        assert_eq!(next_cursor(200, 250, 100, Some("b".into())), Some("b".to_string()));
        assert_eq!(next_cursor(250, 250, 50, Some("c".into())), None);
    }

    #[test]
    fn test_next_cursor_stops_when_listing_is_exhausted() {
        assert_eq!(next_cursor(40, 250, 40, None), None);
        assert_eq!(next_cursor(100, 250, 0, Some("stale".into())), None);
    }

    #[tokio::test]
    async fn test_zero_limit_skips_network() {
        let config = test_config(PathBuf::from("unused"));
        let client = RedditClient::new(&config);

        let items = client
            .fetch("kojied", ActivityKind::Comment, 0)
            .await
            .unwrap();

        assert!(items.is_empty());
    }
}
