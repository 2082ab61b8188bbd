//! Activity Aggregator — normalizes an account's public activity into `ActivityItem`s.
//!
//! The two kinds (comments, posts) are fetched independently. A failed fetch
//! contributes zero items and is logged; it never aborts the aggregation.
//! An empty result is the trigger for `AppError::NoDataFound` downstream.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub mod profile;
pub mod reddit;

/// Host prefixed to every source permalink to build an item's origin URL.
pub const ACTIVITY_HOST: &str = "https://www.reddit.com";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Short remark left under someone else's post.
    Comment,
    /// Long-form submission (title + body).
    Post,
}

impl ActivityKind {
    /// Upper-case label used in the prompt transcript.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Comment => "COMMENT",
            ActivityKind::Post => "POST",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Comment => write!(f, "comment"),
            ActivityKind::Post => write!(f, "post"),
        }
    }
}

/// One unit of user-generated content in the uniform shape consumed by the prompt compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub text: String,
    /// Display label of the originating community, e.g. `r/rust`.
    pub group: String,
    pub url: String,
}

/// What an activity source hands back before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawActivity {
    /// Present for posts only.
    pub title: Option<String>,
    pub body: String,
    pub group: String,
    /// Path fragment, e.g. `/r/rust/comments/abc/...`.
    pub permalink: String,
}

impl RawActivity {
    fn into_item(self, kind: ActivityKind) -> ActivityItem {
        let text = match self.title {
            Some(title) => format!("{title}\n{}", self.body),
            None => self.body,
        };
        ActivityItem {
            kind,
            text,
            group: self.group,
            url: format!("{ACTIVITY_HOST}{}", self.permalink),
        }
    }
}

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Authentication failed: {0}")]
    Auth(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A remote source of account activity.
///
/// Carried in `AppState` as `Arc<dyn ActivitySource>` so tests can swap in fakes.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Returns up to `limit` of the account's most recent items of `kind`.
    async fn fetch(
        &self,
        username: &str,
        kind: ActivityKind,
        limit: usize,
    ) -> Result<Vec<RawActivity>, ActivityError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregation
// ────────────────────────────────────────────────────────────────────────────

/// Fetches both kinds and combines them: all comments first, then all posts.
pub async fn aggregate_activity(
    source: &dyn ActivitySource,
    username: &str,
    limit: usize,
) -> Vec<ActivityItem> {
    let comments = fetch_kind(source, username, ActivityKind::Comment, limit).await;
    let posts = fetch_kind(source, username, ActivityKind::Post, limit).await;

    let comments = settle(comments, username, ActivityKind::Comment);
    let posts = settle(posts, username, ActivityKind::Post);

    info!(
        "Aggregated {} comments and {} posts for {}",
        comments.len(),
        posts.len(),
        username
    );

    comments.into_iter().chain(posts).collect()
}

async fn fetch_kind(
    source: &dyn ActivitySource,
    username: &str,
    kind: ActivityKind,
    limit: usize,
) -> Result<Vec<ActivityItem>, ActivityError> {
    let raw = source.fetch(username, kind, limit).await?;
    Ok(raw
        .into_iter()
        .take(limit)
        .map(|r| r.into_item(kind))
        .collect())
}

/// Folds a per-kind failure into an empty contribution.
fn settle(
    outcome: Result<Vec<ActivityItem>, ActivityError>,
    username: &str,
    kind: ActivityKind,
) -> Vec<ActivityItem> {
    outcome.unwrap_or_else(|e| {
        warn!("Fetching {kind}s for {username} failed, continuing without them: {e}");
        Vec::new()
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned source: `None` for a kind simulates a failed fetch.
    pub(crate) struct FakeSource {
        pub comments: Option<Vec<RawActivity>>,
        pub posts: Option<Vec<RawActivity>>,
        pub calls: AtomicUsize,
    }

    impl FakeSource {
        pub(crate) fn new(
            comments: Option<Vec<RawActivity>>,
            posts: Option<Vec<RawActivity>>,
        ) -> Self {
            Self {
                comments,
                posts,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ActivitySource for FakeSource {
        async fn fetch(
            &self,
            username: &str,
            kind: ActivityKind,
            _limit: usize,
        ) -> Result<Vec<RawActivity>, ActivityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let canned = match kind {
                ActivityKind::Comment => &self.comments,
                ActivityKind::Post => &self.posts,
            };
            canned
                .clone()
                .ok_or_else(|| ActivityError::AccountNotFound(username.to_string()))
        }
    }

    pub(crate) fn remark(body: &str, subreddit: &str, id: &str) -> RawActivity {
        RawActivity {
            title: None,
            body: body.to_string(),
            group: format!("r/{subreddit}"),
            permalink: format!("/r/{subreddit}/comments/{id}/"),
        }
    }

    fn post(title: &str, body: &str, subreddit: &str, id: &str) -> RawActivity {
        RawActivity {
            title: Some(title.to_string()),
            ..remark(body, subreddit, id)
        }
    }

    #[tokio::test]
    async fn test_comments_precede_posts() {
        let source = FakeSource::new(
            Some(vec![remark("first", "rust", "c1"), remark("second", "golang", "c2")]),
            Some(vec![post("Title", "Body", "programming", "p1")]),
        );

        let items = aggregate_activity(&source, "kojied", 30).await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].kind, ActivityKind::Comment);
        assert_eq!(items[0].text, "first");
        assert_eq!(items[1].text, "second");
        assert_eq!(items[2].kind, ActivityKind::Post);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_post_text_joins_title_and_body() {
        let source = FakeSource::new(Some(vec![]), Some(vec![post("Hello", "World", "rust", "p1")]));
        let items = aggregate_activity(&source, "kojied", 30).await;
        assert_eq!(items[0].text, "Hello\nWorld");
    }

    #[tokio::test]
    async fn test_url_prefixes_fixed_host() {
        let source = FakeSource::new(Some(vec![remark("hi", "rust", "abc")]), Some(vec![]));
        let items = aggregate_activity(&source, "kojied", 30).await;
        assert_eq!(items[0].url, "https://www.reddit.com/r/rust/comments/abc/");
        assert_eq!(items[0].group, "r/rust");
    }

    #[tokio::test]
    async fn test_failed_kind_contributes_nothing() {
        let source = FakeSource::new(None, Some(vec![post("T", "B", "rust", "p1")]));
        let items = aggregate_activity(&source, "kojied", 30).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ActivityKind::Post);
    }

    #[tokio::test]
    async fn test_both_kinds_failing_yields_empty() {
        let source = FakeSource::new(None, None);
        let items = aggregate_activity(&source, "ghost", 30).await;
        assert!(items.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_limit_applies_per_kind() {
        let comments = (0..5).map(|i| remark(&format!("c{i}"), "rust", &i.to_string())).collect();
        let posts = (0..5).map(|i| post("t", &format!("p{i}"), "rust", &i.to_string())).collect();
        let source = FakeSource::new(Some(comments), Some(posts));

        let items = aggregate_activity(&source, "kojied", 2).await;

        assert_eq!(items.len(), 4);
        assert_eq!(items[1].text, "c1");
        assert_eq!(items[2].text, "t\np0");
    }
}
