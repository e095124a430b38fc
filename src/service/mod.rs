//! Tool layer shared by the MCP server, the HTTP API and the CLI.
//!
//! Each tool validates its arguments, calls the Reddit source or web
//! fetcher, runs the analysis pipeline and shapes a JSON response. Errors
//! propagate as [`RedsightError`] until [`ToolService::call`], where they
//! become a `{status: "error"}` body.

pub mod args;

use crate::analysis::{
    format_timestamp, preview, PostRecord, SubredditOutcome, SubredditRecord, TextAnalyzer,
    TrendAggregator,
};
use crate::config::Settings;
use crate::error::{RedsightError, Result};
use crate::reddit::{
    extract_post_id, CommentSort, RedditClient, RedditSource, SearchType, TimeFilter, TimePeriod,
};
use crate::web::WebFetcher;
use args::{parse_args, AnalyzePostArgs, FetchArgs, SearchArgs, TrendArgs};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

pub const SEARCH_REDDIT: &str = "search_reddit";
pub const ANALYZE_REDDIT_POST: &str = "analyze_reddit_post";
pub const ANALYZE_REDDIT_TRENDS: &str = "analyze_reddit_trends";
pub const FETCH_WEBPAGE: &str = "fetch_webpage";

pub const TOOL_NAMES: [&str; 4] = [
    SEARCH_REDDIT,
    ANALYZE_REDDIT_POST,
    ANALYZE_REDDIT_TRENDS,
    FETCH_WEBPAGE,
];

/// Subreddit analyzed when a trend request names none.
const DEFAULT_TREND_SUBREDDIT: &str = "all";

/// Outcome of a tool call, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolReply {
    pub body: Value,
    /// Set when `body` is an error response.
    pub error_kind: Option<&'static str>,
}

impl ToolReply {
    pub fn success(body: Value) -> Self {
        Self {
            body,
            error_kind: None,
        }
    }

    pub fn failure(err: &RedsightError) -> Self {
        Self {
            body: json!({
                "status": "error",
                "error_kind": err.kind(),
                "message": err.to_string(),
            }),
            error_kind: Some(err.kind()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_kind.is_some()
    }
}

/// Runs the Reddit analysis tools.
pub struct ToolService {
    settings: Settings,
    source: Option<Arc<dyn RedditSource>>,
    fetcher: WebFetcher,
    analyzer: TextAnalyzer,
    aggregator: TrendAggregator,
}

impl ToolService {
    /// Build the service against the live Reddit API.
    ///
    /// Missing credentials are not an error here; Reddit tools report them
    /// when called.
    pub fn new(settings: Settings) -> Result<Self> {
        let source: Option<Arc<dyn RedditSource>> = if settings.reddit.has_credentials() {
            Some(Arc::new(RedditClient::new(&settings.reddit)?))
        } else {
            warn!("Reddit credentials not configured; Reddit tools will return errors");
            None
        };
        Self::build(settings, source)
    }

    /// Build the service with an explicit Reddit source.
    pub fn with_source(settings: Settings, source: Arc<dyn RedditSource>) -> Result<Self> {
        Self::build(settings, Some(source))
    }

    fn build(settings: Settings, source: Option<Arc<dyn RedditSource>>) -> Result<Self> {
        let fetcher = WebFetcher::new(settings.fetch.clone(), settings.reddit.user_agent.clone())?;
        let analyzer = TextAnalyzer::new(Default::default(), settings.analysis.clone());
        let aggregator = TrendAggregator {
            trending_keywords: settings.analysis.top_keywords,
            subreddit_keywords: settings.trends.subreddit_keywords,
            topic_keywords: settings.analysis.topic_keywords,
            sample_posts: settings.analysis.sample_texts,
            trending_posts: settings.trends.trending_posts,
        };

        Ok(Self {
            settings,
            source,
            fetcher,
            analyzer,
            aggregator,
        })
    }

    /// The Reddit source, or `MissingCredentials` before any network call.
    fn reddit(&self) -> Result<&dyn RedditSource> {
        if !self.settings.reddit.has_credentials() {
            return Err(RedsightError::MissingCredentials);
        }
        self.source.as_deref().ok_or(RedsightError::MissingCredentials)
    }

    /// Dispatch a tool by name and collapse any error into a response body.
    pub async fn call(&self, name: &str, arguments: Option<Value>) -> ToolReply {
        let result = match name {
            SEARCH_REDDIT => match parse_args(name, arguments) {
                Ok(args) => self.search_reddit(args).await,
                Err(e) => Err(e),
            },
            ANALYZE_REDDIT_POST => match parse_args(name, arguments) {
                Ok(args) => self.analyze_reddit_post(args).await,
                Err(e) => Err(e),
            },
            ANALYZE_REDDIT_TRENDS => match parse_args(name, arguments) {
                Ok(args) => self.analyze_reddit_trends(args).await,
                Err(e) => Err(e),
            },
            FETCH_WEBPAGE => match parse_args(name, arguments) {
                Ok(args) => self.fetch_webpage(args).await,
                Err(e) => Err(e),
            },
            _ => Err(RedsightError::UnknownTool(name.to_string())),
        };

        match result {
            Ok(body) => ToolReply::success(body),
            Err(e) => {
                match e.kind() {
                    "internal" => error!("Tool {} failed: {}", name, e),
                    _ => warn!("Tool {} failed: {}", name, e),
                }
                ToolReply::failure(&e)
            }
        }
    }

    /// Search posts or subreddits.
    #[instrument(skip(self, args), fields(query = %args.query))]
    pub async fn search_reddit(&self, args: SearchArgs) -> Result<Value> {
        let reddit = self.reddit()?;
        let search_type: SearchType = args.search_type.parse()?;
        let time_filter: TimeFilter = args.time_filter.parse()?;
        let subreddit = args
            .subreddit
            .as_deref()
            .map(normalize_subreddit)
            .filter(|s| !s.is_empty());

        let results: Vec<Value> = match search_type {
            SearchType::Subreddit => reddit
                .search_subreddits(&args.query, args.limit)
                .await?
                .iter()
                .map(subreddit_summary)
                .collect(),
            SearchType::Post => {
                let preview_chars = self.settings.analysis.text_preview_chars;
                reddit
                    .search_posts(&args.query, subreddit, time_filter, args.limit)
                    .await?
                    .iter()
                    .map(|post| post_summary(post, preview_chars))
                    .collect()
            }
        };

        info!("Search returned {} results", results.len());
        Ok(json!({
            "status": "success",
            "query": args.query,
            "search_type": search_type.as_str(),
            "subreddit": subreddit,
            "time_filter": time_filter.as_str(),
            "result_count": results.len(),
            "results": results,
        }))
    }

    /// Analyze a post's comments: sentiment, keywords and topics.
    #[instrument(skip(self, args), fields(post_url = %args.post_url))]
    pub async fn analyze_reddit_post(&self, args: AnalyzePostArgs) -> Result<Value> {
        let reddit = self.reddit()?;
        let sort: CommentSort = args.comment_sort.parse()?;
        let post_id = extract_post_id(&args.post_url)?;

        let thread = reddit
            .fetch_post_with_comments(&post_id, sort, args.comment_limit)
            .await?;
        let analysis = self.analyzer.analyze_comments(&thread.comments);

        let comments: Vec<Value> = analysis
            .comments
            .iter()
            .take(self.settings.analysis.returned_comments)
            .map(|c| {
                json!({
                    "id": c.record.id,
                    "author": c.record.author,
                    "score": c.record.score,
                    "created_utc": format_timestamp(c.record.created_utc),
                    "text": c.preview,
                    "sentiment": c.sentiment,
                })
            })
            .collect();

        let post = &thread.post;
        info!(
            "Analyzed {} comments on post {}",
            analysis.comment_count, post.id
        );
        Ok(json!({
            "status": "success",
            "post_info": {
                "id": post.id,
                "title": post.title,
                "author": post.author,
                "subreddit": post.subreddit,
                "score": post.score,
                "upvote_ratio": post.upvote_ratio,
                "num_comments": post.num_comments,
                "created_utc": format_timestamp(post.created_utc),
                "selftext": post.selftext,
                "url": post.url,
                "is_nsfw": post.is_nsfw,
            },
            "comment_analysis": analysis,
            "comments": comments,
        }))
    }

    /// Compare top posts across subreddits.
    ///
    /// Subreddits are fetched one after another with a fixed pause between
    /// them. A failing subreddit is recorded inline and does not abort the
    /// analysis.
    #[instrument(skip(self, args))]
    pub async fn analyze_reddit_trends(&self, args: TrendArgs) -> Result<Value> {
        let reddit = self.reddit()?;
        let period: TimePeriod = args.time_period.parse()?;
        let limit = args.limit.unwrap_or(self.settings.trends.default_limit);
        let subreddits = trend_subreddits(args.subreddits);
        let delay = Duration::from_millis(self.settings.trends.request_delay_ms);

        let mut outcomes = Vec::with_capacity(subreddits.len());
        for (i, name) in subreddits.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match reddit.top_posts(name, period, limit).await {
                Ok(posts) => {
                    let stats = self.analyzer.subreddit_stats(name, &posts);
                    info!("r/{}: {} posts", name, stats.post_count);
                    outcomes.push(SubredditOutcome::Analyzed(stats));
                }
                Err(e) => {
                    warn!("r/{} failed: {}", name, e);
                    outcomes.push(SubredditOutcome::Failed {
                        name: name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let report = self.aggregator.aggregate(&outcomes);
        Ok(json!({
            "status": "success",
            "analysis_period": period.as_str(),
            "subreddits_analyzed": subreddits,
            "trending_keywords": report.trending_keywords,
            "overall_sentiment": {
                "average_polarity": report.average_polarity,
                "sentiment_label": report.sentiment_label,
            },
            "subreddit_stats": report.subreddit_stats,
            "subreddit_activity": report.subreddit_activity,
            "topic_analysis": report.topic_analysis,
            "trending_posts": report.trending_posts,
        }))
    }

    /// Fetch a web page as extracted text or raw HTML.
    #[instrument(skip(self, args), fields(url = %args.url))]
    pub async fn fetch_webpage(&self, args: FetchArgs) -> Result<Value> {
        let page = self
            .fetcher
            .fetch(&args.url, args.extract_text, args.user_agent.as_deref())
            .await?;

        let mut body = serde_json::to_value(&page)?;
        if let Value::Object(map) = &mut body {
            map.insert("status".to_string(), json!("success"));
        }
        Ok(body)
    }
}

/// Subreddit name without surrounding whitespace or an `r/` prefix.
fn normalize_subreddit(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("r/").unwrap_or(name).trim()
}

/// Requested subreddits with blanks and duplicates removed, or `["all"]`.
fn trend_subreddits(requested: Option<Vec<String>>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in requested.unwrap_or_default() {
        let name = normalize_subreddit(&name).to_string();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    if names.is_empty() {
        names.push(DEFAULT_TREND_SUBREDDIT.to_string());
    }
    names
}

fn post_summary(post: &PostRecord, preview_chars: usize) -> Value {
    json!({
        "id": post.id,
        "title": post.title,
        "author": post.author,
        "subreddit": post.subreddit,
        "score": post.score,
        "upvote_ratio": post.upvote_ratio,
        "num_comments": post.num_comments,
        "created_utc": format_timestamp(post.created_utc),
        "url": post.url,
        "is_self": post.is_self,
        "selftext_preview": preview(&post.selftext, preview_chars),
        "is_nsfw": post.is_nsfw,
    })
}

fn subreddit_summary(subreddit: &SubredditRecord) -> Value {
    json!({
        "name": subreddit.name,
        "title": subreddit.title,
        "description": subreddit.description,
        "subscribers": subreddit.subscribers,
        "url": subreddit.url,
        "created_utc": format_timestamp(subreddit.created_utc),
        "is_nsfw": subreddit.is_nsfw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TextRecord;
    use crate::reddit::PostThread;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory Reddit source.
    #[derive(Default)]
    struct FakeReddit {
        top: HashMap<String, Vec<PostRecord>>,
        thread: Option<PostThread>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RedditSource for FakeReddit {
        async fn search_posts(
            &self,
            query: &str,
            _subreddit: Option<&str>,
            _time_filter: TimeFilter,
            limit: u32,
        ) -> Result<Vec<PostRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .top
                .values()
                .flatten()
                .filter(|p| p.title.to_lowercase().contains(&query.to_lowercase()))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn search_subreddits(&self, _query: &str, _limit: u32) -> Result<Vec<SubredditRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![SubredditRecord {
                name: "rust".into(),
                title: "Rust".into(),
                description: "Rust language".into(),
                subscribers: 300_000,
                url: "https://www.reddit.com/r/rust/".into(),
                created_utc: 1_290_000_000.0,
                is_nsfw: false,
            }])
        }

        async fn fetch_post_with_comments(
            &self,
            post_id: &str,
            _sort: CommentSort,
            limit: u32,
        ) -> Result<PostThread> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut thread = self
                .thread
                .clone()
                .filter(|t| t.post.id == post_id)
                .ok_or_else(|| RedsightError::UpstreamFetch(format!("404 Not Found: {}", post_id)))?;
            thread.comments.truncate(limit as usize);
            Ok(thread)
        }

        async fn top_posts(
            &self,
            subreddit: &str,
            _period: TimePeriod,
            limit: u32,
        ) -> Result<Vec<PostRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.top
                .get(subreddit)
                .map(|posts| posts.iter().take(limit as usize).cloned().collect())
                .ok_or_else(|| RedsightError::UpstreamFetch(format!("403 Forbidden: /r/{}/top", subreddit)))
        }
    }

    fn post(id: &str, subreddit: &str, title: &str, selftext: &str, score: i64) -> PostRecord {
        PostRecord {
            id: id.into(),
            title: title.into(),
            selftext: selftext.into(),
            author: "ferris".into(),
            subreddit: subreddit.into(),
            score,
            upvote_ratio: 0.9,
            num_comments: 12,
            created_utc: 1_700_000_000.0,
            url: format!("https://www.reddit.com/r/{subreddit}/comments/{id}/"),
            is_self: true,
            is_nsfw: false,
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.reddit.client_id = Some("id".into());
        settings.reddit.client_secret = Some("secret".into());
        settings.trends.request_delay_ms = 0;
        settings
    }

    fn fake() -> FakeReddit {
        let mut top = HashMap::new();
        top.insert(
            "rust".to_string(),
            vec![
                post("r1", "rust", "Great compiler release", "The compiler is great", 900),
                post("r2", "rust", "Compiler errors are helpful", "", 400),
            ],
        );
        let comments = [
            "great product",
            "I hate this",
            "meh ok",
            "great value great",
            "terrible terrible",
        ]
        .iter()
        .enumerate()
        .map(|(i, text)| TextRecord {
            id: format!("c{i}"),
            text: text.to_string(),
            score: 1,
            created_utc: 1_700_000_000.0,
            author: format!("user{i}"),
        })
        .collect();

        FakeReddit {
            top,
            thread: Some(PostThread {
                post: post("abc123", "rust", "What do you think?", "Opinions please", 50),
                comments,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    fn service_with(settings: Settings, source: FakeReddit) -> (ToolService, Arc<FakeReddit>) {
        let source = Arc::new(source);
        let service = ToolService::with_source(settings, source.clone()).unwrap();
        (service, source)
    }

    #[tokio::test]
    async fn test_missing_credentials_makes_no_call() {
        let (service, source) = service_with(Settings::default(), fake());

        for (tool, args) in [
            (SEARCH_REDDIT, json!({"query": "rust"})),
            (ANALYZE_REDDIT_POST, json!({"post_url": "https://www.reddit.com/r/rust/comments/abc123/x/"})),
            (ANALYZE_REDDIT_TRENDS, json!({})),
        ] {
            let reply = service.call(tool, Some(args)).await;
            assert_eq!(reply.error_kind, Some("missing_credentials"));
            assert_eq!(reply.body["status"], "error");
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_parameters() {
        let (service, source) = service_with(settings(), fake());

        let reply = service
            .call(SEARCH_REDDIT, Some(json!({"query": "rust", "time_filter": "decade"})))
            .await;
        assert_eq!(reply.error_kind, Some("invalid_parameter"));
        assert!(reply.body["message"].as_str().unwrap().contains("decade"));

        let reply = service
            .call(
                ANALYZE_REDDIT_POST,
                Some(json!({"post_url": "https://www.reddit.com/r/rust/comments/abc123/x/", "comment_sort": "random"})),
            )
            .await;
        assert_eq!(reply.error_kind, Some("invalid_parameter"));

        let reply = service
            .call(ANALYZE_REDDIT_TRENDS, Some(json!({"time_period": "all"})))
            .await;
        assert_eq!(reply.error_kind, Some("invalid_parameter"));

        let reply = service
            .call(ANALYZE_REDDIT_POST, Some(json!({"post_url": "https://example.com/"})))
            .await;
        assert_eq!(reply.error_kind, Some("invalid_input"));

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (service, _) = service_with(settings(), fake());
        let reply = service.call("delete_reddit", None).await;
        assert!(reply.is_error());
        assert_eq!(reply.error_kind, Some("unknown_tool"));
    }

    #[tokio::test]
    async fn test_search_posts_and_subreddits() {
        let (service, _) = service_with(settings(), fake());

        let reply = service
            .call(SEARCH_REDDIT, Some(json!({"query": "compiler"})))
            .await;
        assert!(!reply.is_error());
        assert_eq!(reply.body["result_count"], 2);
        assert_eq!(reply.body["time_filter"], "month");
        assert!(reply.body["subreddit"].is_null());
        assert_eq!(reply.body["results"][0]["created_utc"], "2023-11-14 22:13:20");

        let reply = service
            .call(SEARCH_REDDIT, Some(json!({"query": "rust", "search_type": "subreddit"})))
            .await;
        assert_eq!(reply.body["results"][0]["name"], "rust");
        assert_eq!(reply.body["results"][0]["subscribers"], 300_000);
    }

    #[tokio::test]
    async fn test_analyze_post() {
        let (service, _) = service_with(settings(), fake());
        let reply = service
            .call(
                ANALYZE_REDDIT_POST,
                Some(json!({"post_url": "https://www.reddit.com/r/rust/comments/abc123/what_do_you_think/"})),
            )
            .await;

        assert!(!reply.is_error(), "{}", reply.body);
        let body = &reply.body;
        assert_eq!(body["post_info"]["id"], "abc123");
        let analysis = &body["comment_analysis"];
        assert_eq!(analysis["comment_count"], 5);
        let dist = &analysis["overall_sentiment"]["sentiment_distribution"];
        let total = dist["positive"].as_u64().unwrap()
            + dist["neutral"].as_u64().unwrap()
            + dist["negative"].as_u64().unwrap();
        assert_eq!(total, 5);
        assert_eq!(analysis["top_keywords"][0]["word"], "great");
        assert_eq!(body["comments"].as_array().unwrap().len(), 5);
        assert_eq!(body["comments"][0]["sentiment"]["label"], "positive");
    }

    #[tokio::test]
    async fn test_comment_limit_and_returned_comments() {
        let mut settings = settings();
        settings.analysis.returned_comments = 2;
        let (service, _) = service_with(settings, fake());

        let reply = service
            .call(
                ANALYZE_REDDIT_POST,
                Some(json!({"post_url": "https://www.reddit.com/r/rust/comments/abc123/x/", "comment_limit": 4})),
            )
            .await;
        assert_eq!(reply.body["comment_analysis"]["comment_count"], 4);
        assert_eq!(reply.body["comments"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_trends_partial_failure() {
        let (service, source) = service_with(settings(), fake());
        let reply = service
            .call(
                ANALYZE_REDDIT_TRENDS,
                Some(json!({"subreddits": ["rust", "private_sub", "rust"], "time_period": "week"})),
            )
            .await;

        assert!(!reply.is_error(), "{}", reply.body);
        let body = &reply.body;
        assert_eq!(body["subreddits_analyzed"], json!(["rust", "private_sub"]));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        let stats = body["subreddit_stats"].as_array().unwrap();
        assert_eq!(stats[0]["subreddit"], "rust");
        assert_eq!(stats[0]["post_count"], 2);
        assert_eq!(stats[1]["subreddit"], "private_sub");
        assert!(stats[1]["error"].as_str().unwrap().contains("403"));

        let activity = body["subreddit_activity"].as_array().unwrap();
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0]["subreddit"], "rust");
        assert_eq!(body["trending_posts"][0]["id"], "r1");

        let topic = &body["topic_analysis"][0];
        assert_eq!(topic["topic"], "compiler");
        assert_eq!(topic["post_count"], 2);
    }

    #[tokio::test]
    async fn test_trends_default_subreddit() {
        let mut source = fake();
        source.top.insert("all".to_string(), vec![post("a1", "pics", "Sunset", "", 10)]);
        let (service, _) = service_with(settings(), source);

        let reply = service.call(ANALYZE_REDDIT_TRENDS, Some(json!({"subreddits": []}))).await;
        assert_eq!(reply.body["subreddits_analyzed"], json!(["all"]));
        assert_eq!(reply.body["analysis_period"], "day");
    }

    #[tokio::test]
    async fn test_search_normalizes_subreddit() {
        let (service, _) = service_with(settings(), fake());
        let reply = service
            .call(SEARCH_REDDIT, Some(json!({"query": "compiler", "subreddit": " r/rust "})))
            .await;
        assert!(!reply.is_error(), "{}", reply.body);
        assert_eq!(reply.body["subreddit"], "rust");

        let reply = service
            .call(SEARCH_REDDIT, Some(json!({"query": "compiler", "subreddit": "  "})))
            .await;
        assert!(reply.body["subreddit"].is_null());
    }

    #[tokio::test]
    async fn test_fetch_malformed_url_is_upstream_failure() {
        let (service, _) = service_with(settings(), fake());
        for url in ["not a url", "ftp://example.com/file"] {
            let reply = service.call(FETCH_WEBPAGE, Some(json!({"url": url}))).await;
            assert_eq!(reply.error_kind, Some("upstream_fetch"), "{url}");
            assert_eq!(reply.body["status"], "error");
        }
    }

    #[test]
    fn test_trend_subreddits_normalized() {
        assert_eq!(
            trend_subreddits(Some(vec!["r/rust".into(), " rust ".into(), "".into(), "golang".into()])),
            vec!["rust", "golang"]
        );
        assert_eq!(trend_subreddits(None), vec!["all"]);
        assert_eq!(normalize_subreddit(" r/rust "), "rust");
        assert_eq!(normalize_subreddit("rust"), "rust");
    }
}
