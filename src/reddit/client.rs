//! Reddit OAuth API client.

use super::models::{flatten_comments, Listing, Thing};
use super::{CommentSort, PostThread, RedditSource, TimeFilter, TimePeriod};
use crate::analysis::{PostRecord, SubredditRecord};
use crate::config::{Credentials, RedditSettings};
use crate::error::{RedsightError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Largest page the listing endpoints return.
const MAX_PAGE_SIZE: u32 = 100;

/// Tokens are refreshed this long before they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

static SUBREDDIT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_+]{1,64}$").expect("valid subreddit regex"));

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Application-only OAuth client for the Reddit API.
pub struct RedditClient {
    http: Client,
    credentials: Credentials,
    api_base: String,
    auth_url: String,
    token: Mutex<Option<AccessToken>>,
}

impl RedditClient {
    /// Build a client from settings. Fails if credentials are missing.
    pub fn new(settings: &RedditSettings) -> Result<Self> {
        let credentials = settings.credentials()?;
        let http = Client::builder()
            .user_agent(&credentials.user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            credentials,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            auth_url: settings.auth_url.clone(),
            token: Mutex::new(None),
        })
    }

    /// Current bearer token, requesting a new one when needed.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        debug!("Requesting Reddit access token");
        let response = self
            .http
            .post(&self.auth_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| RedsightError::UpstreamFetch(format!("token request failed: {}", e)))?;
        let response = check_status(response, "access_token")?;
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| RedsightError::UpstreamFetch(format!("unparsable token response: {}", e)))?;

        info!("Obtained Reddit access token (expires in {}s)", body.expires_in);
        let token = AccessToken {
            value: body.access_token,
            expires_at: Instant::now() + Duration::from_secs(body.expires_in),
        };
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.api_base, endpoint);

        debug!("GET {} {:?}", endpoint, query);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .query(&[("raw_json", "1")])
            .send()
            .await
            .map_err(|e| RedsightError::UpstreamFetch(format!("request to {} failed: {}", endpoint, e)))?;
        let response = check_status(response, endpoint)?;

        response
            .json()
            .await
            .map_err(|e| RedsightError::UpstreamFetch(format!("unparsable response from {}: {}", endpoint, e)))
    }

    /// Follow `after` cursors until `limit` children are collected.
    async fn collect_listing(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        limit: u32,
    ) -> Result<Listing> {
        let mut combined = Listing::default();
        let mut after: Option<String> = None;

        while (combined.data.children.len() as u32) < limit {
            let remaining = limit - combined.data.children.len() as u32;
            let mut page_query = query.to_vec();
            page_query.push(("limit", remaining.min(MAX_PAGE_SIZE).to_string()));
            if let Some(cursor) = &after {
                page_query.push(("after", cursor.clone()));
            }

            let page: Listing = self.get_json(endpoint, &page_query).await?;
            let received = page.data.children.len();
            combined.data.children.extend(page.data.children);
            after = page.data.after;

            if received == 0 || after.is_none() {
                break;
            }
        }

        combined.data.children.truncate(limit as usize);
        Ok(combined)
    }
}

fn check_subreddit_name(name: &str) -> Result<()> {
    if SUBREDDIT_NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(RedsightError::InvalidInput(format!("invalid subreddit name: {}", name)))
    }
}

/// Map non-success statuses to descriptive upstream errors.
fn check_status(response: Response, endpoint: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!("Reddit request to {} failed with status {}", endpoint, status);
    let message = match status {
        StatusCode::UNAUTHORIZED => "401 Unauthorized: check the Reddit client id and secret".to_string(),
        StatusCode::FORBIDDEN => format!("403 Forbidden: {} is private or quarantined", endpoint),
        StatusCode::NOT_FOUND => format!("404 Not Found: {}", endpoint),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("60");
            format!("429 Too Many Requests: rate limited, retry after {}s", retry_after)
        }
        s if s.is_server_error() => format!("{}: Reddit server error", s),
        s => format!("{}: unexpected response from {}", s, endpoint),
    };
    Err(RedsightError::UpstreamFetch(message))
}

#[async_trait]
impl RedditSource for RedditClient {
    #[instrument(skip(self))]
    async fn search_posts(
        &self,
        query: &str,
        subreddit: Option<&str>,
        time_filter: TimeFilter,
        limit: u32,
    ) -> Result<Vec<PostRecord>> {
        let mut params = vec![
            ("q", query.to_string()),
            ("t", time_filter.as_str().to_string()),
            ("sort", "relevance".to_string()),
            ("type", "link".to_string()),
        ];
        let endpoint = match subreddit {
            Some(name) => {
                check_subreddit_name(name)?;
                params.push(("restrict_sr", "1".to_string()));
                format!("/r/{}/search", name)
            }
            None => "/search".to_string(),
        };

        let listing = self.collect_listing(&endpoint, &params, limit).await?;
        Ok(listing.into_posts())
    }

    #[instrument(skip(self))]
    async fn search_subreddits(&self, query: &str, limit: u32) -> Result<Vec<SubredditRecord>> {
        let params = [("q", query.to_string())];
        let listing = self
            .collect_listing("/subreddits/search", &params, limit)
            .await?;
        Ok(listing.into_subreddits())
    }

    #[instrument(skip(self))]
    async fn fetch_post_with_comments(
        &self,
        post_id: &str,
        sort: CommentSort,
        limit: u32,
    ) -> Result<PostThread> {
        let endpoint = format!("/comments/{}", post_id);
        let params = [
            ("sort", sort.api_value().to_string()),
            ("limit", limit.to_string()),
        ];
        let listings: Vec<Listing> = self.get_json(&endpoint, &params).await?;
        let mut listings = listings.into_iter();

        let post = listings
            .next()
            .and_then(|listing| {
                listing.data.children.into_iter().find_map(|thing| match thing {
                    Thing::Post(raw) => Some(PostRecord::from(*raw)),
                    _ => None,
                })
            })
            .ok_or_else(|| RedsightError::UpstreamFetch(format!("post {} not found", post_id)))?;

        let mut comments = listings.next().map(flatten_comments).unwrap_or_default();
        comments.truncate(limit as usize);

        debug!("Fetched post {} with {} comments", post.id, comments.len());
        Ok(PostThread { post, comments })
    }

    #[instrument(skip(self))]
    async fn top_posts(
        &self,
        subreddit: &str,
        period: TimePeriod,
        limit: u32,
    ) -> Result<Vec<PostRecord>> {
        check_subreddit_name(subreddit)?;
        let endpoint = format!("/r/{}/top", subreddit);
        let params = [("t", period.as_str().to_string())];
        let listing = self.collect_listing(&endpoint, &params, limit).await?;
        Ok(listing.into_posts())
    }
}
