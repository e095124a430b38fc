//! Plain web page fetching and text extraction.

use crate::analysis::preview;
use crate::config::FetchSettings;
use crate::error::{RedsightError, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

static POST_CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[data-test-id="post-content"]"#).expect("valid post content selector")
});

const TITLE_NOT_FOUND: &str = "title not found";

/// Readable content pulled out of an HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub title: String,
    pub post_content: Option<String>,
    pub text: String,
}

/// Extract the title, Reddit post body and visible text from HTML.
///
/// `script` and `style` contents are skipped. Text is split into lines,
/// each line trimmed and split on double spaces, and empty pieces dropped.
pub fn extract_text(html: &str) -> ExtractedText {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    let text = raw
        .lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_else(|| TITLE_NOT_FOUND.to_string());

    let post_content = document
        .select(&POST_CONTENT_SELECTOR)
        .next()
        .map(|el| el.text().map(str::trim).collect::<String>());

    ExtractedText {
        title,
        post_content,
        text,
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if name == "script" || name == "style" {
                continue;
            }
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push('\n');
        }
    }
}

/// Page body in the requested form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageContent {
    Text {
        title: String,
        post_content: Option<String>,
        full_text: String,
    },
    Html {
        html: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPage {
    pub url: String,
    #[serde(flatten)]
    pub content: PageContent,
    /// Length of the extracted text or raw HTML, in characters, before truncation.
    pub content_length: usize,
    pub content_type: String,
    pub is_reddit_page: bool,
}

/// Validate that `raw` is an absolute http(s) URL.
///
/// A URL that cannot be fetched is a fetch failure, like a refused connection.
pub fn parse_web_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw)
        .map_err(|e| RedsightError::UpstreamFetch(format!("malformed URL '{}': {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(RedsightError::UpstreamFetch(format!(
            "unsupported URL scheme '{}' in '{}'",
            scheme, raw
        ))),
    }
}

fn is_reddit_host(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|host| host == "reddit.com" || host.ends_with(".reddit.com"))
}

/// Fetches pages over HTTP with a bounded timeout.
pub struct WebFetcher {
    http: Client,
    settings: FetchSettings,
    default_user_agent: String,
}

impl WebFetcher {
    pub fn new(settings: FetchSettings, default_user_agent: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            settings,
            default_user_agent: default_user_agent.into(),
        })
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str, extract: bool, user_agent: Option<&str>) -> Result<WebPage> {
        let parsed = parse_web_url(url)?;
        let agent = user_agent
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(&self.default_user_agent);

        let response = self
            .http
            .get(parsed.clone())
            .header(USER_AGENT, agent)
            .send()
            .await
            .map_err(|e| RedsightError::UpstreamFetch(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetching {} returned {}", url, status);
            return Err(RedsightError::UpstreamFetch(format!("{} returned {}", url, status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = response
            .text()
            .await
            .map_err(|e| RedsightError::UpstreamFetch(format!("failed to read {}: {}", url, e)))?;
        debug!("Fetched {} ({} bytes)", url, body.len());

        let max_chars = self.settings.max_chars;
        let (content, content_length) = if extract {
            let extracted = extract_text(&body);
            let length = extracted.text.chars().count();
            (
                PageContent::Text {
                    title: extracted.title,
                    post_content: extracted.post_content,
                    full_text: preview(&extracted.text, max_chars),
                },
                length,
            )
        } else {
            (
                PageContent::Html {
                    html: preview(&body, max_chars),
                },
                body.chars().count(),
            )
        };

        Ok(WebPage {
            url: url.to_string(),
            content,
            content_length,
            content_type,
            is_reddit_page: is_reddit_host(&parsed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const PAGE: &str = r#"<html>
<head><title>r/rust - Ownership question</title><style>body { color: red; }</style></head>
<body>
  <script>var tracking = true;</script>
  <h1>Ownership   question</h1>
  <div data-test-id="post-content">
    <p>Why does the borrow checker</p>
    <p>reject this?</p>
  </div>
  <p>

  </p>
</body>
</html>"#;

    #[test]
    fn test_extract_skips_script_and_style() {
        let extracted = extract_text(PAGE);
        assert_eq!(extracted.title, "r/rust - Ownership question");
        assert!(!extracted.text.contains("tracking"));
        assert!(!extracted.text.contains("color"));
        assert!(extracted.text.contains("Why does the borrow checker"));
        assert!(!extracted.text.lines().any(|l| l.trim().is_empty()));
        // double spaces split a line into chunks
        assert!(extracted.text.contains("Ownership\nquestion"));
    }

    #[test]
    fn test_extract_post_content_and_missing_title() {
        let extracted = extract_text(PAGE);
        assert_eq!(
            extracted.post_content.as_deref(),
            Some("Why does the borrow checkerreject this?")
        );

        let bare = extract_text("<p>hello</p>");
        assert_eq!(bare.title, TITLE_NOT_FOUND);
        assert_eq!(bare.post_content, None);
        assert_eq!(bare.text, "hello");
    }

    #[test]
    fn test_parse_web_url() {
        assert!(parse_web_url("https://www.reddit.com/r/rust").is_ok());
        assert_eq!(parse_web_url("ftp://example.com").unwrap_err().kind(), "upstream_fetch");
        assert_eq!(parse_web_url("not a url").unwrap_err().kind(), "upstream_fetch");
    }

    #[test]
    fn test_reddit_host_detection() {
        assert!(is_reddit_host(&Url::parse("https://old.reddit.com/r/rust").unwrap()));
        assert!(!is_reddit_host(&Url::parse("https://notreddit.com/").unwrap()));
    }

    #[tokio::test]
    async fn test_fetch_truncates_text() {
        let mut server = Server::new_async().await;
        let body = format!("<html><head><title>Long</title></head><body><p>{}</p></body></html>", "a".repeat(50));
        let _page = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(body)
            .create_async()
            .await;

        let settings = FetchSettings {
            max_chars: 20,
            ..FetchSettings::default()
        };
        let fetcher = WebFetcher::new(settings, "test-agent").unwrap();
        let page = fetcher
            .fetch(&format!("{}/page", server.url()), true, None)
            .await
            .unwrap();

        assert_eq!(page.content_type, "text/html; charset=utf-8");
        assert!(!page.is_reddit_page);
        assert_eq!(page.content_length, 55);
        match page.content {
            PageContent::Text { title, full_text, .. } => {
                assert_eq!(title, "Long");
                assert_eq!(full_text.chars().count(), 23);
                assert!(full_text.ends_with("..."));
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mut server = Server::new_async().await;
        let _missing = server.mock("GET", "/gone").with_status(404).create_async().await;

        let fetcher = WebFetcher::new(FetchSettings::default(), "test-agent").unwrap();
        let err = fetcher
            .fetch(&format!("{}/gone", server.url()), false, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "upstream_fetch");
    }
}
