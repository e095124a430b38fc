//! MCP tool definitions for Redsight.

use super::protocol::Tool;
use crate::reddit::{CommentSort, SearchType, TimeFilter, TimePeriod};
use crate::service::{ANALYZE_REDDIT_POST, ANALYZE_REDDIT_TRENDS, FETCH_WEBPAGE, SEARCH_REDDIT};
use serde_json::json;

/// Get all available tools.
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: SEARCH_REDDIT.to_string(),
            description: "Search Reddit for posts or subreddits. \
                Returns titles, scores, comment counts and text previews."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "search_type": {
                        "type": "string",
                        "enum": SearchType::ALLOWED,
                        "description": "Search posts or subreddits",
                        "default": "post"
                    },
                    "subreddit": {
                        "type": "string",
                        "description": "Restrict a post search to one subreddit"
                    },
                    "time_filter": {
                        "type": "string",
                        "enum": TimeFilter::ALLOWED,
                        "description": "Time window for post searches",
                        "default": "month"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results",
                        "default": 20
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: ANALYZE_REDDIT_POST.to_string(),
            description: "Analyze the comments of a Reddit post. \
                Returns overall sentiment, top keywords, topic groups and annotated comments."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "post_url": {
                        "type": "string",
                        "description": "Full Reddit post URL containing /comments/<id>/"
                    },
                    "comment_sort": {
                        "type": "string",
                        "enum": CommentSort::ALLOWED,
                        "description": "Comment ordering",
                        "default": "top"
                    },
                    "comment_limit": {
                        "type": "integer",
                        "description": "Maximum comments to analyze",
                        "default": 100
                    }
                },
                "required": ["post_url"]
            }),
        },
        Tool {
            name: ANALYZE_REDDIT_TRENDS.to_string(),
            description: "Compare top posts across subreddits. \
                Returns trending keywords, sentiment, subreddit activity, topics and top posts."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "subreddits": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Subreddit names without the r/ prefix",
                        "default": ["all"]
                    },
                    "time_period": {
                        "type": "string",
                        "enum": TimePeriod::ALLOWED,
                        "description": "Period for top posts",
                        "default": "day"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Posts to fetch per subreddit",
                        "default": 50
                    }
                }
            }),
        },
        Tool {
            name: FETCH_WEBPAGE.to_string(),
            description: "Fetch a web page and return its readable text or raw HTML."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "http or https URL"
                    },
                    "extract_text": {
                        "type": "boolean",
                        "description": "Return extracted text instead of raw HTML",
                        "default": true
                    },
                    "user_agent": {
                        "type": "string",
                        "description": "User-Agent header override"
                    }
                },
                "required": ["url"]
            }),
        },
    ]
}
