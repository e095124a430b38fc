//! Raw Reddit API JSON types and their conversion into analysis records.

use crate::analysis::{PostRecord, SubredditRecord, TextRecord, DELETED_AUTHOR};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::VecDeque;

const REDDIT_WEB_BASE: &str = "https://www.reddit.com";

/// A `Listing` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub data: ListingData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
    pub after: Option<String>,
}

/// One child of a listing, tagged by its `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "TaggedThing")]
pub enum Thing {
    Comment(Box<RawComment>),
    Post(Box<RawPost>),
    Subreddit(Box<RawSubreddit>),
    /// Collapsed "load more comments" stub.
    More,
    Unknown,
}

#[derive(Deserialize)]
struct TaggedThing {
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl TryFrom<TaggedThing> for Thing {
    type Error = serde_json::Error;

    fn try_from(tagged: TaggedThing) -> std::result::Result<Self, Self::Error> {
        Ok(match tagged.kind.as_str() {
            "t1" => Thing::Comment(Box::new(serde_json::from_value(tagged.data)?)),
            "t3" => Thing::Post(Box::new(serde_json::from_value(tagged.data)?)),
            "t5" => Thing::Subreddit(Box::new(serde_json::from_value(tagged.data)?)),
            "more" => Thing::More,
            _ => Thing::Unknown,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub author: Option<String>,
    pub subreddit: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub num_comments: u64,
    pub created_utc: f64,
    pub permalink: String,
    pub is_self: bool,
    pub over_18: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawComment {
    pub id: String,
    pub body: String,
    pub author: Option<String>,
    pub score: i64,
    pub created_utc: f64,
    pub replies: Replies,
}

/// Comment replies: a nested listing, or `""` when there are none.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Replies {
    Listing(Box<Listing>),
    Empty(IgnoredAny),
}

impl Default for Replies {
    fn default() -> Self {
        Replies::Empty(IgnoredAny)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSubreddit {
    pub display_name: String,
    pub title: String,
    pub public_description: String,
    pub subscribers: Option<u64>,
    pub url: String,
    pub created_utc: f64,
    pub over18: Option<bool>,
}

fn author_label(author: Option<String>) -> String {
    match author {
        Some(name) if !name.is_empty() => name,
        _ => DELETED_AUTHOR.to_string(),
    }
}

impl From<RawPost> for PostRecord {
    fn from(raw: RawPost) -> Self {
        PostRecord {
            id: raw.id,
            title: raw.title,
            selftext: raw.selftext,
            author: author_label(raw.author),
            subreddit: raw.subreddit,
            score: raw.score,
            upvote_ratio: raw.upvote_ratio,
            num_comments: raw.num_comments,
            created_utc: raw.created_utc,
            url: format!("{}{}", REDDIT_WEB_BASE, raw.permalink),
            is_self: raw.is_self,
            is_nsfw: raw.over_18,
        }
    }
}

impl From<RawSubreddit> for SubredditRecord {
    fn from(raw: RawSubreddit) -> Self {
        SubredditRecord {
            name: raw.display_name,
            title: raw.title,
            description: raw.public_description,
            subscribers: raw.subscribers.unwrap_or(0),
            url: format!("{}{}", REDDIT_WEB_BASE, raw.url),
            created_utc: raw.created_utc,
            is_nsfw: raw.over18.unwrap_or(false),
        }
    }
}

impl Listing {
    pub fn into_posts(self) -> Vec<PostRecord> {
        self.data
            .children
            .into_iter()
            .filter_map(|thing| match thing {
                Thing::Post(raw) => Some(PostRecord::from(*raw)),
                _ => None,
            })
            .collect()
    }

    pub fn into_subreddits(self) -> Vec<SubredditRecord> {
        self.data
            .children
            .into_iter()
            .filter_map(|thing| match thing {
                Thing::Subreddit(raw) => Some(SubredditRecord::from(*raw)),
                _ => None,
            })
            .collect()
    }
}

/// Flatten a comment tree level by level.
///
/// Top-level comments come first, then their replies, and so on. `more`
/// stubs are dropped, as are comments whose author was deleted.
pub fn flatten_comments(listing: Listing) -> Vec<TextRecord> {
    let mut queue: VecDeque<Thing> = listing.data.children.into();
    let mut records = Vec::new();

    while let Some(thing) = queue.pop_front() {
        let Thing::Comment(raw) = thing else {
            continue;
        };
        let raw = *raw;
        if let Replies::Listing(replies) = raw.replies {
            queue.extend(replies.data.children);
        }

        let author = author_label(raw.author);
        if author == DELETED_AUTHOR {
            continue;
        }
        records.push(TextRecord {
            id: raw.id,
            text: raw.body,
            score: raw.score,
            created_utc: raw.created_utc,
            author,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comment(id: &str, author: &str, body: &str, replies: serde_json::Value) -> serde_json::Value {
        json!({
            "kind": "t1",
            "data": {
                "id": id,
                "author": author,
                "body": body,
                "score": 3,
                "created_utc": 1700000000.0,
                "replies": replies
            }
        })
    }

    #[test]
    fn test_post_listing_conversion() {
        let listing: Listing = serde_json::from_value(json!({
            "kind": "Listing",
            "data": {
                "after": "t3_next",
                "children": [{
                    "kind": "t3",
                    "data": {
                        "id": "abc123",
                        "title": "Hello",
                        "selftext": "",
                        "author": "ferris",
                        "subreddit": "rust",
                        "score": 42,
                        "upvote_ratio": 0.95,
                        "num_comments": 7,
                        "created_utc": 1640995200.0,
                        "permalink": "/r/rust/comments/abc123/hello/",
                        "is_self": true,
                        "over_18": false,
                        "thumbnail": "self"
                    }
                }]
            }
        }))
        .unwrap();

        assert_eq!(listing.data.after.as_deref(), Some("t3_next"));
        let posts = listing.into_posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].url, "https://www.reddit.com/r/rust/comments/abc123/hello/");
        assert_eq!(posts[0].score, 42);
    }

    #[test]
    fn test_subreddit_conversion() {
        let listing: Listing = serde_json::from_value(json!({
            "kind": "Listing",
            "data": {
                "children": [{
                    "kind": "t5",
                    "data": {
                        "display_name": "rust",
                        "title": "The Rust Programming Language",
                        "public_description": "A place for all things Rust",
                        "subscribers": null,
                        "url": "/r/rust/",
                        "created_utc": 1290000000.0,
                        "over18": false
                    }
                }]
            }
        }))
        .unwrap();

        let subs = listing.into_subreddits();
        assert_eq!(subs[0].name, "rust");
        assert_eq!(subs[0].subscribers, 0);
        assert_eq!(subs[0].url, "https://www.reddit.com/r/rust/");
    }

    #[test]
    fn test_flatten_is_breadth_first_and_skips_deleted() {
        let nested = json!({
            "kind": "Listing",
            "data": { "children": [
                comment("c3", "carol", "reply to first", json!("")),
                { "kind": "more", "data": { "count": 4, "children": ["x1", "x2"] } }
            ]}
        });
        let listing: Listing = serde_json::from_value(json!({
            "kind": "Listing",
            "data": { "children": [
                comment("c1", "alice", "first", nested),
                comment("c2", "[deleted]", "[removed]", json!("")),
                comment("c4", "dave", "second", json!(""))
            ]}
        }))
        .unwrap();

        let records = flatten_comments(listing);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c4", "c3"]);
    }

    #[test]
    fn test_unknown_kinds_are_ignored() {
        let listing: Listing = serde_json::from_value(json!({
            "kind": "Listing",
            "data": { "children": [{ "kind": "t2", "data": { "name": "someone" } }] }
        }))
        .unwrap();
        assert!(listing.into_posts().is_empty());
    }
}
