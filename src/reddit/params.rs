//! Validated tool parameters.
//!
//! Values are matched exactly; anything outside the allowed set becomes
//! [`RedsightError::InvalidParameter`] listing the accepted values.

use crate::error::RedsightError;
use serde::{Deserialize, Serialize};

/// What a search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Post,
    Subreddit,
}

impl SearchType {
    pub const ALLOWED: &'static [&'static str] = &["post", "subreddit"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Post => "post",
            SearchType::Subreddit => "subreddit",
        }
    }
}

impl std::str::FromStr for SearchType {
    type Err = RedsightError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "post" => Ok(SearchType::Post),
            "subreddit" => Ok(SearchType::Subreddit),
            _ => Err(RedsightError::invalid_parameter("search_type", s, Self::ALLOWED)),
        }
    }
}

/// Time window for post search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilter {
    pub const ALLOWED: &'static [&'static str] = &["hour", "day", "week", "month", "year", "all"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

impl std::str::FromStr for TimeFilter {
    type Err = RedsightError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "hour" => Ok(TimeFilter::Hour),
            "day" => Ok(TimeFilter::Day),
            "week" => Ok(TimeFilter::Week),
            "month" => Ok(TimeFilter::Month),
            "year" => Ok(TimeFilter::Year),
            "all" => Ok(TimeFilter::All),
            _ => Err(RedsightError::invalid_parameter("time_filter", s, Self::ALLOWED)),
        }
    }
}

/// Ordering of a post's comment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentSort {
    Top,
    Best,
    New,
    Controversial,
    Old,
    Qa,
}

impl CommentSort {
    pub const ALLOWED: &'static [&'static str] =
        &["top", "best", "new", "controversial", "old", "qa"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommentSort::Top => "top",
            CommentSort::Best => "best",
            CommentSort::New => "new",
            CommentSort::Controversial => "controversial",
            CommentSort::Old => "old",
            CommentSort::Qa => "qa",
        }
    }

    /// Value sent as the `sort` query parameter. The API calls "best" "confidence".
    pub fn api_value(&self) -> &'static str {
        match self {
            CommentSort::Best => "confidence",
            other => other.as_str(),
        }
    }
}

impl std::str::FromStr for CommentSort {
    type Err = RedsightError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "top" => Ok(CommentSort::Top),
            "best" => Ok(CommentSort::Best),
            "new" => Ok(CommentSort::New),
            "controversial" => Ok(CommentSort::Controversial),
            "old" => Ok(CommentSort::Old),
            "qa" => Ok(CommentSort::Qa),
            _ => Err(RedsightError::invalid_parameter("comment_sort", s, Self::ALLOWED)),
        }
    }
}

/// Window for a subreddit's top posts in trend analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimePeriod {
    pub const ALLOWED: &'static [&'static str] = &["hour", "day", "week", "month", "year"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Hour => "hour",
            TimePeriod::Day => "day",
            TimePeriod::Week => "week",
            TimePeriod::Month => "month",
            TimePeriod::Year => "year",
        }
    }
}

impl std::str::FromStr for TimePeriod {
    type Err = RedsightError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "hour" => Ok(TimePeriod::Hour),
            "day" => Ok(TimePeriod::Day),
            "week" => Ok(TimePeriod::Week),
            "month" => Ok(TimePeriod::Month),
            "year" => Ok(TimePeriod::Year),
            _ => Err(RedsightError::invalid_parameter("time_period", s, Self::ALLOWED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!("post".parse::<SearchType>().unwrap(), SearchType::Post);
        assert_eq!("all".parse::<TimeFilter>().unwrap(), TimeFilter::All);
        assert_eq!("qa".parse::<CommentSort>().unwrap(), CommentSort::Qa);
        assert_eq!("year".parse::<TimePeriod>().unwrap(), TimePeriod::Year);
    }

    #[test]
    fn test_parse_invalid_lists_allowed_values() {
        let err = "decade".parse::<TimeFilter>().unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
        let message = err.to_string();
        assert!(message.contains("decade"));
        assert!(message.contains("hour, day, week, month, year, all"));

        // trend periods have no "all"
        assert!("all".parse::<TimePeriod>().is_err());
        assert!("Post".parse::<SearchType>().is_err());
    }

    #[test]
    fn test_allowed_lists_round_trip() {
        for value in CommentSort::ALLOWED {
            assert_eq!(value.parse::<CommentSort>().unwrap().as_str(), *value);
        }
        for value in TimePeriod::ALLOWED {
            assert_eq!(value.parse::<TimePeriod>().unwrap().as_str(), *value);
        }
    }

    #[test]
    fn test_best_maps_to_confidence() {
        assert_eq!(CommentSort::Best.api_value(), "confidence");
        assert_eq!(CommentSort::Top.api_value(), "top");
    }
}
