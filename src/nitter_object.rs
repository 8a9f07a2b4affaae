//! Post objects scraped from a Nitter timeline and the record we print
use serde::{Deserialize, Serialize};

/// What kind of listing the client should scrape
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Timeline of a single account, `/<account>`
    #[default]
    User,
    /// Tweet search for `#<tag>`
    Hashtag,
    /// Free text tweet search
    Term,
}

impl std::str::FromStr for FetchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(FetchMode::User),
            "hashtag" => Ok(FetchMode::Hashtag),
            "term" => Ok(FetchMode::Term),
            other => Err(anyhow::anyhow!("Unknown fetch mode: {}", other)),
        }
    }
}

/// One timeline item, in the order Nitter rendered it
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Post {
    pub text: String,
    pub is_retweet: bool,
    /// Path of the post e.g. `/user/status/123#m`
    pub link: String,
    pub is_pinned: bool,
}

impl Post {
    /// Replies are recognized by their leading mention
    pub fn is_reply(&self) -> bool {
        self.text.starts_with('@')
    }

    /// Last path segment of the link without its fragment
    pub fn id(&self) -> &str {
        let last_segment = self.link.rsplit('/').next().unwrap_or_default();
        last_segment.split('#').next().unwrap_or_default()
    }
}

/// Output record, key order is kept as declared
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LatestPost {
    pub id: String,
    pub link: String,
}

impl LatestPost {
    /// * post: the selected post
    /// * viewer_origin: scheme + host of the alternate viewer e.g. `https://vxtwitter.com`
    pub fn from_post(post: &Post, viewer_origin: &str) -> Self {
        LatestPost {
            id: post.id().to_string(),
            link: format!("{}{}", viewer_origin, post.link),
        }
    }
}
