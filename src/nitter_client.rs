//! Nitter Client
//! It scrapes the timeline pages of a Nitter instance and turns them into [`Post`]s
//! Define it as trait and implement it for the testability(using mock)
use std::thread::sleep;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::nitter_object::{FetchMode, Post};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Nitter Client
/// One blocking agent bound to one instance
pub struct NitterClient {
    agent: ureq::Agent,
    server: Url,
    page_interval: Duration,
}

/// Posts found on a single page and where the next page is
#[derive(Debug)]
pub struct TimelinePage {
    pub posts: Vec<Post>,
    pub cursor: Option<String>,
}

#[cfg(test)]
use mockall::automock;
#[cfg_attr(test, automock)]
pub trait NitterClientTrait {
    fn fetch_posts(&self, account: &str, mode: FetchMode, count: usize) -> Result<Vec<Post>>;
}

impl NitterClient {
    /// Constructs new Nitter Client
    /// * instance: base URL of the Nitter instance e.g. `https://nitter.net`
    /// * timeout: read/write timeout applied to every request
    pub fn new(instance: &str, timeout: Duration) -> Result<Self> {
        let server = Url::parse(instance)
            .map_err(|e| anyhow!("Nitter instance {:?} is not a valid URL: {}", instance, e))?;
        let agent: ureq::Agent = ureq::AgentBuilder::new()
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(USER_AGENT)
            .build();

        Ok(NitterClient {
            agent,
            server,
            page_interval: Duration::from_millis(500),
        })
    }

    /// URL of the first page for the listing
    /// The instance may live under a sub-path, its segments are kept in every mode
    fn first_page(&self, account: &str, mode: FetchMode) -> Result<Url> {
        let (segment, query) = match mode {
            FetchMode::User => (account.to_string(), None),
            FetchMode::Hashtag => (
                "search".to_string(),
                Some(format!("#{}", account.trim_start_matches('#'))),
            ),
            FetchMode::Term => ("search".to_string(), Some(account.to_string())),
        };

        let mut url = self.server.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Nitter instance {} can't be a base URL", self.server))?
            .pop_if_empty()
            .push(&segment);
        if let Some(query) = query {
            url.query_pairs_mut()
                .append_pair("f", "tweets")
                .append_pair("q", &query);
        }
        Ok(url)
    }

    fn fetch_page(&self, page_url: &Url) -> Result<TimelinePage> {
        debug!("GET {}", page_url);
        let response = self.agent.request_url("GET", page_url).call()?;
        let body = response.into_string()?;
        parse_timeline(&body)
    }
}

impl NitterClientTrait for NitterClient {
    /// Retrieve the recent posts
    /// Follows the "load more" cursor until `count` posts are collected or the timeline ends
    /// * account: account name, hashtag or search term depending on the mode
    /// * mode: which listing to read
    /// * count: upper bound of returned posts
    fn fetch_posts(&self, account: &str, mode: FetchMode, count: usize) -> Result<Vec<Post>> {
        let mut page_url = self.first_page(account, mode)?;
        let mut posts: Vec<Post> = Vec::new();

        while posts.len() < count {
            let page = self.fetch_page(&page_url)?;
            debug!("Got: {} posts", page.posts.len());
            if page.posts.is_empty() {
                break;
            }
            posts.extend(page.posts);

            let cursor = match page.cursor {
                Some(cursor) if posts.len() < count => cursor,
                _ => break,
            };
            page_url = page_url.join(&cursor)?;
            // 連続アクセスでブロックされないようにインターバルを挟む
            sleep(self.page_interval);
        }

        posts.truncate(count);
        Ok(posts)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {:?}", css, e))
}

fn has_match(element: &ElementRef, selector: &Selector) -> bool {
    element.select(selector).next().is_some()
}

/// Extract the posts and the next page cursor from a timeline page
///
/// A page showing an error panel (unknown or suspended account, rate limit, ...) is an error,
/// an empty timeline is not
pub fn parse_timeline(html: &str) -> Result<TimelinePage> {
    let document = Html::parse_document(html);

    let error_panel = selector("div.error-panel")?;
    if let Some(panel) = document.select(&error_panel).next() {
        let message = panel.text().collect::<String>();
        return Err(anyhow!("Nitter returned an error: {}", message.trim()));
    }

    let item = selector("div.timeline-item:not(.show-more)")?;
    let tweet_link = selector("a.tweet-link")?;
    let content = selector("div.tweet-content")?;
    let retweet_header = selector("div.retweet-header")?;
    let pinned = selector("div.pinned")?;
    let show_more = selector("div.show-more a")?;

    let posts = document
        .select(&item)
        .filter_map(|element| {
            let link = element.select(&tweet_link).next()?.value().attr("href")?;
            let text = element
                .select(&content)
                .next()
                .map(|c| c.text().collect::<String>())
                .unwrap_or_default();
            Some(Post {
                text: text.trim().to_string(),
                is_retweet: has_match(&element, &retweet_header),
                link: link.to_string(),
                is_pinned: has_match(&element, &pinned),
            })
        })
        .collect();

    // "Load newest" links back to the first page and carries no cursor
    let cursor = document
        .select(&show_more)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains("cursor="))
        .last()
        .map(|href| href.to_string());

    Ok(TimelinePage { posts, cursor })
}
