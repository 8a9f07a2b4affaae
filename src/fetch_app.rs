//! App module and interface between CLI and Nitter Client
//! pub methods are expected to call from [`#main`]
use log::{debug, info, warn};
use serde::Serialize;
use std::io::{self, Write};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::nitter_client::NitterClientTrait;
use crate::nitter_object::LatestPost;

/// Find the latest post which is neither a reply nor a retweet
///
/// It asks the client for `batch_size` recent posts and keeps the client's order,
/// the first post passing the filter is taken and nothing after it is looked at
/// * nt_client: Nitter Client or any other source of posts
/// * account: target account, `None` or an empty name means there is nothing to do
/// * config: batch size, fetch mode and viewer origin are used
pub fn fetch_latest(
    nt_client: &impl NitterClientTrait,
    account: Option<&str>,
    config: &FetchConfig,
) -> Result<LatestPost, FetchError> {
    let account = given_account(account).ok_or(FetchError::NoInput)?;
    debug!(
        "args: account={:?}, mode={:?}, batch_size={}",
        account, config.mode, config.batch_size
    );

    let posts = nt_client
        .fetch_posts(account, config.mode, config.batch_size)
        .map_err(FetchError::RetrievalFailed)?;
    debug!("Examine {} posts", posts.len());

    let selected = posts
        .iter()
        .find(|post| !post.is_reply() && !post.is_retweet)
        .ok_or(FetchError::NoMatch)?;
    info!(
        "Selected post: {} (pinned: {})",
        &selected.link, selected.is_pinned
    );

    Ok(LatestPost::from_post(selected, &config.viewer_origin))
}

/// The account to look up, an empty name counts as no account
pub fn given_account(account: Option<&str>) -> Option<&str> {
    account.filter(|account| !account.is_empty())
}

/// Write the post as a single JSON line e.g. `{"id": "111", "link": "https://..."}`
pub fn emit(writer: &mut impl Write, latest: &LatestPost) -> Result<(), FetchError> {
    let mut ser = serde_json::Serializer::with_formatter(&mut *writer, SpacedFormatter);
    latest
        .serialize(&mut ser)
        .map_err(|e| FetchError::Output(e.into()))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Fetch the latest post and print it
/// The returned error tells why nothing was printed, it's up to the caller to report it or not
pub fn run(
    nt_client: &impl NitterClientTrait,
    account: Option<&str>,
    config: &FetchConfig,
    writer: &mut impl Write,
) -> Result<(), FetchError> {
    let latest = fetch_latest(nt_client, account, config)?;
    emit(writer, &latest)
}

/// Turn the outcome of [`run()`] into the process result
///
/// Nothing printed is not a failure of the tool, so it is only logged unless `strict` is set
pub fn finish(result: Result<(), FetchError>, strict: bool) -> anyhow::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if strict => Err(e.into()),
        Err(e) => {
            warn!("Nothing printed: {}", e);
            Ok(())
        }
    }
}

/// Single line JSON with a space after `,` and `:`
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }
}
