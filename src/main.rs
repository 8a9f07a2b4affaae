//! CLI tool for printing the latest original post of an account
//! Replies and retweets are skipped, the post is read from a Nitter instance
use env_logger::Env;
use log::debug;
use std::io;
use std::time::Duration;
use structopt::StructOpt;

use config::FetchConfig;
use error::FetchError;
use nitter_client::NitterClient;
mod cli;
mod config;
mod error;
mod fetch_app;
mod nitter_client;
mod nitter_object;

use cli::CommandLineArgs;

/// Entrypoint Function
///
/// It prints `{"id": ..., "link": ...}` for the latest post and nothing otherwise,
/// the exit status is 0 either way unless `strict` is enabled
/// * `NITFETCH_LOG_LEVEL` Log level setting e.g. `NITFETCH_LOG_LEVEL=nitfetch=debug`, it is `off` by default
/// * `NITFETCH_*` Config overrides, see [`FetchConfig::apply_env()`]
fn main() -> anyhow::Result<()> {
    let env = Env::default().filter_or("NITFETCH_LOG_LEVEL", "off");
    env_logger::init_from_env(env);

    let CommandLineArgs {
        account,
        ignored,
        config_file,
    } = CommandLineArgs::from_args();
    debug!("Ignored arguments: {:?}", &ignored);

    // Without an account nothing is read, not even the config
    let account = match fetch_app::given_account(account.as_deref()) {
        Some(account) => account,
        None => return Ok(()),
    };

    let config = FetchConfig::load(config_file)?;
    let stdout = io::stdout();
    let result = NitterClient::new(&config.instance, Duration::from_secs(config.timeout_secs))
        .map_err(FetchError::RetrievalFailed)
        .and_then(|nt_client| {
            fetch_app::run(&nt_client, Some(account), &config, &mut stdout.lock())
        });

    fetch_app::finish(result, config.strict)
}
