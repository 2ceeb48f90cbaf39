//! # Messenger Bot
//!
//! Entry point of the `messenger-bot` binary: serves the webhook or runs a
//! one-off Graph API action, configured from the environment.

use clap::Parser;
use messenger_bot::{action, config, logger};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let args = action::AppArgs::parse();

    let app_config = config::init_config()?;
    logger::setup_simple_logger(app_config.debug)?;

    args.run(app_config).await
}
