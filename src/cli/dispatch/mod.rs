//! Maps validated CLI arguments to the action the binary runs.

use crate::{
    cli::{
        actions::{console::Args, Action},
        commands::{self, api},
    },
    config::AppConfig,
    navigation::Route,
};
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if the configuration is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let config = AppConfig::load(api::overrides(matches)).context("invalid configuration")?;

    let route = matches
        .get_one::<String>(commands::ARG_ROUTE)
        .map(|path| Route::parse(path));

    Ok(Action::Console(Args { config, route }))
}
