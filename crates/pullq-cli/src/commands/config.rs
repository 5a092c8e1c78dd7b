//! `--test`: print the configuration as sites will see it.

use anyhow::anyhow;
use pullq_config::Config;

use crate::client::{CliError, CliResult};

pub(crate) fn render_config(config: &Config) -> CliResult<String> {
    config
        .to_json()
        .map_err(|err| CliError::failure(anyhow!("failed to format configuration: {err}")))
}

pub(crate) fn handle_config_test(config: &Config) -> CliResult<()> {
    println!("{}", render_config(config)?);
    if config.invalid.is_empty() {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "{} site(s) in the configuration are invalid",
            config.invalid.len()
        )))
    }
}
