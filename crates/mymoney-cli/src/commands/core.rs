//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_config` - Resolve config with CLI overrides applied
//! - `open_controller` - Build a controller over the file-backed mirror
//! - `cmd_config` - Show the resolved configuration

use std::path::Path;

use anyhow::{Context, Result};
use mymoney_core::{ClientConfig, Controller, FileStore, FinanceApi};

use crate::terminal::TerminalUi;

pub type CliController<A> = Controller<A, FileStore, TerminalUi>;

/// Load config, letting `--data-dir` and `--api-url` win over everything else
pub fn load_config(data_dir: Option<&Path>, api_url: Option<&str>) -> Result<ClientConfig> {
    let mut config = match data_dir {
        Some(dir) => ClientConfig::load_in(dir.to_path_buf()),
        None => ClientConfig::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(url) = api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    Ok(config)
}

/// Open the local mirror and wrap it in a controller rendering to the terminal
pub fn open_controller<A>(api: A, config: ClientConfig) -> Result<CliController<A>>
where
    A: FinanceApi + Clone + 'static,
{
    open_controller_with(api, config, TerminalUi::new())
}

pub fn open_controller_with<A>(
    api: A,
    config: ClientConfig,
    ui: TerminalUi,
) -> Result<CliController<A>>
where
    A: FinanceApi + Clone + 'static,
{
    let store = FileStore::new(&config.data_dir).with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.data_dir.display()
        )
    })?;
    Ok(Controller::new(api, store, ui, config))
}

pub fn cmd_config(config: &ClientConfig) -> Result<()> {
    let s = &config.suggestions;

    println!();
    println!("⚙️  Configuration");
    println!("   API:              {}", config.api_base_url);
    println!("   User:             {}", config.user_id);
    println!("   Data dir:         {}", config.data_dir.display());
    println!("   Debounce:         {}ms", s.debounce.as_millis());
    println!("   Min description:  {} chars", s.min_description_chars);
    println!("   Auto-fill above:  {:.0}%", s.autofill_threshold * 100.0);
    println!("   Badge fade:       {}s", s.badge_fade.as_secs());
    println!("   Stale responses:  {:?}", s.stale_policy);
    println!("   Toast lifetime:   {}s", config.toast_ttl.as_secs());

    Ok(())
}
