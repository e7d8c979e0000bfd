//! Application context for the Receiving CLI.
//!
//! Combines CLI arguments with the lazily-loaded config file.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use receiving_core::storage::DRAFTS_KEY;
use receiving_core::{FileStore, KeyValueStore, Session};

use crate::cli::Cli;
use crate::config::{default_labels_dir, default_schedule_dir, ReceivingConfig};
use crate::ui::UiContext;

use super::resolver::{load_config, resolve_store_path};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<ReceivingConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// UI context for a command, honouring its `--json` flag.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color)
    }

    /// The config file contents, loaded on first use. `None` before `init`.
    pub fn config(&self) -> anyhow::Result<Option<&ReceivingConfig>> {
        self.config
            .get_or_try_init(load_config)
            .map(Option::as_ref)
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, self.config()?)
    }

    /// Open the store. It must already exist (created by `init`).
    pub fn open_store(&self) -> anyhow::Result<FileStore> {
        let path = self.store_path()?;
        if !path.is_dir() {
            return Err(anyhow::anyhow!(
                "No store found at {}\n\nRun:\n  receiving init",
                path.display()
            ));
        }
        Ok(FileStore::open(path)?)
    }

    pub fn labels_dir(&self) -> anyhow::Result<PathBuf> {
        match self.config()? {
            Some(config) => config.labels_dir(),
            None => default_labels_dir(),
        }
    }

    pub fn schedule_dir(&self) -> anyhow::Result<PathBuf> {
        match self.config()? {
            Some(config) => config.schedule_dir(),
            None => default_schedule_dir(),
        }
    }
}

/// Load the staged drafts kept between invocations.
pub fn load_staging<S: KeyValueStore>(store: &S) -> anyhow::Result<Session> {
    match store.get(DRAFTS_KEY)? {
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("Staged drafts are unreadable: {}", e)),
        None => Ok(Session::new()),
    }
}

pub fn save_staging<S: KeyValueStore>(store: &mut S, session: &Session) -> anyhow::Result<()> {
    let text = serde_json::to_string(session)?;
    store.set(DRAFTS_KEY, &text)?;
    Ok(())
}
