use std::path::PathBuf;

use tracing::info;

use receiving_core::{FileStore, SessionState};

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, write_config, ReceivingConfig};
use crate::ui::{print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {}\nHint: Pass --force to point it at a new store.",
            config_path.display()
        ));
    }

    let store_path = match args.path.as_deref().or(ctx.cli().store.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => default_store_path()?,
    };

    let mut store = FileStore::open(&store_path)?;
    let state = SessionState::load(&mut store)?;
    write_config(&config_path, &ReceivingConfig::new(&store_path))?;
    info!(store = %store_path.display(), "initialized receiving store");

    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Initialized receiving store",
                &[
                    ("Store", store_path.display().to_string()),
                    ("Config", config_path.display().to_string()),
                    ("Suppliers", state.suppliers.len().to_string()),
                    ("Stock codes", state.stock_codes.len().to_string()),
                ],
            ),
        );
    }
    Ok(())
}
