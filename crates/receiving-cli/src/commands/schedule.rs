use std::path::Path;

use dialoguer::Confirm;
use tracing::info;

use receiving_core::{EditSession, FileStore, LedgerStore, SessionState, SystemClock};

use crate::app::AppContext;
use crate::cli::{RowFields, ScheduleCommand};
use crate::commands::commit::write_file;
use crate::helpers::{position_to_index, row_update};
use crate::output::{receipts_json, schedule_rows, SCHEDULE_HEADERS};
use crate::ui::{badge, hint, print, table, Badge, UiContext};

pub fn handle_schedule(ctx: &AppContext, command: &ScheduleCommand) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;

    match command {
        ScheduleCommand::Show { json } => {
            let ui_ctx = ctx.ui_context(*json);
            let ledger = LedgerStore::new(&mut store).load()?;
            if ui_ctx.mode.is_json() {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&receipts_json(&ledger.receipts))?
                );
            } else if ledger.is_empty() {
                print(&ui_ctx, "No schedule data found. Commit some receipts first.");
                print(&ui_ctx, &hint(&ui_ctx, "receiving draft add && receiving commit"));
            } else {
                print(
                    &ui_ctx,
                    &table(&ui_ctx, &SCHEDULE_HEADERS, &schedule_rows(&ledger.receipts)),
                );
            }
        }
        ScheduleCommand::Export { path } => {
            let workbook = LedgerStore::new(&mut store)
                .export()?
                .ok_or_else(|| anyhow::anyhow!("No schedule data found. Commit some receipts first."))?;
            write_file(Path::new(path), &workbook)?;
            info!(path = %path, "exported schedule workbook");
            done(ctx, &format!("Exported schedule to {}", path), "exported", path);
        }
        ScheduleCommand::Import { path, yes } => {
            let bytes = std::fs::read(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
            let ui_ctx = ctx.ui_context(false);
            if !confirm(&ui_ctx, *yes, &format!("Replace the whole schedule with {}?", path))? {
                return cancelled(ctx);
            }
            let ledger = LedgerStore::new(&mut store).import(&bytes)?;
            done(
                ctx,
                &format!("Imported {} row(s) from {}", ledger.len(), path),
                "rows",
                &ledger.len().to_string(),
            );
        }
        ScheduleCommand::AddRow { fields } => {
            let row = edit(&mut store, |editor, state| {
                let index = editor.add_row(&state.suppliers, &state.stock_codes, &SystemClock);
                apply(editor, index, fields, state)?;
                Ok(index + 1)
            })?;
            done(ctx, &format!("Added schedule row {}", row), "row", &row.to_string());
        }
        ScheduleCommand::Edit { row, fields } => {
            let index = position_to_index(*row)?;
            edit(&mut store, |editor, state| apply(editor, index, fields, state))?;
            done(ctx, &format!("Updated schedule row {}", row), "row", &row.to_string());
        }
        ScheduleCommand::Delete { row, yes } => {
            let index = position_to_index(*row)?;
            let ui_ctx = ctx.ui_context(false);
            if !confirm(&ui_ctx, *yes, &format!("Delete schedule row {}?", row))? {
                return cancelled(ctx);
            }
            edit(&mut store, |editor, _| editor.remove_row(index).map(|_| ()).map_err(Into::into))?;
            done(ctx, &format!("Deleted schedule row {}", row), "row", &row.to_string());
        }
    }
    Ok(())
}

/// Load the schedule into an editor, apply `change`, and save the whole table.
fn edit<T>(
    store: &mut FileStore,
    change: impl FnOnce(&mut EditSession, &SessionState) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let state = SessionState::load(store)?;
    let mut ledger = LedgerStore::new(store);
    let mut editor = EditSession::load(&ledger.load()?);
    let result = change(&mut editor, &state)?;
    editor.save(&mut ledger)?;
    Ok(result)
}

fn apply(
    editor: &mut EditSession,
    index: usize,
    fields: &RowFields,
    state: &SessionState,
) -> anyhow::Result<()> {
    let update = row_update(fields, &state.suppliers, &state.stock_codes)?;
    editor.update_row(index, update)?;
    Ok(())
}

fn confirm(ui_ctx: &UiContext, yes: bool, prompt: &str) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    if !ui_ctx.is_interactive() {
        return Err(anyhow::anyhow!(
            "Refusing to change the schedule without confirmation.\nHint: Pass --yes."
        ));
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn cancelled(ctx: &AppContext) -> anyhow::Result<()> {
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        if ui_ctx.mode.is_pretty() {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "Cancelled"));
        } else {
            println!("status=cancelled");
        }
    }
    Ok(())
}

fn done(ctx: &AppContext, message: &str, key: &str, value: &str) {
    if ctx.quiet() {
        return;
    }
    let ui_ctx = ctx.ui_context(false);
    if ui_ctx.mode.is_pretty() {
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, message));
    } else {
        println!("status=ok");
        println!("{}={}", key, value);
    }
}
