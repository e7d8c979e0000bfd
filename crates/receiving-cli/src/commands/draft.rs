use receiving_core::{Clock, DraftRef, SessionState, SystemClock};

use crate::app::{load_staging, save_staging, AppContext};
use crate::cli::DraftCommand;
use crate::helpers::row_update;
use crate::output::{draft_json, draft_rows, DRAFT_HEADERS};
use crate::ui::{badge, hint, print, table, Badge};

pub fn handle_draft(ctx: &AppContext, command: &DraftCommand) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let staging = load_staging(&store)?;
    let mut state = SessionState::load(&mut store)?.with_staging(staging);

    match command {
        DraftCommand::Add { fields } => {
            let update = row_update(fields, &state.suppliers, &state.stock_codes)?;
            let draft_ref = state.add_draft(SystemClock.today())?;
            if !update.is_empty() {
                state.staging.update_draft(draft_ref, update)?;
            }
            save_staging(&mut store, &state.staging)?;
            report(ctx, &format!("Staged draft {}", draft_ref), "staged", draft_ref);
        }
        DraftCommand::Update { draft, fields } => {
            let draft_ref = DraftRef::new(*draft);
            let update = row_update(fields, &state.suppliers, &state.stock_codes)?;
            if update.is_empty() {
                return Err(anyhow::anyhow!(
                    "Nothing to change.\nHint: Pass --supplier, --stock-code, --mass or --date."
                ));
            }
            state.staging.update_draft(draft_ref, update)?;
            save_staging(&mut store, &state.staging)?;
            report(ctx, &format!("Updated draft {}", draft_ref), "updated", draft_ref);
        }
        DraftCommand::Remove { draft } => {
            let draft_ref = DraftRef::new(*draft);
            state.staging.remove_draft(draft_ref)?;
            save_staging(&mut store, &state.staging)?;
            report(ctx, &format!("Removed draft {}", draft_ref), "removed", draft_ref);
        }
        DraftCommand::List { json } => {
            let ui_ctx = ctx.ui_context(*json);
            let drafts = state.staging.drafts();
            if ui_ctx.mode.is_json() {
                let values: Vec<_> = drafts.iter().map(draft_json).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else if drafts.is_empty() {
                print(&ui_ctx, "No drafts staged.");
                print(&ui_ctx, &hint(&ui_ctx, "receiving draft add"));
            } else {
                print(&ui_ctx, &table(&ui_ctx, &DRAFT_HEADERS, &draft_rows(drafts)));
            }
        }
        DraftCommand::Clear => {
            let cleared = state.staging.len();
            state.staging.clear();
            save_staging(&mut store, &state.staging)?;
            if !ctx.quiet() {
                let ui_ctx = ctx.ui_context(false);
                if ui_ctx.mode.is_pretty() {
                    print(
                        &ui_ctx,
                        &badge(&ui_ctx, Badge::Ok, &format!("Cleared {} draft(s)", cleared)),
                    );
                } else {
                    println!("status=ok");
                    println!("cleared={}", cleared);
                }
            }
        }
    }
    Ok(())
}

fn report(ctx: &AppContext, message: &str, key: &str, draft_ref: DraftRef) {
    if ctx.quiet() {
        return;
    }
    let ui_ctx = ctx.ui_context(false);
    if ui_ctx.mode.is_pretty() {
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, message));
    } else {
        println!("status=ok");
        println!("{}={}", key, draft_ref);
    }
}
