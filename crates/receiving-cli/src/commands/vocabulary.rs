use receiving_core::{SessionState, VocabularyKind};

use crate::app::{load_staging, save_staging, AppContext};
use crate::cli::VocabularyCommand;
use crate::helpers::position_to_index;
use crate::output::{vocabulary_json, vocabulary_rows};
use crate::ui::{badge, print, table, Badge, OutputMode};

pub fn handle_vocabulary(
    ctx: &AppContext,
    kind: VocabularyKind,
    command: &VocabularyCommand,
) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let staging = load_staging(&store)?;
    let mut state = SessionState::load(&mut store)?.with_staging(staging);

    match command {
        VocabularyCommand::Add { name } => {
            let ui_ctx = ctx.ui_context(false);
            let added = state.add_vocabulary_entry(&mut store, kind, name)?;
            if !ctx.quiet() {
                match ui_ctx.mode {
                    OutputMode::Pretty => print(
                        &ui_ctx,
                        &badge(&ui_ctx, Badge::Ok, &format!("Added {} '{}'", kind.label(), added)),
                    ),
                    OutputMode::Plain | OutputMode::Json => {
                        println!("status=ok");
                        println!("added={}", added);
                    }
                }
            }
        }
        VocabularyCommand::Remove { index } => {
            let ui_ctx = ctx.ui_context(false);
            let removed =
                state.remove_vocabulary_entry(&mut store, kind, position_to_index(*index)?)?;
            // staged drafts may have been pointed at a new selection
            save_staging(&mut store, &state.staging)?;
            if !ctx.quiet() {
                match ui_ctx.mode {
                    OutputMode::Pretty => print(
                        &ui_ctx,
                        &badge(
                            &ui_ctx,
                            Badge::Ok,
                            &format!("Removed {} '{}'", kind.label(), removed),
                        ),
                    ),
                    OutputMode::Plain | OutputMode::Json => {
                        println!("status=ok");
                        println!("removed={}", removed);
                    }
                }
            }
        }
        VocabularyCommand::List { json } => {
            let ui_ctx = ctx.ui_context(*json);
            let vocabulary = state.vocabulary(kind);
            if ui_ctx.mode.is_json() {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&vocabulary_json(vocabulary))?
                );
            } else if vocabulary.is_empty() {
                print(&ui_ctx, "No entries.");
            } else {
                print(
                    &ui_ctx,
                    &table(&ui_ctx, &["#", kind.label()], &vocabulary_rows(vocabulary)),
                );
            }
        }
    }
    Ok(())
}
