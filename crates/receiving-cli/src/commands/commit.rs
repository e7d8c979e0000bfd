use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::info;

use receiving_core::{
    render_batch, JsonLabelRenderer, LabelPayload, LabelRenderer, LedgerStore, Receipt,
    UuidGenerator,
};

use crate::app::{load_staging, save_staging, AppContext};
use crate::cli::CommitArgs;
use crate::constants::SCHEDULE_FILE_NAME;
use crate::output::receipts_json;
use crate::ui::progress::label_bar;
use crate::ui::{badge, print, receipt, Badge, UiContext};

/// Ticks the progress bar as each label renders.
struct ProgressRenderer<'a> {
    inner: JsonLabelRenderer,
    bar: &'a ProgressBar,
}

impl LabelRenderer for ProgressRenderer<'_> {
    type Artifact = String;

    fn render(&mut self, payload: &LabelPayload) -> receiving_core::Result<String> {
        self.bar.set_message(payload.supplier.clone());
        let label = self.inner.render(payload)?;
        self.bar.inc(1);
        Ok(label)
    }
}

/// Files written for one commit.
struct Outputs {
    labels: PathBuf,
    schedule: PathBuf,
}

pub fn handle_commit(ctx: &AppContext, args: &CommitArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let mut store = ctx.open_store()?;
    let mut staging = load_staging(&store)?;
    // ids are on disk before the ledger is touched, so a retry recognises them
    if staging.reserve_ids(&mut UuidGenerator) > 0 {
        save_staging(&mut store, &staging)?;
    }

    let outcome = {
        let mut ledger = LedgerStore::new(&mut store);
        staging.commit_visible(&mut ledger)?
    };
    save_staging(&mut store, &staging).map_err(|e| {
        e.context(
            "Receipts were logged but the drafts could not be marked committed.\n\
             Hint: Run `receiving commit` again; logged receipts are not added twice.",
        )
    })?;

    let receipts = outcome.receipts();
    let outputs = if args.no_labels {
        None
    } else {
        Some(write_outputs(ctx, &ui_ctx, receipts, &outcome.commit.workbook)?)
    };

    if ui_ctx.mode.is_json() {
        let value = serde_json::json!({
            "appended": outcome.commit.appended,
            "receipts": receipts_json(receipts),
            "labels": outputs.as_ref().map(|o| o.labels.display().to_string()),
            "schedule": outputs.as_ref().map(|o| o.schedule.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if !ctx.quiet() {
        let mut items = vec![
            ("Receipts", receipts.len().to_string()),
            ("Appended", outcome.commit.appended.to_string()),
        ];
        if let Some(outputs) = &outputs {
            items.push(("Labels", outputs.labels.display().to_string()));
            items.push(("Schedule", outputs.schedule.display().to_string()));
        }
        print(&ui_ctx, &receipt(&ui_ctx, "Committed receipts", &items));
        let relogged = receipts.len() - outcome.commit.appended;
        if relogged > 0 && ui_ctx.mode.is_pretty() {
            print(
                &ui_ctx,
                &badge(
                    &ui_ctx,
                    Badge::Warn,
                    &format!("{} receipt(s) were already logged; not appended again", relogged),
                ),
            );
        }
    }
    Ok(())
}

/// Write the label document and the schedule copy.
///
/// The schedule copy is the exact workbook the commit persisted.
fn write_outputs(
    ctx: &AppContext,
    ui_ctx: &UiContext,
    receipts: &[Receipt],
    workbook: &[u8],
) -> anyhow::Result<Outputs> {
    let bar = label_bar(ui_ctx, receipts.len());
    let mut renderer = ProgressRenderer {
        inner: JsonLabelRenderer,
        bar: &bar,
    };
    let batch = render_batch(&mut renderer, receipts);
    bar.finish_and_clear();
    let batch = batch?;

    let labels_dir = ctx.labels_dir()?;
    let labels = labels_dir.join(format!("{}.jsonl", batch.document_name));
    write_file(&labels, batch.to_json_lines().as_bytes())?;
    info!(path = %labels.display(), labels = batch.labels.len(), "saved label document");

    let schedule = ctx.schedule_dir()?.join(SCHEDULE_FILE_NAME);
    write_file(&schedule, workbook)?;
    info!(path = %schedule.display(), "saved schedule workbook");

    Ok(Outputs { labels, schedule })
}

pub(crate) fn write_file(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }
    fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))
}
