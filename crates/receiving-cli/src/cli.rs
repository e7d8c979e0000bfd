use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use receiving_core::VERSION;

/// Receiving - log stock deliveries, print QR labels, keep the receiving schedule
#[derive(Parser)]
#[command(name = "receiving")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store directory
    #[arg(short, long, global = true, env = "RECEIVING_STORE")]
    pub store: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RECEIVING_LOG", default_value = "warn")]
    pub log_level: String,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the store and config, seeding default vocabularies
    Init(InitArgs),

    /// Manage the supplier list
    Supplier {
        #[command(subcommand)]
        command: VocabularyCommand,
    },

    /// Manage the stock code list
    StockCode {
        #[command(subcommand)]
        command: VocabularyCommand,
    },

    /// Stage receipts before committing them
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// Commit every staged draft and generate labels
    Commit(CommitArgs),

    /// View and edit the receiving schedule
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Store directory to create (defaults to the XDG data directory)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum VocabularyCommand {
    /// Add a name to the list
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Remove the entry at a position (1-based, as listed)
    Remove {
        #[arg(value_name = "N")]
        index: usize,
    },

    /// List entries
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Field values shared by draft and schedule row edits
#[derive(Args, Default)]
pub struct RowFields {
    /// Supplier name (must be in the supplier list)
    #[arg(long)]
    pub supplier: Option<String>,

    /// Stock code (must be in the stock code list)
    #[arg(long)]
    pub stock_code: Option<String>,

    /// Mass in kg; blank means 0
    #[arg(long)]
    pub mass: Option<String>,

    /// Receipt date (yyyy-mm-dd or dd/mm/yyyy)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Subcommand)]
pub enum DraftCommand {
    /// Stage a new draft (defaults copied from the first draft)
    Add {
        #[command(flatten)]
        fields: RowFields,
    },

    /// Change fields of a staged draft
    Update {
        /// Draft reference, as listed
        #[arg(value_name = "REF")]
        draft: u64,

        #[command(flatten)]
        fields: RowFields,
    },

    /// Discard a staged draft
    Remove {
        /// Draft reference, as listed
        #[arg(value_name = "REF")]
        draft: u64,
    },

    /// List staged drafts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Discard every staged draft
    Clear,
}

/// Arguments for the `commit` command
#[derive(Args)]
pub struct CommitArgs {
    /// Only log receipts; skip the label document and schedule copy
    #[arg(long)]
    pub no_labels: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// Show the receiving schedule
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the schedule workbook to a file
    Export {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Replace the schedule with a workbook file
    Import {
        #[arg(value_name = "PATH")]
        path: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Append a row directly to the schedule
    AddRow {
        #[command(flatten)]
        fields: RowFields,
    },

    /// Edit a schedule row in place (1-based, as shown)
    Edit {
        #[arg(value_name = "N")]
        row: usize,

        #[command(flatten)]
        fields: RowFields,
    },

    /// Delete a schedule row (1-based, as shown)
    Delete {
        #[arg(value_name = "N")]
        row: usize,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
