use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ib", about = concat!("ideaboard v", env!("CARGO_PKG_VERSION"), " - turn meeting notes into ideas you can track"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new board in the current directory
    Init(InitArgs),
    /// Log in with the board's credential
    Login(LoginArgs),
    /// Log out
    Logout,
    /// Show who is logged in
    Whoami,
    /// List ideas, optionally filtered
    List(ListArgs),
    /// Show one idea in full
    Show(ShowArgs),
    /// Add an idea
    Add(AddArgs),
    /// Change fields of an idea
    Edit(EditArgs),
    /// Delete an idea (kept in storage, hidden from the board)
    Delete(DeleteArgs),
    /// Preview how meeting notes would be split into ideas
    Parse(ParseArgs),
    /// Import ideas from meeting notes
    Import(ImportArgs),
    /// Change board settings
    Config(ConfigCmd),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if ideaboard/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct LoginArgs {
    pub email: String,
    #[arg(long, short)]
    pub password: String,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against title, description and proposer
    #[arg(long, short, default_value = "")]
    pub query: String,
    /// cost-saving, revenue-growth, both, or all
    #[arg(long)]
    pub category: Option<String>,
    /// high, medium, low, or all
    #[arg(long)]
    pub priority: Option<String>,
    /// not-started, in-progress, done, or all
    #[arg(long)]
    pub status: Option<String>,
    /// Exact proposer name, or all
    #[arg(long)]
    pub proposer: Option<String>,
    /// Earliest idea date (YYYY-MM-DD or "22 Dec 2025")
    #[arg(long)]
    pub from: Option<String>,
    /// Latest idea date (YYYY-MM-DD or "22 Dec 2025")
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Idea ID or unique prefix
    pub id: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Idea title
    #[arg(long)]
    pub title: String,
    /// Longer description (default: the title)
    #[arg(long)]
    pub description: Option<String>,
    /// Who proposed it
    #[arg(long)]
    pub proposer: String,
    #[arg(long, default_value = "cost-saving")]
    pub category: String,
    #[arg(long, default_value = "medium")]
    pub priority: String,
    #[arg(long, default_value = "not-started")]
    pub status: String,
    /// Idea date (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Planned start date
    #[arg(long)]
    pub start: Option<String>,
    /// Planned end date
    #[arg(long)]
    pub end: Option<String>,
    /// Expected impact on the office
    #[arg(long, default_value = "")]
    pub impact: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Idea ID or unique prefix
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub proposer: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, conflicts_with = "clear_start")]
    pub start: Option<String>,
    #[arg(long, conflicts_with = "clear_end")]
    pub end: Option<String>,
    #[arg(long)]
    pub impact: Option<String>,
    /// Remove the start date
    #[arg(long)]
    pub clear_start: bool,
    /// Remove the end date
    #[arg(long)]
    pub clear_end: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Idea ID or unique prefix
    pub id: String,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Notes file (default: stdin; `-` also means stdin)
    pub file: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Notes file (default: stdin; `-` also means stdin)
    pub file: Option<String>,
    /// Proposer name, overriding the one in the notes
    #[arg(long)]
    pub proposer: Option<String>,
    /// Idea date, overriding the one in the notes
    #[arg(long)]
    pub date: Option<String>,
    /// Show the ideas that would be created without saving them
    #[arg(long)]
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set board.name, auth.email or auth.password
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Show entries after this timestamp (ISO-8601)
    #[arg(long)]
    pub since: Option<String>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
