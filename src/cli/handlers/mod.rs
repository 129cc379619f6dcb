mod init;
pub use init::cmd_init;

use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io::{self, BoardError};
use crate::io::recovery;
use crate::io::session_io::FileSessionStore;
use crate::io::store::{IdeaStore, JsonFileStore};
use crate::model::board::Board;
use crate::model::criteria::FilterCriteria;
use crate::model::idea::{IdeaPatch, NewIdea};
use crate::model::session::Session;
use crate::ops::auth::AuthService;
use crate::ops::idea_ops;
use crate::ops::import::{self, ImportError, ImportOverrides};
use crate::parse::{parse_idea_date, parse_raw_ideas, today_default_date};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Flags shared by every subcommand
struct Context {
    json: bool,
    board_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let board_dir = match cli.board_dir {
        Some(ref dir) => Some(
            std::fs::canonicalize(dir).map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        ),
        None => None,
    };
    let ctx = Context {
        json: cli.json,
        board_dir,
    };

    match cli.command {
        Commands::Init(args) => cmd_init(args, ctx.board_dir.as_deref()),

        // Session
        Commands::Login(args) => cmd_login(&ctx, args),
        Commands::Logout => cmd_logout(&ctx),
        Commands::Whoami => cmd_whoami(&ctx),

        // Read commands
        Commands::List(args) => cmd_list(&ctx, args),
        Commands::Show(args) => cmd_show(&ctx, args),
        Commands::Parse(args) => cmd_parse(&ctx, args),

        // Write commands
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Edit(args) => cmd_edit(&ctx, args),
        Commands::Delete(args) => cmd_delete(&ctx, args),
        Commands::Import(args) => cmd_import(&ctx, args),

        // Maintenance
        Commands::Config(cmd) => cmd_config(&ctx, cmd),
        Commands::Recovery(cmd) => cmd_recovery(&ctx, cmd),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_board_cwd(ctx: &Context) -> Result<Board, BoardError> {
    let start = match &ctx.board_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let root = board_io::discover_board(&start)?;
    board_io::load_board(&root)
}

fn auth_service(board: &Board) -> AuthService<FileSessionStore> {
    AuthService::new(board.config.auth.clone(), FileSessionStore::new(&board.board_dir))
}

/// Load the board and fail unless someone is logged in.
fn load_board_authed(ctx: &Context) -> Result<(Board, Session), Box<dyn std::error::Error>> {
    let board = load_board_cwd(ctx)?;
    let session = auth_service(&board).require()?;
    log::debug!("acting as {}", session.user.email);
    Ok((board, session))
}

/// Parse an enum flag, where `all` means "no constraint".
fn parse_selector<T>(value: Option<&str>) -> Result<Option<T>, T::Err>
where
    T: FromStr,
{
    match value.map(str::trim) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

fn parse_bound(value: Option<&str>, flag: &str) -> Result<Option<chrono::NaiveDate>, String> {
    match value {
        None => Ok(None),
        Some(v) => parse_idea_date(v)
            .map(Some)
            .ok_or_else(|| format!("invalid --{} date '{}' (use YYYY-MM-DD or \"22 Dec 2025\")", flag, v)),
    }
}

/// Read notes from a file, or from stdin when the path is absent or `-`.
/// Returns the text and a label naming where it came from.
fn read_notes(file: Option<&str>) -> Result<(String, String), Box<dyn std::error::Error>> {
    match file {
        None | Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok((text, "stdin".to_string()))
        }
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| format!("could not read {}: {}", path, e))?;
            Ok((text, path.to_string()))
        }
    }
}

fn non_empty(value: &str, flag: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("--{} cannot be empty", flag));
    }
    Ok(trimmed.to_string())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

fn cmd_login(ctx: &Context, args: LoginArgs) -> CmdResult {
    let board = load_board_cwd(ctx)?;
    let session = auth_service(&board).login(args.email.trim(), &args.password)?;
    if ctx.json {
        return print_json(&SessionJson {
            logged_in: true,
            session: Some(&session),
        });
    }
    println!("logged in as {}", session.user.email);
    Ok(())
}

fn cmd_logout(ctx: &Context) -> CmdResult {
    let board = load_board_cwd(ctx)?;
    auth_service(&board).logout()?;
    if !ctx.json {
        println!("logged out");
    }
    Ok(())
}

fn cmd_whoami(ctx: &Context) -> CmdResult {
    let board = load_board_cwd(ctx)?;
    let session = auth_service(&board).current()?;
    if ctx.json {
        return print_json(&SessionJson {
            logged_in: session.is_some(),
            session: session.as_ref(),
        });
    }
    match session {
        Some(s) => println!(
            "{} (since {})",
            s.user.email,
            s.logged_in_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ),
        None => println!("not logged in"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs) -> CmdResult {
    let (board, _) = load_board_authed(ctx)?;

    let proposer = match args.proposer.as_deref().map(str::trim) {
        None => None,
        Some(p) if p.eq_ignore_ascii_case("all") => None,
        Some(p) => Some(p.to_string()),
    };
    let criteria = FilterCriteria {
        query: args.query,
        category: parse_selector(args.category.as_deref())?,
        priority: parse_selector(args.priority.as_deref())?,
        status: parse_selector(args.status.as_deref())?,
        proposer,
        date_from: parse_bound(args.from.as_deref(), "from")?,
        date_to: parse_bound(args.to.as_deref(), "to")?,
    };

    let store = JsonFileStore::new(&board.board_dir);
    let ideas = idea_ops::visible_ideas(&store, &criteria)?;

    if ctx.json {
        return print_json(&ideas);
    }
    if ideas.is_empty() {
        println!("(no ideas)");
        return Ok(());
    }
    for idea in &ideas {
        println!("{}", format_idea_line(idea));
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: ShowArgs) -> CmdResult {
    let (board, _) = load_board_authed(ctx)?;
    let store = JsonFileStore::new(&board.board_dir);
    let records = store.list_all()?;
    let idea = idea_ops::find_idea(&records, args.id.trim())?;

    if ctx.json {
        return print_json(idea);
    }
    print!("{}", format_idea_detail(idea));
    Ok(())
}

fn cmd_parse(ctx: &Context, args: ParseArgs) -> CmdResult {
    let (text, _) = read_notes(args.file.as_deref())?;
    let result = parse_raw_ideas(&text, &today_default_date());
    if ctx.json {
        return print_json(&result);
    }
    print!("{}", format_parse_result(&result));
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let (board, _) = load_board_authed(ctx)?;

    let title = non_empty(&args.title, "title")?;
    let idea = NewIdea {
        proposer_name: non_empty(&args.proposer, "proposer")?,
        description: args
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| title.clone()),
        title,
        category: args.category.parse()?,
        priority: args.priority.parse()?,
        status: args.status.parse()?,
        idea_date: args.date.unwrap_or_else(today_default_date),
        start_date: args.start,
        end_date: args.end,
        impact: args.impact,
    };

    let mut store = JsonFileStore::new(&board.board_dir);
    let record = match idea_ops::create_idea(&mut store, idea.clone()) {
        Ok(record) => record,
        Err(e) => {
            let payload = serde_json::to_string_pretty(&idea).unwrap_or_default();
            recovery::log_failed_write(&board.board_dir, "idea could not be added", &e.to_string(), payload);
            return Err(e.into());
        }
    };

    if ctx.json {
        return print_json(&record);
    }
    println!("added {}", format_idea_line(&record));
    Ok(())
}

fn build_patch(args: &EditArgs) -> Result<IdeaPatch, Box<dyn std::error::Error>> {
    let start_date = if args.clear_start {
        Some(None)
    } else {
        args.start.clone().map(Some)
    };
    let end_date = if args.clear_end {
        Some(None)
    } else {
        args.end.clone().map(Some)
    };
    Ok(IdeaPatch {
        proposer_name: args.proposer.as_deref().map(|p| non_empty(p, "proposer")).transpose()?,
        title: args.title.as_deref().map(|t| non_empty(t, "title")).transpose()?,
        description: args.description.clone(),
        category: args.category.as_deref().map(str::parse).transpose()?,
        priority: args.priority.as_deref().map(str::parse).transpose()?,
        status: args.status.as_deref().map(str::parse).transpose()?,
        idea_date: args.date.clone(),
        start_date,
        end_date,
        impact: args.impact.clone(),
        ..IdeaPatch::default()
    })
}

fn cmd_edit(ctx: &Context, args: EditArgs) -> CmdResult {
    let (board, _) = load_board_authed(ctx)?;

    let patch = build_patch(&args)?;
    if patch.is_empty() {
        return Err("nothing to change (pass at least one field flag)".into());
    }

    let mut store = JsonFileStore::new(&board.board_dir);
    let records = store.list_all()?;
    let id = idea_ops::find_idea(&records, args.id.trim())?.id.clone();
    let record = idea_ops::edit_idea(&mut store, &id, patch, Utc::now())?;

    if ctx.json {
        return print_json(&record);
    }
    println!("updated {}", format_idea_line(&record));
    Ok(())
}

fn cmd_delete(ctx: &Context, args: DeleteArgs) -> CmdResult {
    let (board, _) = load_board_authed(ctx)?;

    let mut store = JsonFileStore::new(&board.board_dir);
    let records = store.list_all()?;
    let id = idea_ops::find_idea(&records, args.id.trim())?.id.clone();
    let record = idea_ops::delete_idea(&mut store, &id, Utc::now())?;
    recovery::log_idea_deletion(&board.board_dir, &record);

    if !ctx.json {
        println!("deleted {} {}", short_id(&record.id), record.title);
    }
    Ok(())
}

fn cmd_import(ctx: &Context, args: ImportArgs) -> CmdResult {
    let (board, _) = load_board_authed(ctx)?;
    let (text, source) = read_notes(args.file.as_deref())?;
    let overrides = ImportOverrides {
        proposer_name: args.proposer,
        idea_date: args.date,
    };
    let default_date = today_default_date();

    if args.dry_run {
        let prepared = import::prepare_import(&text, &default_date, &overrides)?;
        if ctx.json {
            return print_json(&prepared.ideas);
        }
        print!("{}", format_parse_result(&prepared.parsed));
        println!("(dry run, nothing saved)");
        return Ok(());
    }

    let mut store = JsonFileStore::new(&board.board_dir);
    let result = match import::import_ideas(&mut store, &text, &default_date, &overrides) {
        Ok(result) => result,
        Err(ImportError::Store {
            source: err,
            saved,
            unsaved,
        }) => {
            let payload = serde_json::to_string_pretty(&unsaved).unwrap_or_default();
            recovery::log_failed_write(
                &board.board_dir,
                &format!("import from {} stopped", source),
                &err.to_string(),
                payload,
            );
            return Err(ImportError::Store {
                source: err,
                saved,
                unsaved,
            }
            .into());
        }
        Err(e) => return Err(e.into()),
    };
    recovery::log_ignored_lines(&board.board_dir, &source, &result.ignored);

    if ctx.json {
        return print_json(&ImportJson {
            imported: &result.records,
            ignored: &result.ignored,
        });
    }
    println!("imported {} idea(s)", result.records.len());
    for record in &result.records {
        println!("  {}", format_idea_line(record));
    }
    if !result.ignored.is_empty() {
        println!("{} line(s) ignored (see `ib recovery`)", result.ignored.len());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

fn cmd_config(ctx: &Context, cmd: ConfigCmd) -> CmdResult {
    match cmd.action {
        ConfigAction::Set(args) => {
            let board = load_board_cwd(ctx)?;
            let mut doc = board_io::read_config_doc(&board.board_dir)?;
            board_io::set_config_value(&mut doc, args.key.trim(), &args.value)?;
            board_io::write_config_doc(&board.board_dir, &doc)?;
            if args.key.trim() == "auth.password" {
                println!("auth.password updated");
            } else {
                println!("{} = \"{}\"", args.key.trim(), args.value);
            }
            Ok(())
        }
    }
}

fn parse_timestamp(value: &str, flag: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            parse_idea_date(value)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .ok_or(())
        })
        .map_err(|_| format!("invalid --{} timestamp '{}'", flag, value))
}

fn cmd_recovery(ctx: &Context, cmd: RecoveryCmd) -> CmdResult {
    let (board, _) = load_board_authed(ctx)?;

    match cmd.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(&board.board_dir).display());
            Ok(())
        }
        Some(RecoveryAction::Prune(args)) => {
            let before = args
                .before
                .as_deref()
                .map(|b| parse_timestamp(b, "before"))
                .transpose()?;
            let removed = recovery::prune_recovery(&board.board_dir, before, args.all)?;
            println!("removed {} entr{}", removed, if removed == 1 { "y" } else { "ies" });
            Ok(())
        }
        None => {
            let since = cmd
                .since
                .as_deref()
                .map(|s| parse_timestamp(s, "since"))
                .transpose()?;
            let entries = recovery::read_recovery_entries(&board.board_dir, Some(cmd.limit.unwrap_or(10)), since);
            if ctx.json {
                let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                return print_json(&values);
            }
            if entries.is_empty() {
                println!("(recovery log is empty)");
                return Ok(());
            }
            for entry in &entries {
                println!("{}", entry.to_markdown());
            }
            Ok(())
        }
    }
}
