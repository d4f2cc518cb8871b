//! Command-line front end for the note store.
//!
//! # Responsibility
//! - Map user commands onto `NoteService` use-cases.
//! - Render listings, live updates and text exports to stdout/files.

mod config;
mod session;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::AppPaths;
use log::info;
use notepad_core::{
    created_label, init_logging, share_text, write_text_export, Note, NoteId, NoteOrder,
    NoteService, NoteStore, UpsertRequest, NOTE_COLOR_PALETTE,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const PALETTE_NAMES: [&str; 5] = ["red", "green", "yellow", "blue", "purple"];

#[derive(Parser)]
#[command(name = "notepad", version, about = "Pinned, searchable notes")]
struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for rotated log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a note
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// red|green|yellow|blue|purple or ARGB hex such as FFE0F7FA
        #[arg(short, long, value_parser = parse_color)]
        color: Option<i64>,

        /// Image reference stored with the note
        #[arg(long)]
        image: Option<String>,
    },

    /// Replace a note's title and description, keeping everything not given
    Edit {
        id: NoteId,

        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long, value_parser = parse_color)]
        color: Option<i64>,

        /// Replacement creation time in epoch milliseconds
        #[arg(long)]
        created_at: Option<i64>,

        #[arg(long)]
        image: Option<String>,
    },

    /// Pin or unpin a note
    Pin { id: NoteId },

    /// Delete a note
    Delete { id: NoteId },

    /// Show one note
    Show { id: NoteId },

    /// Print the text a share sheet would receive
    Share { id: NoteId },

    /// List notes, pinned first unless --by-date
    List {
        #[arg(long)]
        by_date: bool,

        /// Case-insensitive match on title or description
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Interactive session: type add/edit/pin/delete commands and see the
    /// listing reprinted after every change; `quit` or end of input exits
    Watch {
        #[arg(long)]
        by_date: bool,

        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Write notes.txt with every note
    Export {
        #[arg(long)]
        by_date: bool,

        /// Target directory (defaults to the data directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = AppPaths::resolve();
    let log_dir = std::path::absolute(cli.log_dir.unwrap_or(paths.log_dir.clone()))
        .context("failed to resolve log directory")?;
    let level = cli
        .log_level
        .unwrap_or_else(|| notepad_core::default_log_level().to_string());
    init_logging(&level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;

    let db_path = cli.db.unwrap_or(paths.db_path.clone());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    let store = Arc::new(
        NoteStore::open(&db_path)
            .with_context(|| format!("failed to open `{}`", db_path.display()))?,
    );
    let service = NoteService::new(store);
    info!(
        "event=cli_start module=cli status=ok db={}",
        db_path.display()
    );

    match cli.command {
        Command::Add {
            title,
            description,
            color,
            image,
        } => {
            let mut request = UpsertRequest::create(title, description);
            request.color = color;
            request.image_uri_override = image;
            let note = service.upsert(&request)?;
            println!("created #{}", note.id);
        }
        Command::Edit {
            id,
            title,
            description,
            color,
            created_at,
            image,
        } => {
            let mut request = UpsertRequest::edit(id, title, description);
            request.color = color;
            request.created_at_override = created_at;
            request.image_uri_override = image;
            let note = service.upsert(&request)?;
            if note.id == id {
                println!("updated #{id}");
            } else {
                println!("#{id} no longer exists; created #{}", note.id);
            }
        }
        Command::Pin { id } => {
            let note = service.toggle_pin(id)?;
            let state = if note.is_pinned { "pinned" } else { "unpinned" };
            println!("{state} #{id}");
        }
        Command::Delete { id } => {
            service.delete(id)?;
            println!("deleted #{id}");
        }
        Command::Show { id } => {
            let note = service.get_note(id)?;
            println!("{}", render_line(&note)?);
            if !note.description.is_empty() {
                println!("{}", note.description);
            }
            if let Some(uri) = note.image_uri.as_deref() {
                println!("image: {uri}");
            }
        }
        Command::Share { id } => {
            println!("{}", share_text(&service.get_note(id)?));
        }
        Command::List { by_date, query } => {
            let notes = service.search(order_for(by_date), &query)?;
            print_listing(&notes, &query)?;
        }
        Command::Watch { by_date, query } => {
            eprintln!("{}", session::SESSION_HELP);
            session::run(
                service,
                order_for(by_date),
                query,
                io::stdin().lock(),
                |notes, query| {
                    println!("--");
                    if let Err(err) = print_listing(notes, query) {
                        eprintln!("error: {err:#}");
                    }
                },
            )?;
        }
        Command::Export { by_date, dir } => {
            let notes = service.list_notes(order_for(by_date))?;
            let target = dir.unwrap_or(paths.export_dir);
            let path = write_text_export(&notes, &target)?;
            println!("exported {} notes to {}", notes.len(), path.display());
        }
    }

    Ok(())
}

fn order_for(by_date: bool) -> NoteOrder {
    if by_date {
        NoteOrder::ByDate
    } else {
        NoteOrder::PinnedFirst
    }
}

fn print_listing(notes: &[Note], query: &str) -> Result<()> {
    if notes.is_empty() {
        if query.is_empty() {
            println!("no notes yet");
        } else {
            println!("no notes match `{query}`");
        }
        return Ok(());
    }
    for note in notes {
        println!("{}", render_line(note)?);
    }
    Ok(())
}

fn render_line(note: &Note) -> Result<String> {
    let pin = if note.is_pinned { "*" } else { " " };
    Ok(format!(
        "{pin} #{:<4} {:08X}  {}  | {}",
        note.id,
        note.color_hex,
        note.title,
        created_label(note.created_at)?
    ))
}

fn parse_color(value: &str) -> Result<i64> {
    let trimmed = value.trim();
    if let Some(index) = PALETTE_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(trimmed))
    {
        return Ok(NOTE_COLOR_PALETTE[index]);
    }

    let hex = trimmed.trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("expected a palette name or 6/8 hex digits, got `{value}`");
    }
    let parsed = match hex.len() {
        6 => i64::from_str_radix(hex, 16).map(|rgb| 0xFF00_0000 | rgb),
        8 => i64::from_str_radix(hex, 16),
        _ => bail!("expected a palette name or 6/8 hex digits, got `{value}`"),
    };
    parsed.with_context(|| format!("invalid color `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::{order_for, parse_color};
    use notepad_core::{NoteOrder, DEFAULT_NOTE_COLOR, NOTE_COLOR_PALETTE};

    #[test]
    fn parse_color_accepts_palette_names_and_hex() {
        assert_eq!(parse_color("Blue").unwrap(), NOTE_COLOR_PALETTE[3]);
        assert_eq!(parse_color("#E0F7FA").unwrap(), DEFAULT_NOTE_COLOR);
        assert_eq!(parse_color("ffe0f7fa").unwrap(), DEFAULT_NOTE_COLOR);
    }

    #[test]
    fn parse_color_rejects_garbage() {
        assert!(parse_color("teal").is_err());
        assert!(parse_color("GGGGGG").is_err());
    }

    #[test]
    fn parse_color_rejects_signed_hex() {
        assert!(parse_color("-1234567").is_err());
        assert!(parse_color("+FFFFFFF").is_err());
        assert!(parse_color("-12345").is_err());
    }

    #[test]
    fn default_listing_is_pinned_first() {
        assert_eq!(order_for(false), NoteOrder::PinnedFirst);
        assert_eq!(order_for(true), NoteOrder::ByDate);
    }
}
