//! Interactive watch session: edits typed on stdin, live listing on stdout.
//!
//! The listing is printed by a dedicated thread that owns the subscription,
//! so every write made through the session's `NoteService` shows up as a
//! fresh listing. The session ends on `quit` or end of input.

use anyhow::{bail, Context, Result};
use log::info;
use notepad_core::{filter_notes, Note, NoteId, NoteOrder, NoteService, UpsertRequest};
use std::io::BufRead;
use std::thread;

pub const SESSION_HELP: &str = "commands: add <title> [| description], \
edit <id> <title> [| description], pin <id>, delete <id>, help, quit";

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add { title: String, description: String },
    Edit { id: NoteId, title: String, description: String },
    Pin(NoteId),
    Delete(NoteId),
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        let command = match verb.to_ascii_lowercase().as_str() {
            "add" => {
                let (title, description) = split_body(rest);
                Self::Add { title, description }
            }
            "edit" => {
                let (id, body) = rest
                    .split_once(char::is_whitespace)
                    .unwrap_or((rest, ""));
                let (title, description) = split_body(body);
                Self::Edit {
                    id: parse_id(id)?,
                    title,
                    description,
                }
            }
            "pin" => Self::Pin(parse_id(rest)?),
            "delete" | "rm" => Self::Delete(parse_id(rest)?),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command `{other}`"),
        };
        Ok(Some(command))
    }
}

fn split_body(body: &str) -> (String, String) {
    match body.split_once('|') {
        Some((title, description)) => (title.trim().to_string(), description.trim().to_string()),
        None => (body.trim().to_string(), String::new()),
    }
}

fn parse_id(raw: &str) -> Result<NoteId> {
    let raw = raw.trim().trim_start_matches('#');
    if raw.is_empty() {
        bail!("missing note id");
    }
    raw.parse()
        .with_context(|| format!("invalid note id `{raw}`"))
}

/// Applies one command and returns the confirmation to print.
pub fn apply(service: &NoteService, command: SessionCommand) -> Result<String> {
    let message = match command {
        SessionCommand::Add { title, description } => {
            let note = service.upsert(&UpsertRequest::create(title, description))?;
            format!("created #{}", note.id)
        }
        SessionCommand::Edit {
            id,
            title,
            description,
        } => {
            let note = service.upsert(&UpsertRequest::edit(id, title, description))?;
            if note.id == id {
                format!("updated #{id}")
            } else {
                format!("#{id} no longer exists; created #{}", note.id)
            }
        }
        SessionCommand::Pin(id) => {
            let note = service.toggle_pin(id)?;
            let state = if note.is_pinned { "pinned" } else { "unpinned" };
            format!("{state} #{id}")
        }
        SessionCommand::Delete(id) => {
            service.delete(id)?;
            format!("deleted #{id}")
        }
        SessionCommand::Help => SESSION_HELP.to_string(),
        SessionCommand::Quit => String::new(),
    };
    Ok(message)
}

/// Runs the session until `quit` or end of `input`.
///
/// Takes the service by value: dropping it releases the store, which ends
/// the printer's subscription so the thread can be joined.
pub fn run<R, F>(
    service: NoteService,
    order: NoteOrder,
    query: String,
    input: R,
    render: F,
) -> Result<usize>
where
    R: BufRead,
    F: Fn(&[Note], &str) + Send + 'static,
{
    let live = service.subscribe(order)?;
    let printer = thread::spawn(move || {
        let mut printed = 0usize;
        for snapshot in live {
            render(&filter_notes(&snapshot, &query), &query);
            printed += 1;
        }
        printed
    });

    info!("event=watch_session module=cli status=start order={}", order.as_str());
    let outcome = read_commands(&service, input);
    drop(service);

    let printed = printer
        .join()
        .map_err(|_| anyhow::anyhow!("listing printer panicked"))?;
    info!("event=watch_session module=cli status=end listings={printed}");
    outcome.map(|()| printed)
}

fn read_commands<R: BufRead>(service: &NoteService, input: R) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read session input")?;
        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: {err:#}");
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        match apply(service, command) {
            Ok(message) => println!("{message}"),
            Err(err) => eprintln!("error: {err:#}"),
        }
    }
    Ok(())
}
