//! Interactive feed browser.
//!
//! Reads one command per line and turns it into synchronizer intents,
//! printing the feed after each one.

use super::load_image;
use super::render::{self, OutputFormat};
use feedsync_engine::{FeedApi, FeedSynchronizer, Intent, PostDraft, PostId};
use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

const HELP: &str = "\
Commands:
  next | n                                  next page
  prev | p                                  previous page
  reload | r                                reload the current page
  new <title> | <content> [| <image>]       create a post
  edit <id> <title> | <content> [| <image>] edit a post on this page
  delete <id>                               delete a post
  status <text>                             set your status
  dismiss                                   clear the error
  help                                      show this help
  quit | q                                  leave";

/// A parsed browser command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward an intent as is.
    Intent(Intent),
    /// Reload the current page.
    Reload,
    /// Open the editor and submit it.
    Submit {
        /// Post to edit, or `None` to create.
        id: Option<PostId>,
        /// Title.
        title: String,
        /// Content.
        content: String,
        /// Image to upload.
        image: Option<PathBuf>,
    },
    /// Show the help text.
    Help,
    /// Leave the browser.
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "next" | "n" => Command::Intent(Intent::LoadNext),
        "prev" | "p" => Command::Intent(Intent::LoadPrevious),
        "reload" | "r" => Command::Reload,
        "dismiss" => Command::Intent(Intent::DismissError),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "status" => Command::Intent(Intent::UpdateStatus(rest.to_string())),
        "delete" | "del" => Command::Intent(Intent::DeletePost(post_id(rest)?)),
        "new" => submit(None, rest)?,
        "edit" => {
            let (id, fields) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: edit <id> <title> | <content> [| <image>]")?;
            submit(Some(post_id(id)?), fields)?
        }
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

fn post_id(raw: &str) -> Result<PostId, String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains(char::is_whitespace) {
        return Err("expected a single post id".into());
    }
    Ok(PostId::new(raw))
}

fn submit(id: Option<PostId>, fields: &str) -> Result<Command, String> {
    let mut parts = fields.split('|').map(str::trim);
    let title = parts.next().unwrap_or_default();
    let content = parts
        .next()
        .ok_or("expected '<title> | <content>'")?;
    let image = parts.next().filter(|p| !p.is_empty()).map(PathBuf::from);
    if parts.next().is_some() {
        return Err("too many '|' separated fields".into());
    }
    Ok(Command::Submit {
        id,
        title: title.to_string(),
        content: content.to_string(),
        image,
    })
}

/// Runs the browser until `quit` or end of input.
pub fn run<A: FeedApi, R: BufRead, W: Write>(
    sync: &mut FeedSynchronizer<A>,
    input: R,
    out: &mut W,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    sync.initialize();
    render::view(out, &sync.view(), format)?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        debug!(?command, "browser command");

        match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::Reload => sync.load_page(None),
            Command::Intent(intent) => sync.dispatch(intent),
            Command::Submit {
                id,
                title,
                content,
                image,
            } => {
                let mut draft = PostDraft::new(title, content);
                if let Some(path) = image {
                    match load_image(&path) {
                        Ok(file) => draft.image = Some(file),
                        Err(e) => {
                            writeln!(out, "{e}")?;
                            continue;
                        }
                    }
                }
                match id {
                    Some(id) => {
                        if !sync.begin_edit(&id) {
                            writeln!(out, "post {id} is not on this page")?;
                            continue;
                        }
                    }
                    None => sync.begin_create(),
                }
                sync.dispatch(Intent::SubmitEdit(draft));
            }
        }
        render::view(out, &sync.view(), format)?;
    }
    Ok(())
}
