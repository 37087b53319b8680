//! Line-oriented shell that drives the screens.
//!
//! The shell owns a handle to the shared store and subscribes to it for as
//! long as it lives. Any change marks the list screen stale; if the list is
//! the current screen it is re-rendered after the command that caused it.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use memtodo_core::{Config, MemtodoError, SharedStore, Subscription, validate_title};
use tracing::{debug, warn};

use crate::screens::{info, landing, list};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    List,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Home,
    Tap,
    List { json: bool },
    Info,
    Add { title: String, description: String },
    /// `description: None` keeps the item's current description.
    Edit { id: i64, title: String, description: Option<String> },
    Delete { id: i64 },
    Clear,
    Dump,
    Quit,
}

/// Split `"title | description"`; the description is `None` without a `|`.
fn split_fields(rest: &str) -> (String, Option<String>) {
    match rest.split_once('|') {
        Some((title, description)) => (title.to_string(), Some(description.to_string())),
        None => (rest.to_string(), None),
    }
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid id '{}'", raw.trim()))
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let (word, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));

        let command = match word.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "home" => Command::Home,
            "tap" => Command::Tap,
            "list" | "ls" => match rest.trim() {
                "" => Command::List { json: false },
                "--json" => Command::List { json: true },
                other => bail!("Unknown list option '{}'", other),
            },
            "info" => Command::Info,
            "add" => {
                let (title, description) = split_fields(rest);
                Command::Add {
                    title,
                    description: description.unwrap_or_default(),
                }
            }
            "edit" => {
                let rest = rest.trim_start();
                let Some((id, fields)) = rest.split_once(char::is_whitespace) else {
                    bail!("Usage: edit <id> <title> [| <description>]");
                };
                let (title, description) = split_fields(fields);
                Command::Edit {
                    id: parse_id(id)?,
                    title,
                    description,
                }
            }
            "delete" | "rm" => {
                if rest.trim().is_empty() {
                    bail!("Usage: delete <id>");
                }
                Command::Delete { id: parse_id(rest)? }
            }
            "clear" => Command::Clear,
            "dump" => Command::Dump,
            "quit" | "exit" => Command::Quit,
            other => bail!("Unknown command '{}'. Type 'help' for a list.", other),
        };
        Ok(Some(command))
    }
}

pub struct Shell<W: Write> {
    store: SharedStore,
    config: Config,
    out: W,
    screen: Screen,
    taps: u32,
    stale: Arc<AtomicBool>,
    subscription: Subscription,
    running: bool,
}

impl<W: Write> Shell<W> {
    pub fn new(store: SharedStore, config: Config, out: W) -> Self {
        let stale = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stale);
        let subscription = store.subscribe(move || flag.store(true, Ordering::SeqCst));

        Self {
            store,
            config,
            out,
            screen: Screen::Landing,
            taps: 0,
            stale,
            subscription,
            running: true,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Show the landing screen, then execute lines until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        landing::render(&mut self.out, self.taps)?;

        let mut lines = input.lines();
        while self.running {
            write!(self.out, "{}", self.config.display.prompt)?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read input")?;
            self.execute(&line)?;
        }
        Ok(())
    }

    /// Execute a single input line. Bad input is reported, not returned.
    pub fn execute(&mut self, line: &str) -> Result<()> {
        match Command::parse(line) {
            Ok(Some(command)) => self.dispatch(command)?,
            Ok(None) => {}
            Err(e) => writeln!(self.out, "{}", e)?,
        }

        if self.stale.swap(false, Ordering::SeqCst) && self.screen == Screen::List {
            self.render_list()?;
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        debug!(?command, screen = ?self.screen, "dispatching command");
        match command {
            Command::Help => self.help()?,
            Command::Home => {
                self.screen = Screen::Landing;
                landing::render(&mut self.out, self.taps)?;
            }
            Command::Tap => {
                self.taps += 1;
                if self.screen == Screen::Landing {
                    writeln!(self.out, "Taps: {}", self.taps)?;
                } else {
                    writeln!(self.out, "The tap counter lives on the home screen.")?;
                }
            }
            Command::List { json } => {
                self.screen = Screen::List;
                self.stale.store(false, Ordering::SeqCst);
                if json {
                    list::render_json(&mut self.out, &self.store.snapshot())?;
                } else {
                    self.render_list()?;
                }
            }
            Command::Info => {
                self.screen = Screen::Info;
                info::render(&mut self.out, self.store.count())?;
            }
            Command::Add { title, description } => self.add(&title, &description)?,
            Command::Edit {
                id,
                title,
                description,
            } => self.edit(id, &title, description)?,
            Command::Delete { id } => self.delete(id)?,
            Command::Clear => {
                let removed = self.store.count();
                self.store.clear();
                writeln!(self.out, "Cleared {} todo(s)", removed)?;
            }
            Command::Dump => {
                let listing = self.store.with_store(|store| {
                    store.log_contents();
                    store.to_string()
                });
                writeln!(self.out, "{}", listing)?;
            }
            Command::Quit => self.running = false,
        }
        Ok(())
    }

    fn add(&mut self, title: &str, description: &str) -> Result<()> {
        let added = if self.config.store.trim_input {
            self.store.add_checked(title, description)
        } else {
            validate_title(title).map(|_| self.store.add(title, description))
        };

        match added {
            Ok(item) => {
                debug!(id = item.id, "todo added from shell");
                writeln!(self.out, "Todo added successfully!")?;
            }
            Err(MemtodoError::InvalidInput(_)) => writeln!(self.out, "Please enter a title")?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn edit(&mut self, id: i64, title: &str, description: Option<String>) -> Result<()> {
        let description = match description {
            Some(description) => description,
            None => match self.store.find_by_id(id) {
                Some(item) => item.description,
                None => return self.report_missing(id),
            },
        };
        let description = description.as_str();

        let updated = if self.config.store.trim_input {
            self.store.update_checked(id, title, description)
        } else {
            validate_title(title).map(|_| self.store.update(id, title, description))
        };

        match updated {
            Ok(true) => {
                let shown = self
                    .store
                    .find_by_id(id)
                    .map(|item| item.title)
                    .unwrap_or_default();
                writeln!(self.out, "Todo '{}' updated successfully!", shown)?;
            }
            Ok(false) => self.report_missing(id)?,
            Err(MemtodoError::InvalidInput(_)) => writeln!(self.out, "Please enter a title")?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<()> {
        if let Some(item) = self.store.find_by_id(id)
            && self.store.delete(&item)
        {
            writeln!(self.out, "Todo '{}' deleted", item.title)?;
        } else {
            writeln!(self.out, "{}", MemtodoError::NotFound(format!("todo {}", id)))?;
        }
        Ok(())
    }

    fn report_missing(&mut self, id: i64) -> Result<()> {
        warn!(id, "edit requested for unknown todo");
        writeln!(self.out, "{}", MemtodoError::NotFound(format!("todo {}", id)))?;
        Ok(())
    }

    fn render_list(&mut self) -> Result<()> {
        let items = self.store.snapshot();
        list::render(&mut self.out, &items, self.config.display.show_ids)
    }

    fn help(&mut self) -> Result<()> {
        writeln!(self.out, "Commands:")?;
        writeln!(self.out, "  home                              show the landing screen")?;
        writeln!(self.out, "  tap                               bump the landing screen counter")?;
        writeln!(self.out, "  list [--json]                     show all todos")?;
        writeln!(self.out, "  info                              show a summary")?;
        writeln!(self.out, "  add <title> [| <description>]     add a todo")?;
        writeln!(self.out, "  edit <id> <title> [| <description>]  change a todo (no | keeps the description)")?;
        writeln!(self.out, "  delete <id>                       remove a todo")?;
        writeln!(self.out, "  clear                             remove every todo")?;
        writeln!(self.out, "  dump                              print the raw store contents")?;
        writeln!(self.out, "  quit                              leave memtodo")?;
        Ok(())
    }
}

impl<W: Write> Drop for Shell<W> {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}
