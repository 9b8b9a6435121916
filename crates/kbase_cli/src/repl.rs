//! Interactive command loop.
//!
//! # Responsibility
//! - Parse one command per input line.
//! - Forward it to the session and redraw the active page.
//!
//! # Invariants
//! - Intent errors are printed, never fatal; only `quit` or end of input
//!   ends the loop.

use crate::terminal::Terminal;
use crate::view::render_page;
use kbase_core::{
    BufferEditor, CannedResponder, IntentError, KnowledgeApi, KnowledgeId, KnowledgeSession,
    TransitionError,
};
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  list:   search <text> | tag <tag> | open <id> | new | chat
  detail: edit | delete | back
  form:   title <text> | body <line> | body! <text> | clear | toggle <tag> | save | back
  chat:   ask <question> | back
  any:    help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Tag(String),
    Open(KnowledgeId),
    New,
    Chat,
    Edit,
    Delete,
    Back,
    Title(String),
    Body(String),
    ReplaceBody(String),
    ClearBody,
    Toggle(String),
    Save,
    Ask(String),
    Help,
    Quit,
}

/// Parses one input line. The argument keeps its inner whitespace.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim_end(), ""),
    };
    let command = match word {
        "search" => Command::Search(rest.to_string()),
        "tag" => Command::Tag(rest.trim().to_string()),
        "open" => {
            let id = rest
                .trim()
                .parse::<KnowledgeId>()
                .map_err(|_| format!("`open` expects a numeric id, got `{}`", rest.trim()))?;
            Command::Open(id)
        }
        "new" => Command::New,
        "chat" => Command::Chat,
        "edit" => Command::Edit,
        "delete" => Command::Delete,
        "back" | "cancel" => Command::Back,
        "title" => Command::Title(rest.to_string()),
        "body" => Command::Body(rest.to_string()),
        "body!" => Command::ReplaceBody(rest.to_string()),
        "clear" => Command::ClearBody,
        "toggle" => Command::Toggle(rest.trim().to_string()),
        "save" => Command::Save,
        "ask" => Command::Ask(rest.to_string()),
        "help" | "" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(command)
}

pub struct Repl<A: KnowledgeApi, R, W> {
    session: KnowledgeSession<A>,
    terminal: Terminal<R, W>,
    editor: BufferEditor,
}

impl<A: KnowledgeApi, R: BufRead, W: Write> Repl<A, R, W> {
    pub fn new(session: KnowledgeSession<A>, terminal: Terminal<R, W>) -> Self {
        Self {
            session,
            terminal,
            editor: BufferEditor::default(),
        }
    }

    pub fn run(&mut self) {
        self.session.start();
        self.redraw();
        while let Some(line) = self.terminal.read_line() {
            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => self.terminal.say(HELP),
                Ok(command) => {
                    if let Err(message) = self.apply(command) {
                        self.terminal.say(&format!("! {message}"));
                    }
                    self.redraw();
                }
                Err(message) => self.terminal.say(&format!("! {message}")),
            }
        }
    }

    fn apply(&mut self, command: Command) -> Result<(), String> {
        let controller = self.session.controller_mut();
        match command {
            Command::Search(text) => controller.set_search(text),
            Command::Tag(tag) => controller.set_tag_filter(&tag),
            Command::Open(id) => self.session.select(id).map_err(describe)?,
            Command::New => {
                controller.open_create().map_err(describe)?;
                self.editor = BufferEditor::default();
            }
            Command::Chat => controller.open_chat().map_err(describe)?,
            Command::Edit => {
                let initial = controller.open_edit().map_err(describe)?;
                self.editor = BufferEditor::new(initial);
            }
            Command::Delete => self
                .session
                .request_delete(&mut self.terminal)
                .or_else(quiet_abort)?,
            Command::Back => self.session.back(),
            Command::Title(title) => controller.set_form_title(title).map_err(describe)?,
            Command::Body(line) => self.editor.push_line(&line),
            Command::ReplaceBody(text) => self.editor.set_text(text),
            Command::ClearBody => self.editor.set_text(""),
            Command::Toggle(tag) => controller.toggle_form_tag(&tag).map_err(describe)?,
            Command::Save => self.save()?,
            Command::Ask(question) => {
                controller.set_chat_question(question).map_err(describe)?;
                controller.send_chat(&CannedResponder).map_err(describe)?;
            }
            Command::Help | Command::Quit => {}
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), String> {
        let result = match self.session.controller().page_kind() {
            kbase_core::PageKind::Create => self.session.submit_create(&self.editor),
            kbase_core::PageKind::Edit => self.session.submit_edit(&self.editor),
            other => {
                return Err(format!("nothing to save on the {} page", other.as_str()));
            }
        };
        match result {
            Err(IntentError::Validation(_)) => Ok(()),
            other => other.map_err(|err| err.to_string()),
        }
    }

    fn redraw(&mut self) {
        let text = render_page(self.session.controller(), &self.editor);
        self.terminal.say("");
        self.terminal.say(&text);
    }

    #[cfg(test)]
    fn into_parts(self) -> (KnowledgeSession<A>, W) {
        (self.session, self.terminal.into_output())
    }
}

fn describe(err: TransitionError) -> String {
    err.to_string()
}

/// The dialogs already told the user about an abort.
fn quiet_abort(err: IntentError) -> Result<(), String> {
    match err {
        IntentError::ConfirmationAborted(_) => Ok(()),
        other => Err(other.to_string()),
    }
}
