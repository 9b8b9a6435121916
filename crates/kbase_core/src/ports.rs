//! Narrow interfaces to interactive collaborators.
//!
//! # Responsibility
//! - Editing surface read at submit time (`MarkdownSource`).
//! - Blocking confirmation dialogs (`Confirmer`).
//! - Chat panel answer source (`ChatResponder`).

/// Fixed answer returned by the chat stub.
pub const CANNED_CHAT_ANSWER: &str =
    "ご質問ありがとうございます。AI回答のサンプルです。\n（本番ではナレッジをもとにAIが回答します）";

/// Pull-based accessor for the markdown held by an editing surface.
///
/// Read once per submit, never kept in sync on every keystroke.
pub trait MarkdownSource {
    fn current_markdown(&self) -> String;
}

/// Plain in-memory editing surface seeded with an initial markdown string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferEditor {
    text: String,
}

impl BufferEditor {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: initial.into(),
        }
    }

    /// Replaces the whole buffer.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Appends one line, inserting a newline separator when needed.
    pub fn push_line(&mut self, line: &str) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl MarkdownSource for BufferEditor {
    fn current_markdown(&self) -> String {
        self.text.clone()
    }
}

/// Blocking yes/no, free-text and alert dialogs.
pub trait Confirmer {
    /// Yes/no question; `true` means accepted.
    fn confirm(&mut self, message: &str) -> bool;
    /// Free-text question; `None` means cancelled.
    fn prompt(&mut self, message: &str) -> Option<String>;
    /// Informational alert that blocks until acknowledged.
    fn alert(&mut self, message: &str);
}

/// Produces chat answers for the chat page.
pub trait ChatResponder {
    fn respond(&self, question: &str) -> String;
}

/// Chat stub answering every question with `CANNED_CHAT_ANSWER`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedResponder;

impl ChatResponder for CannedResponder {
    fn respond(&self, _question: &str) -> String {
        CANNED_CHAT_ANSWER.to_string()
    }
}
