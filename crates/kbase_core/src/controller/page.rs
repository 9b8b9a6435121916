//! Page states of the view controller.
//!
//! Each variant owns exactly the data its page needs; leaving a page drops
//! that data, which resets its error/loading slots on the next entry.

use crate::model::knowledge::{toggle_tag, KnowledgeId, KnowledgeRecord};
use crate::store::Ticket;

/// Discriminant of `Page`, used in logs and transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    List,
    Detail,
    Create,
    Edit,
    Chat,
}

impl PageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Chat => "chat",
        }
    }
}

/// Loading flag and error message scoped to one page's mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationStatus {
    pending: Option<Ticket>,
    error: Option<String>,
}

impl MutationStatus {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn awaits(&self, ticket: Ticket) -> bool {
        self.pending == Some(ticket)
    }

    pub(crate) fn start(&mut self, ticket: Ticket) {
        self.pending = Some(ticket);
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.pending = None;
        self.error = Some(message.into());
    }
}

/// Title and tag selection of a create/edit form.
///
/// Body text lives in the editing surface and is pulled at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub title: String,
    pub tags: Vec<String>,
}

impl FormDraft {
    pub fn toggle_tag(&mut self, tag: &str) {
        toggle_tag(&mut self.tags, tag);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    id: KnowledgeId,
    pub(crate) delete: MutationStatus,
}

impl DetailPage {
    pub(crate) fn new(id: KnowledgeId) -> Self {
        Self {
            id,
            delete: MutationStatus::default(),
        }
    }

    /// Identity of the selected record.
    pub fn id(&self) -> KnowledgeId {
        self.id
    }

    pub fn delete_status(&self) -> &MutationStatus {
        &self.delete
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePage {
    pub(crate) draft: FormDraft,
    pub(crate) submit: MutationStatus,
}

impl CreatePage {
    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn submit_status(&self) -> &MutationStatus {
        &self.submit
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPage {
    target: KnowledgeRecord,
    pub(crate) draft: FormDraft,
    pub(crate) submit: MutationStatus,
}

impl EditPage {
    /// Seeds the form from the freshly fetched detail record.
    pub(crate) fn seeded_from(target: KnowledgeRecord) -> Self {
        let draft = FormDraft {
            title: target.title.clone(),
            tags: target.tags.clone(),
        };
        Self {
            target,
            draft,
            submit: MutationStatus::default(),
        }
    }

    /// Record being edited, as fetched.
    pub fn target(&self) -> &KnowledgeRecord {
        &self.target
    }

    /// Markdown the editing surface starts from.
    pub fn initial_markdown(&self) -> &str {
        &self.target.content
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn submit_status(&self) -> &MutationStatus {
        &self.submit
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatPage {
    pub(crate) question: String,
    pub(crate) answer: Option<String>,
}

impl ChatPage {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }
}

/// The single active page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    List,
    Detail(DetailPage),
    Create(CreatePage),
    Edit(EditPage),
    Chat(ChatPage),
}

impl Page {
    pub fn kind(&self) -> PageKind {
        match self {
            Self::List => PageKind::List,
            Self::Detail(_) => PageKind::Detail,
            Self::Create(_) => PageKind::Create,
            Self::Edit(_) => PageKind::Edit,
            Self::Chat(_) => PageKind::Chat,
        }
    }
}
