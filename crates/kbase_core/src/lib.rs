//! Core logic for the kbase knowledge-base client.
//! Page state, fetch lifecycle and CRUD mediation live here; front ends only
//! render pages and forward user intents.

pub mod api;
pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod ports;
pub mod render;
pub mod search;
pub mod session;
pub mod store;

pub use api::http::HttpKnowledgeApi;
pub use api::memory::MemoryKnowledgeApi;
pub use api::{execute, ApiError, ApiOp, ApiResult, KnowledgeApi, Outcome, Request};
pub use config::{resolve_log_dir, ClientConfig, DEFAULT_BASE_URL};
pub use controller::error::{AbortReason, IntentError, TransitionError};
pub use controller::page::{
    ChatPage, CreatePage, DetailPage, EditPage, FormDraft, MutationStatus, Page, PageKind,
};
pub use controller::ViewController;
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::knowledge::{
    DraftValidationError, KnowledgeId, KnowledgePayload, KnowledgeRecord, TAG_OPTIONS,
};
pub use ports::{BufferEditor, CannedResponder, ChatResponder, Confirmer, MarkdownSource};
pub use render::render_safe_html;
pub use search::filter::ListFilter;
pub use session::KnowledgeSession;
pub use store::{Dispatch, KnowledgeStore, LoadState, Ticket};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
