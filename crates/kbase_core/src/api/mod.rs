//! Remote knowledge collection contracts and adapters.
//!
//! # Responsibility
//! - Define the `KnowledgeApi` port consumed by the session driver.
//! - Map transport, status and decoding failures into one `ApiError` type.
//!
//! # Invariants
//! - Every intent is a single request/response round trip; no retries.
//! - Non-2xx responses are failures regardless of body content.
//!
//! # See also
//! - `http` for the reqwest adapter, `memory` for the in-process collection.

pub mod http;
pub mod memory;

use crate::model::knowledge::{KnowledgeId, KnowledgePayload, KnowledgeRecord};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of one round trip against the remote collection.
#[derive(Debug)]
pub enum ApiError {
    /// Request could not be sent or the response could not be read.
    Transport(String),
    /// Remote collection answered with a non-2xx status.
    Status { status: u16, message: String },
    /// Response body did not decode into the expected shape.
    Decode(String),
}

impl ApiError {
    /// Returns the HTTP status for `Status` failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Status { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
        }
    }
}

impl Error for ApiError {}

/// Port to the remote knowledge collection.
pub trait KnowledgeApi {
    /// `GET /knowledges`
    fn list(&self) -> ApiResult<Vec<KnowledgeRecord>>;
    /// `GET /knowledges/{id}`
    fn get(&self, id: KnowledgeId) -> ApiResult<KnowledgeRecord>;
    /// `POST /knowledges`
    fn create(&self, payload: &KnowledgePayload) -> ApiResult<KnowledgeRecord>;
    /// `PUT /knowledges/{id}`
    fn update(&self, id: KnowledgeId, payload: &KnowledgePayload) -> ApiResult<KnowledgeRecord>;
    /// `DELETE /knowledges/{id}`
    fn delete(&self, id: KnowledgeId) -> ApiResult<()>;
}

impl<A: KnowledgeApi + ?Sized> KnowledgeApi for &A {
    fn list(&self) -> ApiResult<Vec<KnowledgeRecord>> {
        (**self).list()
    }

    fn get(&self, id: KnowledgeId) -> ApiResult<KnowledgeRecord> {
        (**self).get(id)
    }

    fn create(&self, payload: &KnowledgePayload) -> ApiResult<KnowledgeRecord> {
        (**self).create(payload)
    }

    fn update(&self, id: KnowledgeId, payload: &KnowledgePayload) -> ApiResult<KnowledgeRecord> {
        (**self).update(id, payload)
    }

    fn delete(&self, id: KnowledgeId) -> ApiResult<()> {
        (**self).delete(id)
    }
}

/// One round trip the controller has decided is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Get(KnowledgeId),
    Create(KnowledgePayload),
    Update(KnowledgeId, KnowledgePayload),
    Delete(KnowledgeId),
}

impl Request {
    /// Operation kind of this request.
    pub fn op(&self) -> ApiOp {
        match self {
            Self::List => ApiOp::List,
            Self::Get(_) => ApiOp::Get,
            Self::Create(_) => ApiOp::Create,
            Self::Update(_, _) => ApiOp::Update,
            Self::Delete(_) => ApiOp::Delete,
        }
    }
}

/// Operation kind, one per `KnowledgeApi` method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiOp {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl ApiOp {
    /// Stable label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Successful result of one `Request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listed(Vec<KnowledgeRecord>),
    Fetched(KnowledgeRecord),
    Created(KnowledgeRecord),
    Updated(KnowledgeRecord),
    Deleted,
}

/// Executes `request` against `api`.
pub fn execute<A: KnowledgeApi + ?Sized>(api: &A, request: &Request) -> ApiResult<Outcome> {
    match request {
        Request::List => api.list().map(Outcome::Listed),
        Request::Get(id) => api.get(*id).map(Outcome::Fetched),
        Request::Create(payload) => api.create(payload).map(Outcome::Created),
        Request::Update(id, payload) => api.update(*id, payload).map(Outcome::Updated),
        Request::Delete(id) => api.delete(*id).map(|()| Outcome::Deleted),
    }
}
