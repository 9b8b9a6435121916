//! Blocking HTTP adapter for the remote knowledge collection.
//!
//! # Responsibility
//! - Translate `KnowledgeApi` calls into REST requests under one base URL.
//! - Emit `api_call` log events with duration and status.
//!
//! # Invariants
//! - No client-side timeout beyond the transport default.
//! - Request/response bodies are never logged.

use super::{ApiError, ApiOp, ApiResult, KnowledgeApi};
use crate::config::ClientConfig;
use crate::model::knowledge::{KnowledgeId, KnowledgePayload, KnowledgeRecord};
use log::{error, info};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Instant;

const COLLECTION_PATH: &str = "knowledges";

/// `KnowledgeApi` over HTTP using a blocking `reqwest` client.
pub struct HttpKnowledgeApi {
    client: Client,
    base_url: String,
}

impl HttpKnowledgeApi {
    /// Builds an adapter for the configured base URL.
    ///
    /// # Errors
    /// - Returns `ApiError::Transport` when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|err| ApiError::Transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    /// Collection URL, `{base}/knowledges`.
    pub fn collection_url(&self) -> String {
        format!("{}/{COLLECTION_PATH}", self.base_url)
    }

    /// Item URL, `{base}/knowledges/{id}`.
    pub fn item_url(&self, id: KnowledgeId) -> String {
        format!("{}/{COLLECTION_PATH}/{id}", self.base_url)
    }

    fn send(&self, op: ApiOp, request: RequestBuilder) -> ApiResult<Response> {
        let started_at = Instant::now();
        let response = match request.send() {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event=api_call module=api status=error op={} duration_ms={} error_code=transport_failed error={}",
                    op.as_str(),
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(ApiError::Transport(err.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!(
                "event=api_call module=api status=error op={} duration_ms={} http_status={}",
                op.as_str(),
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            let message = status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        info!(
            "event=api_call module=api status=ok op={} duration_ms={} http_status={}",
            op.as_str(),
            started_at.elapsed().as_millis(),
            status.as_u16()
        );
        Ok(response)
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    response
        .json::<T>()
        .map_err(|err| ApiError::Decode(err.to_string()))
}

impl KnowledgeApi for HttpKnowledgeApi {
    fn list(&self) -> ApiResult<Vec<KnowledgeRecord>> {
        let response = self.send(ApiOp::List, self.client.get(self.collection_url()))?;
        decode(response)
    }

    fn get(&self, id: KnowledgeId) -> ApiResult<KnowledgeRecord> {
        let response = self.send(ApiOp::Get, self.client.get(self.item_url(id)))?;
        decode(response)
    }

    fn create(&self, payload: &KnowledgePayload) -> ApiResult<KnowledgeRecord> {
        let request = self.client.post(self.collection_url()).json(payload);
        let response = self.send(ApiOp::Create, request)?;
        decode(response)
    }

    fn update(&self, id: KnowledgeId, payload: &KnowledgePayload) -> ApiResult<KnowledgeRecord> {
        let request = self.client.put(self.item_url(id)).json(payload);
        let response = self.send(ApiOp::Update, request)?;
        decode(response)
    }

    fn delete(&self, id: KnowledgeId) -> ApiResult<()> {
        // Body is not part of the contract.
        self.send(ApiOp::Delete, self.client.delete(self.item_url(id)))?;
        Ok(())
    }
}
