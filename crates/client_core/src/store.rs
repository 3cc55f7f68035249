use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    direction,
    domain::Gesture,
    error::{GestureError, Operation},
    protocol::{GestureListResponse, GestureRequest, OperationResponse, TestExecuteRequest},
};
use tracing::{info, warn};

use crate::config::ClientConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub passed: bool,
    pub message: Option<String>,
}

/// Client side of the gesture backend. Actions are passed and returned decoded;
/// implementations own the transport encoding.
#[async_trait]
pub trait GestureStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Gesture>, GestureError>;
    async fn add(&self, name: &str, directions: &str, action: &str) -> Result<(), GestureError>;
    async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        directions: &str,
        action: &str,
    ) -> Result<(), GestureError>;
    async fn remove(&self, name: &str) -> Result<(), GestureError>;
    /// Runs `action` once on the backend. Never touches the collection.
    async fn test_execute(&self, action: &str) -> Result<TestOutcome, GestureError>;
}

pub struct HttpGestureStore {
    http: Client,
    config: ClientConfig,
}

fn transport(err: reqwest::Error) -> GestureError {
    GestureError::Transport(err.to_string())
}

fn operation_of(request: &GestureRequest) -> Operation {
    match request {
        GestureRequest::Add { .. } => Operation::Add,
        GestureRequest::Update { .. } => Operation::Update,
        GestureRequest::Delete { .. } => Operation::Delete,
    }
}

impl HttpGestureStore {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GestureError> {
        let response = response.error_for_status().map_err(transport)?;
        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|e| GestureError::Protocol(e.to_string()))
    }

    async fn post_operation(&self, request: GestureRequest) -> Result<(), GestureError> {
        let operation = operation_of(&request);
        info!(
            operation = request.operation(),
            name = request.target(),
            "gestures: sending request"
        );
        let response = self
            .http
            .post(self.config.mutate_url())
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let body: OperationResponse = Self::read_json(response).await?;

        if body.success {
            info!(
                operation = request.operation(),
                name = request.target(),
                "gestures: request accepted"
            );
            Ok(())
        } else {
            warn!(
                operation = request.operation(),
                name = request.target(),
                message = body.message.as_deref().unwrap_or_default(),
                "gestures: request rejected"
            );
            Err(GestureError::from_rejection(operation, body.message))
        }
    }
}

#[async_trait]
impl GestureStore for HttpGestureStore {
    async fn list(&self) -> Result<Vec<Gesture>, GestureError> {
        let response = self
            .http
            .get(self.config.list_url())
            .send()
            .await
            .map_err(transport)?;
        let body: GestureListResponse = Self::read_json(response).await?;
        if !body.success {
            let message = body
                .message
                .unwrap_or_else(|| "gesture list request reported failure".to_string());
            warn!(%message, "gestures: list rejected");
            return Err(GestureError::Protocol(message));
        }
        let gestures = body.into_gestures().map_err(GestureError::Protocol)?;
        info!(count = gestures.len(), "gestures: list loaded");
        Ok(gestures)
    }

    async fn add(&self, name: &str, directions: &str, action: &str) -> Result<(), GestureError> {
        direction::validate(directions)?;
        self.post_operation(GestureRequest::add(name, directions, action))
            .await
    }

    async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        directions: &str,
        action: &str,
    ) -> Result<(), GestureError> {
        direction::validate(directions)?;
        self.post_operation(GestureRequest::update(
            old_name, new_name, directions, action,
        ))
        .await
    }

    async fn remove(&self, name: &str) -> Result<(), GestureError> {
        self.post_operation(GestureRequest::delete(name)).await
    }

    async fn test_execute(&self, action: &str) -> Result<TestOutcome, GestureError> {
        info!(bytes = action.len(), "gestures: test-executing action");
        let response = self
            .http
            .post(self.config.test_url())
            .json(&TestExecuteRequest::new(action))
            .send()
            .await
            .map_err(transport)?;
        let body: OperationResponse = Self::read_json(response).await?;
        if !body.success {
            warn!(
                message = body.message.as_deref().unwrap_or_default(),
                "gestures: test execution failed"
            );
        }
        Ok(TestOutcome {
            passed: body.success,
            message: body.message,
        })
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
