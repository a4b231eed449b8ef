use crate::domain::{CommandAck, PositionCommand, StateSnapshot, SyncApi, SyncClientError};
use crate::interface_adapters::protocol::{
    CommandResponse, RegisterRequest, RegisterResponse, StateRequest, StateResponse,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

// Thin reqwest client for the sync service. One pooled keep-alive connection is reused.
#[derive(Clone)]
pub struct HttpSyncClient {
    http: Client,
    base_url: String,
}

impl HttpSyncClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, SyncClientError> {
        let url = format!("{}{}", self.base_url, path);
        self.http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| SyncClientError::Transport(err.to_string()))
    }
}

// Keep upstream status/message; 404 is the server's "unknown client".
async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, SyncClientError> {
    let status = res.status();
    if status == StatusCode::NOT_FOUND {
        return Err(SyncClientError::UnknownClient);
    }
    if !status.is_success() {
        let message = res.text().await.unwrap_or_default();
        return Err(SyncClientError::Upstream {
            status: status.as_u16(),
            message,
        });
    }
    res.json::<T>()
        .await
        .map_err(|err| SyncClientError::Decode(err.to_string()))
}

#[async_trait]
impl SyncApi for HttpSyncClient {
    async fn register(&self, name: &str) -> Result<String, SyncClientError> {
        let res = self.post("/register", &RegisterRequest { name }).await?;
        let body: RegisterResponse = decode(res).await?;
        Ok(body.client_id)
    }

    async fn send_command(&self, cmd: &PositionCommand) -> Result<CommandAck, SyncClientError> {
        let res = self.post("/command", cmd).await?;
        let body: CommandResponse = decode(res).await?;
        if !body.applied && !body.error.is_empty() {
            return Err(SyncClientError::Upstream {
                status: StatusCode::OK.as_u16(),
                message: body.error,
            });
        }
        Ok(CommandAck {
            applied: body.applied,
        })
    }

    async fn get_state(&self, client_id: &str) -> Result<StateSnapshot, SyncClientError> {
        let res = self.post("/state", &StateRequest { client_id }).await?;
        let body: StateResponse = decode(res).await?;
        Ok(StateSnapshot {
            players: body.players,
            time_ms: body.time,
            map_lines: body.map_lines,
        })
    }
}
