//! Move-provider seam and its HTTP implementation.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use sweeper_protocol::{BoardObservation, MoveResponse, Strategy, TrainResponse};

use crate::{ClientConfig, ProviderError};

/// External agent that picks moves for a masked board.
#[async_trait]
pub trait MoveProvider: Send + Sync {
    /// Asks `strategy` for a single action on `observation`.
    async fn next_move(
        &self,
        strategy: Strategy,
        observation: &BoardObservation,
    ) -> Result<MoveResponse, ProviderError>;

    /// Asks the provider to (re)train its learned strategy.
    async fn train(&self) -> Result<TrainResponse, ProviderError>;

    async fn ping(&self) -> Result<String, ProviderError>;
}

/// Provider reached over HTTP with JSON bodies.
pub struct HttpMoveProvider {
    config: ClientConfig,
    http_client: HttpClient,
}

impl HttpMoveProvider {
    pub fn new(config: ClientConfig) -> Result<Self, ProviderError> {
        let http_client = HttpClient::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl MoveProvider for HttpMoveProvider {
    async fn next_move(
        &self,
        strategy: Strategy,
        observation: &BoardObservation,
    ) -> Result<MoveResponse, ProviderError> {
        let url = self.config.move_url(strategy);
        log::debug!("Requesting {} move from {}", strategy, url);

        let response = self.http_client.post(&url).json(observation).send().await?;
        decode_json(response).await
    }

    async fn train(&self) -> Result<TrainResponse, ProviderError> {
        let url = self.config.train_url();
        log::debug!("Triggering training at {}", url);

        let response = self.http_client.post(&url).send().await?;
        decode_json(response).await
    }

    async fn ping(&self) -> Result<String, ProviderError> {
        let response = self.http_client.get(self.config.ping_url()).send().await?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Ok(serde_json::from_slice(&body)?)
}
