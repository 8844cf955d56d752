use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, Response };
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::ChatBackend;
use crate::error::ClientError;
use crate::models::api::{ ChatReply, ChatRequest, HistoryRecord, HistoryResponse };

#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    http: HttpClient,
    base_url: Url,
}

impl HttpChatBackend {
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends escaped path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::MalformedPayload(format!("base URL {} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn check_status(resp: Response) -> Result<Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(ClientError::Status {
                status,
                url: resp.url().to_string(),
            })
        }
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::MalformedPayload(e.to_string()))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>, ClientError> {
        let url = self.endpoint(&["history", user_id])?;
        debug!("GET {}", url);
        let resp = Self::check_status(self.http.get(url).send().await?)?;
        let data: HistoryResponse = Self::read_json(resp).await?;
        Ok(data.history)
    }

    async fn send_message(&self, user_id: &str, message: &str) -> Result<ChatReply, ClientError> {
        let url = self.endpoint(&["chat"])?;
        debug!("POST {}", url);
        let req = ChatRequest {
            user_id: user_id.to_string(),
            message: message.to_string(),
        };
        let resp = Self::check_status(self.http.post(url).json(&req).send().await?)?;
        Self::read_json(resp).await
    }

    async fn clear_history(&self, user_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["history", user_id])?;
        debug!("DELETE {}", url);
        Self::check_status(self.http.delete(url).send().await?)?;
        Ok(())
    }
}
