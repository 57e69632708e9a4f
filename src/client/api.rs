use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::client::state::SearchResult;
use crate::models::{ErrorBody, SearchResultDto};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server responded with {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("server reported an error: {0}")]
    Api(String),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("terminal io: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can answer a search query with display-shaped results.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClientError>;
}

// A 200 body is normally an array, but may still carry an error field
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Results(Vec<SearchResultDto>),
    Failed(ErrorBody),
}

pub struct HttpSearchApi {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSearchApi {
    pub fn new(server: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let endpoint = Url::parse(server)
            .and_then(|base| base.join("/api/search"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url_for(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClientError> {
        let res = self.client.get(self.url_for(query)).send().await?;

        let status = res.status();
        if !status.is_success() {
            let message = res
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_default();
            return Err(ClientError::Status { status, message });
        }

        match res.json::<SearchResponse>().await? {
            SearchResponse::Results(items) => Ok(items.into_iter().map(SearchResult::from).collect()),
            SearchResponse::Failed(body) => Err(ClientError::Api(body.error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_onto_base() {
        let api = HttpSearchApi::new("http://localhost:8080", None).unwrap();
        assert_eq!(api.endpoint().as_str(), "http://localhost:8080/api/search");
    }

    #[test]
    fn query_is_percent_encoded() {
        let api = HttpSearchApi::new("http://localhost:8080/", None).unwrap();
        let url = api.url_for("data & ml");
        assert_eq!(url.query(), Some("q=data+%26+ml"));
    }

    #[test]
    fn rejects_garbage_server_url() {
        assert!(matches!(
            HttpSearchApi::new("not a url", None),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn response_shapes() {
        let ok: SearchResponse =
            serde_json::from_str(r#"[{"id":1,"name":"n","desc":"d","type":"t"}]"#).unwrap();
        assert!(matches!(ok, SearchResponse::Results(ref v) if v.len() == 1));

        let failed: SearchResponse = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert!(matches!(failed, SearchResponse::Failed(ref b) if b.error == "nope"));
    }
}
