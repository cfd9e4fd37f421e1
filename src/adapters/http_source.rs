use crate::core::{IngredientLine, LineSource};
use crate::utils::error::{BuylistError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Fetches the cart's ingredient rows from the recipe backend.
///
/// The endpoint must answer with a JSON array of `{name, unit|measurement_unit, amount}`.
/// A token is sent as `Authorization: Token <token>`, the backend's auth scheme.
pub struct HttpSource {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(endpoint: String, token: Option<String>, timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            token,
        })
    }
}

#[async_trait]
impl LineSource for HttpSource {
    async fn fetch_lines(&self) -> Result<Vec<IngredientLine>> {
        tracing::debug!("Making API request to: {}", self.endpoint);

        let mut request = self.client.get(&self.endpoint);
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Token {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(BuylistError::ApiStatusError {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.bytes().await?;
        let lines: Vec<IngredientLine> = serde_json::from_slice(&body)?;
        Ok(lines)
    }

    fn describe(&self) -> String {
        format!("API {}", self.endpoint)
    }
}
