//! HTTP backend implementation
//!
//! JSON-over-HTTP client for the finance backend using reqwest.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, SpendingInsights, Suggestion, Transaction};

use super::endpoints;
use super::types::{
    AckResponse, CategorizeRequest, CategorizeResponse, CreateTransactionResponse,
    InsightsResponse, LearnCorrectionRequest, ListTransactionsResponse,
};
use super::FinanceApi;

/// reqwest-backed finance API client
#[derive(Clone)]
pub struct HttpApi {
    http_client: Client,
    base_url: String,
}

impl HttpApi {
    /// Create a new client for the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a JSON body, turning non-2xx statuses into `Error::Api`
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AckResponse>(&body)
                .ok()
                .and_then(|ack| ack.reason().map(str::to_string))
                .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));
            return Err(Error::api(status, message));
        }
        Ok(response.json().await?)
    }

    async fn expect_ack(response: Response, what: &str) -> Result<()> {
        let status = response.status();
        let ack: AckResponse = Self::decode(response).await?;
        if ack.success {
            Ok(())
        } else {
            Err(Error::api(
                status,
                ack.reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Failed to {}", what)),
            ))
        }
    }
}

#[async_trait]
impl FinanceApi for HttpApi {
    async fn create_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        let response = self
            .http_client
            .post(self.url(endpoints::TRANSACTIONS))
            .json(tx)
            .send()
            .await?;

        let status = response.status();
        let body: CreateTransactionResponse = Self::decode(response).await?;
        match (body.success, body.transaction) {
            (true, Some(transaction)) => {
                debug!(id = ?transaction.id, "Transaction created");
                Ok(transaction)
            }
            (true, None) => Err(Error::InvalidData(
                "Server reported success without a transaction".into(),
            )),
            (false, _) => Err(Error::api(
                status,
                body.message
                    .unwrap_or_else(|| "Failed to save transaction".to_string()),
            )),
        }
    }

    async fn update_transaction(&self, id: i64, tx: &NewTransaction) -> Result<()> {
        let response = self
            .http_client
            .put(self.url(&format!("{}/{}", endpoints::TRANSACTIONS, id)))
            .json(tx)
            .send()
            .await?;
        Self::expect_ack(response, "update transaction").await
    }

    async fn delete_transaction(&self, id: i64) -> Result<()> {
        let response = self
            .http_client
            .delete(self.url(&format!("{}/{}", endpoints::TRANSACTIONS, id)))
            .send()
            .await?;
        Self::expect_ack(response, "delete transaction").await
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let response = self
            .http_client
            .get(self.url(endpoints::TRANSACTIONS))
            .send()
            .await?;
        let body: ListTransactionsResponse = Self::decode(response).await?;
        Ok(body.transactions)
    }

    async fn categorize(&self, description: &str, user_id: &str) -> Result<Suggestion> {
        let request = CategorizeRequest {
            description: description.to_string(),
            user_id: user_id.to_string(),
        };

        let response = self
            .http_client
            .post(self.url(endpoints::AI_CATEGORIZE))
            .json(&request)
            .send()
            .await?;

        let body: CategorizeResponse = Self::decode(response).await?;
        debug!(success = body.success, "Categorize response");

        match (body.success, body.suggestion) {
            (true, Some(suggestion)) => Ok(suggestion),
            _ => Err(Error::InvalidData(
                body.error
                    .unwrap_or_else(|| "No AI suggestion received".to_string()),
            )),
        }
    }

    async fn learn_correction(
        &self,
        description: &str,
        correct_category: &str,
        user_id: &str,
    ) -> Result<()> {
        let request = LearnCorrectionRequest {
            description: description.to_string(),
            correct_category: correct_category.to_string(),
            user_id: user_id.to_string(),
        };

        let response = self
            .http_client
            .post(self.url(endpoints::AI_LEARN))
            .json(&request)
            .send()
            .await?;
        Self::expect_ack(response, "learn from correction").await
    }

    async fn spending_insights(&self, user_id: &str) -> Result<SpendingInsights> {
        let response = self
            .http_client
            .get(self.url(endpoints::AI_INSIGHTS))
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        let status = response.status();
        let body: InsightsResponse = Self::decode(response).await?;
        match (body.success, body.insights) {
            (true, Some(insights)) => Ok(insights),
            (true, None) => Ok(SpendingInsights::default()),
            (false, _) => Err(Error::api(
                status,
                body.error
                    .unwrap_or_else(|| "Failed to generate insights".to_string()),
            )),
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpApi::new("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(
            api.url(endpoints::AI_CATEGORIZE),
            "http://localhost:5000/api/ai/categorize-transaction"
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Port 9 (discard) is essentially never listening on loopback
        let api = HttpApi::new("http://127.0.0.1:9");
        let result = api.categorize("coffee", "demo_user").await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
