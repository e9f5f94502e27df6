//! Request and response envelopes for the finance backend
//!
//! Every endpoint wraps its payload in a `{success, ...}` envelope. Error
//! responses carry an `error` (AI endpoints) or `message` (CRUD) string.

use serde::{Deserialize, Serialize};

use crate::models::{SpendingInsights, Suggestion, Transaction};

/// Body of `POST /api/ai/categorize-transaction`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub description: String,
    pub user_id: String,
}

/// Body of `POST /api/ai/learn-correction`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnCorrectionRequest {
    pub description: String,
    pub correct_category: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub suggestion: Option<Suggestion>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub transaction: Option<Transaction>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub insights: Option<SpendingInsights>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Plain acknowledgement (`PUT`/`DELETE` transaction, learn-correction)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AckResponse {
    /// Best available human-readable reason for a failure
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}
