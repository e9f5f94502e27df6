//! Finance backend API abstraction
//!
//! The backend (transaction storage, AI categorization, correction learning,
//! insights) is an external collaborator reached over HTTP.
//!
//! # Architecture
//!
//! - `FinanceApi` trait: the interface the controller talks to
//! - `HttpApi`: reqwest implementation against the real backend
//! - `MockApi`: scripted in-process implementation for tests
//!
//! Every call is a single attempt. There is no retry or backoff and no timeout
//! beyond the transport default.

mod http;
mod mock;
pub mod types;

pub use http::HttpApi;
pub use mock::{sample_transaction, MockApi, MockCall};
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewTransaction, SpendingInsights, Suggestion, Transaction};

/// Endpoint paths relative to the API base URL
pub mod endpoints {
    pub const TRANSACTIONS: &str = "/api/transactions";
    pub const CUSTOMERS: &str = "/api/customers";
    pub const BUSINESS_TRANSACTIONS: &str = "/api/khatabook/transactions";
    pub const REPORTS: &str = "/api/reports";
    pub const AI_CATEGORIZE: &str = "/api/ai/categorize-transaction";
    pub const AI_LEARN: &str = "/api/ai/learn-correction";
    pub const AI_INSIGHTS: &str = "/api/ai/spending-insights";
}

/// Trait defining the interface to the finance backend
///
/// Implementations must be cheap to clone: the controller hands a clone to
/// each spawned request.
#[async_trait]
pub trait FinanceApi: Send + Sync {
    /// Create a transaction, returning the server's canonical record
    async fn create_transaction(&self, tx: &NewTransaction) -> Result<Transaction>;

    /// Replace an existing transaction
    async fn update_transaction(&self, id: i64, tx: &NewTransaction) -> Result<()>;

    /// Delete a transaction
    async fn delete_transaction(&self, id: i64) -> Result<()>;

    /// Fetch all transactions (server order)
    async fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Ask the AI categorizer for a category suggestion
    ///
    /// Fails when the response is not successful or carries no suggestion.
    async fn categorize(&self, description: &str, user_id: &str) -> Result<Suggestion>;

    /// Report a user's manual correction of a suggestion
    async fn learn_correction(
        &self,
        description: &str,
        correct_category: &str,
        user_id: &str,
    ) -> Result<()>;

    /// Fetch AI spending insights
    async fn spending_insights(&self, user_id: &str) -> Result<SpendingInsights>;

    /// Get the base URL (for logging)
    fn base_url(&self) -> &str;
}
