//! Mock backend for testing
//!
//! Records every call and replays scripted categorization outcomes.
//! Useful for controller tests without a running backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{NewTransaction, SpendingInsights, Suggestion, Transaction};

use super::FinanceApi;

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Categorize { description: String, user_id: String },
    LearnCorrection {
        description: String,
        correct_category: String,
        user_id: String,
    },
    CreateTransaction(NewTransaction),
    UpdateTransaction(i64, NewTransaction),
    DeleteTransaction(i64),
    ListTransactions,
    SpendingInsights,
}

/// Scripted outcome of a categorize call
#[derive(Debug, Clone)]
struct ScriptedSuggestion {
    delay: Duration,
    outcome: std::result::Result<Suggestion, String>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<MockCall>,
    suggestions: VecDeque<ScriptedSuggestion>,
    fail_writes: bool,
    fail_learning: bool,
    next_id: i64,
    transactions: Vec<Transaction>,
}

/// Mock finance API
///
/// Clones share state, so a test can keep a handle while the controller owns
/// another.
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the calls it already made
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a successful suggestion for the next categorize call
    pub fn push_suggestion(&self, category: &str, confidence: f64) {
        self.push_suggestion_after(Duration::ZERO, category, confidence);
    }

    /// Queue a suggestion that is returned after `delay`
    pub fn push_suggestion_after(&self, delay: Duration, category: &str, confidence: f64) {
        self.lock().suggestions.push_back(ScriptedSuggestion {
            delay,
            outcome: Ok(Suggestion::new(category, confidence)),
        });
    }

    /// Queue a failing categorize call
    pub fn push_categorize_failure(&self, message: &str) {
        self.lock().suggestions.push_back(ScriptedSuggestion {
            delay: Duration::ZERO,
            outcome: Err(message.to_string()),
        });
    }

    /// Make create/update/delete fail
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Make learn-correction fail
    pub fn fail_learning(&self, fail: bool) {
        self.lock().fail_learning = fail;
    }

    /// Seed the server-side transaction list
    pub fn seed_transactions(&self, transactions: Vec<Transaction>) {
        let mut state = self.lock();
        state.next_id = transactions.iter().filter_map(|t| t.id).max().unwrap_or(0);
        state.transactions = transactions;
    }

    /// All calls observed so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Descriptions sent to the categorizer, in order
    pub fn categorize_calls(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Categorize { description, .. } => Some(description.clone()),
                _ => None,
            })
            .collect()
    }

    /// `(description, correct_category)` pairs reported as corrections
    pub fn corrections(&self) -> Vec<(String, String)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::LearnCorrection {
                    description,
                    correct_category,
                    ..
                } => Some((description.clone(), correct_category.clone())),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl FinanceApi for MockApi {
    async fn create_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        let mut state = self.lock();
        state.calls.push(MockCall::CreateTransaction(tx.clone()));
        if state.fail_writes {
            return Err(Error::Api {
                status: 500,
                message: "Failed to save transaction".into(),
            });
        }
        state.next_id += 1;
        let mut extra = serde_json::Map::new();
        extra.insert(
            "created_at".into(),
            serde_json::Value::String(format!("{} 00:00:00", tx.date)),
        );
        let record = Transaction {
            id: Some(state.next_id),
            date: tx.date,
            amount: tx.amount,
            transaction_type: tx.transaction_type,
            category: tx.category.clone(),
            description: tx.description.clone(),
            extra,
        };
        state.transactions.push(record.clone());
        Ok(record)
    }

    async fn update_transaction(&self, id: i64, tx: &NewTransaction) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(MockCall::UpdateTransaction(id, tx.clone()));
        if state.fail_writes {
            return Err(Error::Api {
                status: 500,
                message: "Failed to update transaction".into(),
            });
        }
        if let Some(existing) = state.transactions.iter_mut().find(|t| t.id == Some(id)) {
            let updated = Transaction::from_update(id, tx, Some(&*existing));
            *existing = updated;
        }
        Ok(())
    }

    async fn delete_transaction(&self, id: i64) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(MockCall::DeleteTransaction(id));
        if state.fail_writes {
            return Err(Error::Api {
                status: 500,
                message: "Failed to delete transaction".into(),
            });
        }
        state.transactions.retain(|t| t.id != Some(id));
        Ok(())
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut state = self.lock();
        state.calls.push(MockCall::ListTransactions);
        let mut list = state.transactions.clone();
        // Backend orders newest date first
        list.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(list)
    }

    async fn categorize(&self, description: &str, user_id: &str) -> Result<Suggestion> {
        let scripted = {
            let mut state = self.lock();
            state.calls.push(MockCall::Categorize {
                description: description.to_string(),
                user_id: user_id.to_string(),
            });
            state.suggestions.pop_front()
        };

        let Some(scripted) = scripted else {
            return Err(Error::InvalidData("No AI suggestion received".into()));
        };

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.outcome.map_err(Error::InvalidData)
    }

    async fn learn_correction(
        &self,
        description: &str,
        correct_category: &str,
        user_id: &str,
    ) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(MockCall::LearnCorrection {
            description: description.to_string(),
            correct_category: correct_category.to_string(),
            user_id: user_id.to_string(),
        });
        if state.fail_learning {
            return Err(Error::Api {
                status: 500,
                message: "Failed to learn from correction".into(),
            });
        }
        Ok(())
    }

    async fn spending_insights(&self, _user_id: &str) -> Result<SpendingInsights> {
        let mut state = self.lock();
        state.calls.push(MockCall::SpendingInsights);
        let mut insights = SpendingInsights::default();
        for tx in state
            .transactions
            .iter()
            .filter(|t| t.transaction_type == crate::models::TransactionType::Expense)
        {
            *insights
                .category_breakdown
                .entry(tx.category.clone())
                .or_insert(0.0) += tx.amount;
        }
        Ok(insights)
    }

    fn base_url(&self) -> &str {
        "mock://finance"
    }
}

/// Convenience constructor for test records
pub fn sample_transaction(
    id: i64,
    date: (i32, u32, u32),
    amount: f64,
    transaction_type: crate::models::TransactionType,
    category: &str,
) -> Transaction {
    Transaction {
        id: Some(id),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap_or_default(),
        amount,
        transaction_type,
        category: category.to_string(),
        description: format!("{} #{}", category, id),
        extra: serde_json::Map::new(),
    }
}
