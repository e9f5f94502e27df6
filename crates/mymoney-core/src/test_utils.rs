//! Test utilities for mymoney-core
//!
//! This module provides a mock finance backend that speaks the same JSON API
//! as the real server. It keeps transactions in memory and categorizes with a
//! small keyword matcher, which is enough for integration tests and local
//! development of the CLI.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use regex::Regex;
use serde::Deserialize;
use tokio::sync::oneshot;

use crate::api::endpoints;
use crate::api::{
    AckResponse, CategorizeRequest, CategorizeResponse, CreateTransactionResponse,
    InsightsResponse, LearnCorrectionRequest, ListTransactionsResponse,
};
use crate::models::{NewTransaction, SpendingInsights, Suggestion, Transaction, TransactionType};
use crate::summary::format_currency;

/// Keyword patterns per category, two patterns each
const CATEGORY_PATTERNS: &[(&str, [&str; 2])] = &[
    (
        "Food & Dining",
        [
            r"restaurant|food|dining|cafe|pizza|burger|coffee|lunch|dinner|breakfast|meal|zomato|swiggy",
            r"grocery|supermarket|mart|store|market|vegetables|fruits|milk|bread|rice|dal|oil",
        ],
    ),
    (
        "Transportation",
        [
            r"uber|ola|taxi|cab|bus|metro|train|petrol|diesel|fuel|parking|toll|auto|rickshaw",
            r"bike|car|vehicle|maintenance|service|repair|insurance|emi",
        ],
    ),
    (
        "Shopping",
        [
            r"amazon|flipkart|myntra|shopping|mall|clothes|dress|shoes|electronics|laptop|gift",
            r"online|purchase|buy|order|delivery|retail|fashion|beauty|cosmetics",
        ],
    ),
    (
        "Bills & Utilities",
        [
            r"electricity|electric|power|water|gas|internet|wifi|broadband|phone|recharge|bill",
            r"rent|society|housing|apartment|flat|home|mortgage",
        ],
    ),
    (
        "Entertainment",
        [
            r"movie|cinema|theater|netflix|spotify|game|gaming|entertainment|party|club",
            r"sports|gym|fitness|membership|subscription|youtube|music",
        ],
    ),
    (
        "Travel",
        [
            r"travel|trip|vacation|holiday|hotel|flight|booking|tourism|airbnb|oyo",
            r"visa|passport|luggage|tour|destination|resort",
        ],
    ),
    (
        "Salary & Income",
        [
            r"salary|income|bonus|incentive|commission|freelance|received|credit|wages",
            r"dividend|interest|cashback|refund|reimbursement",
        ],
    ),
];

const LEARNED_CONFIDENCE: f64 = 0.95;
const DEFAULT_CONFIDENCE: f64 = 0.3;

/// Keyword categorizer with per-user learned corrections
struct Categorizer {
    rules: Vec<(&'static str, Vec<(Regex, &'static str)>)>,
    /// user_id -> (pattern, category), in learning order
    learned: BTreeMap<String, Vec<(Regex, String)>>,
}

impl Categorizer {
    fn new() -> Self {
        let rules = CATEGORY_PATTERNS
            .iter()
            .map(|(category, patterns)| {
                let compiled = patterns
                    .iter()
                    .map(|p| (Regex::new(p).unwrap(), *p))
                    .collect();
                (*category, compiled)
            })
            .collect();
        Self {
            rules,
            learned: BTreeMap::new(),
        }
    }

    fn categorize(&self, description: &str, user_id: &str) -> Suggestion {
        let lower = description.to_lowercase();

        if let Some(patterns) = self.learned.get(user_id) {
            if let Some((_, category)) = patterns.iter().find(|(re, _)| re.is_match(&lower)) {
                let mut s = Suggestion::new(category, LEARNED_CONFIDENCE);
                s.source = Some("user_learned".into());
                return s;
            }
        }

        let words: Vec<&str> = lower.split_whitespace().collect();
        let mut scores: Vec<(&str, u32)> = Vec::new();
        for (category, patterns) in &self.rules {
            let score: u32 = patterns
                .iter()
                .filter(|(re, _)| re.is_match(&lower))
                .map(|(_, raw)| {
                    // Whole-word hits count double
                    if raw.split('|').any(|kw| words.contains(&kw)) {
                        2
                    } else {
                        1
                    }
                })
                .sum();
            if score > 0 {
                scores.push((category, score));
            }
        }

        // First category wins ties
        let best = scores
            .iter()
            .fold(None::<(&str, u32)>, |best, &(cat, score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((cat, score)),
            });

        match best {
            Some((category, score)) => {
                let mut s = Suggestion::new(category, (f64::from(score) * 0.15).min(0.9));
                s.source = Some("rule_based".into());
                scores.sort_by(|a, b| b.1.cmp(&a.1));
                s.alternatives = scores.iter().take(3).map(|(c, _)| c.to_string()).collect();
                s
            }
            None => {
                let mut s = Suggestion::new("Other", DEFAULT_CONFIDENCE);
                s.source = Some("default".into());
                s.alternatives = vec![
                    "Food & Dining".into(),
                    "Shopping".into(),
                    "Transportation".into(),
                ];
                s
            }
        }
    }

    /// Remember a correction keyed on the first three significant words
    fn learn(&mut self, user_id: &str, description: &str, category: &str) {
        let lower = description.to_lowercase();
        let pattern = lower
            .split_whitespace()
            .filter(|w| w.chars().count() > 3)
            .take(3)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        let re = Regex::new(&pattern).unwrap();

        let patterns = self.learned.entry(user_id.to_string()).or_default();
        match patterns.iter_mut().find(|(r, _)| r.as_str() == pattern) {
            Some(entry) => entry.1 = category.to_string(),
            None => patterns.push((re, category.to_string())),
        }
    }
}

/// How the mock answers categorize and create requests
///
/// Anything other than `Normal` still replies with HTTP 200, so clients must
/// look at the payload to notice the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyMode {
    #[default]
    Normal,
    /// `success: false` with a reason
    Declined,
    /// `success: true` but no suggestion or transaction in the body
    Empty,
}

struct ServerState {
    transactions: Vec<Transaction>,
    next_id: i64,
    failing: bool,
    reply: ReplyMode,
    corrections: Vec<LearnCorrectionRequest>,
    categorizer: Categorizer,
}

type SharedState = Arc<Mutex<ServerState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, ServerState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Mock finance backend for testing and development
pub struct MockFinanceServer {
    addr: SocketAddr,
    state: SharedState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockFinanceServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(ServerState {
            transactions: Vec::new(),
            next_id: 0,
            failing: false,
            reply: ReplyMode::Normal,
            corrections: Vec::new(),
            categorizer: Categorizer::new(),
        }));

        let app = Router::new()
            .route(
                endpoints::TRANSACTIONS,
                get(handle_list).post(handle_create),
            )
            .route(
                &format!("{}/:id", endpoints::TRANSACTIONS),
                put(handle_update).delete(handle_delete),
            )
            .route(endpoints::AI_CATEGORIZE, post(handle_categorize))
            .route(endpoints::AI_LEARN, post(handle_learn))
            .route(endpoints::AI_INSIGHTS, get(handle_insights))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make transaction writes fail with a 500
    pub fn set_failing(&self, failing: bool) {
        lock(&self.state).failing = failing;
    }

    /// Change how categorize and create requests are answered
    pub fn set_reply_mode(&self, reply: ReplyMode) {
        lock(&self.state).reply = reply;
    }

    /// Transactions currently stored server-side
    pub fn transactions(&self) -> Vec<Transaction> {
        lock(&self.state).transactions.clone()
    }

    /// Corrections received so far
    pub fn corrections(&self) -> Vec<LearnCorrectionRequest> {
        lock(&self.state).corrections.clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockFinanceServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn failure(message: &str) -> (StatusCode, Json<AckResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(AckResponse {
            success: false,
            message: Some(message.to_string()),
            error: None,
        }),
    )
}

fn ack() -> (StatusCode, Json<AckResponse>) {
    (
        StatusCode::OK,
        Json(AckResponse {
            success: true,
            message: None,
            error: None,
        }),
    )
}

async fn handle_list(State(state): State<SharedState>) -> Json<ListTransactionsResponse> {
    let mut transactions = lock(&state).transactions.clone();
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    Json(ListTransactionsResponse { transactions })
}

async fn handle_create(
    State(state): State<SharedState>,
    Json(tx): Json<NewTransaction>,
) -> (StatusCode, Json<CreateTransactionResponse>) {
    let mut state = lock(&state);
    if state.failing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(CreateTransactionResponse {
                success: false,
                transaction: None,
                message: Some("Failed to save transaction".into()),
            }),
        );
    }
    match state.reply {
        ReplyMode::Normal => {}
        ReplyMode::Declined => {
            return (
                StatusCode::OK,
                Json(CreateTransactionResponse {
                    success: false,
                    transaction: None,
                    message: Some("Duplicate transaction".into()),
                }),
            );
        }
        ReplyMode::Empty => {
            return (
                StatusCode::OK,
                Json(CreateTransactionResponse {
                    success: true,
                    transaction: None,
                    message: None,
                }),
            );
        }
    }

    state.next_id += 1;
    let mut extra = serde_json::Map::new();
    extra.insert(
        "created_at".into(),
        serde_json::Value::String(format!("{} 12:00:00", tx.date)),
    );
    let record = Transaction {
        id: Some(state.next_id),
        date: tx.date,
        amount: tx.amount,
        transaction_type: tx.transaction_type,
        category: tx.category,
        description: tx.description,
        extra,
    };
    state.transactions.push(record.clone());

    (
        StatusCode::OK,
        Json(CreateTransactionResponse {
            success: true,
            transaction: Some(record),
            message: None,
        }),
    )
}

async fn handle_update(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(tx): Json<NewTransaction>,
) -> (StatusCode, Json<AckResponse>) {
    let mut state = lock(&state);
    if state.failing {
        return failure("Failed to update transaction");
    }
    if let Some(existing) = state.transactions.iter_mut().find(|t| t.id == Some(id)) {
        let updated = Transaction::from_update(id, &tx, Some(&*existing));
        *existing = updated;
    }
    ack()
}

async fn handle_delete(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<AckResponse>) {
    let mut state = lock(&state);
    if state.failing {
        return failure("Failed to delete transaction");
    }
    state.transactions.retain(|t| t.id != Some(id));
    ack()
}

async fn handle_categorize(
    State(state): State<SharedState>,
    Json(request): Json<CategorizeRequest>,
) -> (StatusCode, Json<CategorizeResponse>) {
    let description = request.description.trim();
    if description.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(CategorizeResponse {
                success: false,
                suggestion: None,
                error: Some("Description is required".into()),
            }),
        );
    }

    let state = lock(&state);
    let (success, error) = match state.reply {
        ReplyMode::Normal => (true, None),
        ReplyMode::Declined => (false, Some("AI service unavailable".to_string())),
        ReplyMode::Empty => (true, None),
    };
    if state.reply != ReplyMode::Normal {
        let body = CategorizeResponse {
            success,
            suggestion: None,
            error,
        };
        return (StatusCode::OK, Json(body));
    }

    let suggestion = state.categorizer.categorize(description, &request.user_id);
    (
        StatusCode::OK,
        Json(CategorizeResponse {
            success: true,
            suggestion: Some(suggestion),
            error: None,
        }),
    )
}

async fn handle_learn(
    State(state): State<SharedState>,
    Json(request): Json<LearnCorrectionRequest>,
) -> (StatusCode, Json<AckResponse>) {
    let description = request.description.trim();
    let category = request.correct_category.trim();
    if description.is_empty() || category.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AckResponse {
                success: false,
                message: None,
                error: Some("Description and correct category are required".into()),
            }),
        );
    }

    let mut state = lock(&state);
    state
        .categorizer
        .learn(&request.user_id, description, category);
    state.corrections.push(request.clone());
    (
        StatusCode::OK,
        Json(AckResponse {
            success: true,
            message: Some("AI has learned from your correction".into()),
            error: None,
        }),
    )
}

#[derive(Debug, Deserialize)]
struct InsightsQuery {
    #[serde(default)]
    #[allow(dead_code)]
    user_id: Option<String>,
}

async fn handle_insights(
    State(state): State<SharedState>,
    Query(_query): Query<InsightsQuery>,
) -> Json<InsightsResponse> {
    let state = lock(&state);
    let mut insights = SpendingInsights::default();

    for tx in state
        .transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense && t.amount > 0.0)
    {
        *insights
            .category_breakdown
            .entry(tx.category.clone())
            .or_insert(0.0) += tx.amount;
    }

    let total: f64 = insights.category_breakdown.values().sum();
    let top = insights
        .category_breakdown
        .iter()
        .fold(None::<(&String, f64)>, |best, (cat, &amt)| match best {
            Some((_, top)) if top >= amt => best,
            _ => Some((cat, amt)),
        });
    if let Some((category, amount)) = top {
        insights.insights.push(format!(
            "Your highest spending category is {} ({})",
            category,
            format_currency(amount)
        ));
    }
    for (category, amount) in &insights.category_breakdown {
        let share = amount / total * 100.0;
        if share > 40.0 {
            insights
                .insights
                .push(format!("⚠️ {} accounts for {:.1}% of your spending", category, share));
            insights.recommendations.push(format!(
                "Consider reviewing your {} expenses for potential savings",
                category
            ));
        }
    }
    insights.insights.truncate(5);
    insights.recommendations.truncate(3);

    Json(InsightsResponse {
        success: true,
        insights: Some(insights),
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_categorization() {
        let c = Categorizer::new();
        let s = c.categorize("uber to airport", "u1");
        assert_eq!(s.suggested_category, "Transportation");
        assert!((s.confidence - 0.3).abs() < 1e-9);

        let s = c.categorize("xyzzy", "u1");
        assert_eq!(s.suggested_category, "Other");
        assert_eq!(s.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_learned_correction_wins() {
        let mut c = Categorizer::new();
        c.learn("u1", "Uber office commute", "Work Travel");

        let s = c.categorize("office commute tuesday", "u1");
        assert_eq!(s.suggested_category, "Work Travel");
        assert_eq!(s.confidence, LEARNED_CONFIDENCE);

        // Other users are unaffected
        assert_ne!(
            c.categorize("office commute", "u2").suggested_category,
            "Work Travel"
        );
    }
}
