//! Domain models for My Money

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Direction of a personal transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction payload sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: String,
}

/// A server-confirmed personal transaction
///
/// Fields the client does not model (e.g. `created_at`) are kept in `extra`
/// so the mirrored copy stays verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    /// Build the canonical record for a confirmed update (the update endpoint
    /// only acknowledges, it does not echo the record back)
    pub fn from_update(id: i64, tx: &NewTransaction, previous: Option<&Transaction>) -> Self {
        Self {
            id: Some(id),
            date: tx.date,
            amount: tx.amount,
            transaction_type: tx.transaction_type,
            category: tx.category.clone(),
            description: tx.description.clone(),
            extra: previous.map(|p| p.extra.clone()).unwrap_or_default(),
        }
    }
}

/// A Khatabook customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub business: String,
    #[serde(default)]
    pub email: String,
    /// Positive: customer owes us. Negative: we owe the customer.
    #[serde(default)]
    pub balance: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Direction of a Khatabook entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessTransactionType {
    /// Credit given to the customer
    Credit,
    /// Payment received from the customer
    Payment,
}

/// A Khatabook entry against a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub customer_id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
    #[serde(rename = "type")]
    pub transaction_type: BusinessTransactionType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// AI category suggestion returned by the categorization endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggested_category: String,
    /// Confidence level (0.0-1.0)
    pub confidence: f64,
    /// How the backend produced it (user_learned, rule_based, default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl Suggestion {
    pub fn new(category: &str, confidence: f64) -> Self {
        Self {
            suggested_category: category.to_string(),
            confidence,
            source: None,
            alternatives: Vec::new(),
        }
    }

    /// Confidence as a whole percentage, rounded half away from zero
    pub fn percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// AI spending insights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingInsights {
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub category_breakdown: std::collections::BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_preserves_unknown_fields() {
        let json = r#"{"id":7,"date":"2024-01-01","amount":50.0,"type":"expense","category":"Food","description":"lunch","created_at":"2024-01-01 12:00:00"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, Some(7));
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(
            tx.extra.get("created_at").and_then(|v| v.as_str()),
            Some("2024-01-01 12:00:00")
        );

        let back: Value = serde_json::to_value(&tx).unwrap();
        let original: Value = serde_json::from_str(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_new_transaction_wire_format() {
        let tx = NewTransaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount: 12.5,
            transaction_type: TransactionType::Income,
            category: "Salary & Income".into(),
            description: "salary".into(),
        };
        let v = serde_json::to_value(&tx).unwrap();
        assert_eq!(v["type"], "income");
        assert_eq!(v["date"], "2024-01-01");
    }

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!(
            " Expense ".parse::<TransactionType>().unwrap(),
            TransactionType::Expense
        );
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_suggestion_percent_rounds() {
        assert_eq!(Suggestion::new("Food", 0.706).percent(), 71);
        assert_eq!(Suggestion::new("Food", 0.3).percent(), 30);
        assert_eq!(Suggestion::new("Food", 1.4).percent(), 100);
    }

    #[test]
    fn test_suggestion_optional_fields() {
        let s: Suggestion =
            serde_json::from_str(r#"{"suggested_category":"Travel","confidence":0.45}"#).unwrap();
        assert!(s.source.is_none());
        assert!(s.alternatives.is_empty());
    }
}
