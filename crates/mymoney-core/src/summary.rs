//! Balance summary and currency formatting

use serde::Serialize;

use crate::models::{Transaction, TransactionType};

/// Totals shown on the balance cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub transaction_count: usize,
}

impl Summary {
    /// Compute totals over a list of transactions
    pub fn compute(transactions: &[Transaction]) -> Self {
        let total_for = |kind: TransactionType| -> f64 {
            transactions
                .iter()
                .filter(|t| t.transaction_type == kind)
                .map(|t| t.amount)
                .sum()
        };

        let total_income = total_for(TransactionType::Income);
        let total_expenses = total_for(TransactionType::Expense);

        Self {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            transaction_count: transactions.len(),
        }
    }
}

/// Format an amount as rupees with two decimals and thousands separators
///
/// `1234.5` becomes `₹1,234.50`; negative values keep the sign after the
/// symbol (`₹-1,234.50`).
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
    format!("₹{}{}.{}", sign, grouped, frac_part)
}
