//! Transaction form and its validation
//!
//! Validation is a pure function over the raw field strings. The caller is
//! responsible for clearing previously rendered errors before showing a new
//! result; `Validation` itself never accumulates across runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{NewTransaction, TransactionType};

/// Fields of the personal transaction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Date,
    Amount,
    Type,
    Category,
    Description,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Type => "type",
            Self::Category => "category",
            Self::Description => "description",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inline error attached to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Raw values of the transaction form, exactly as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionForm {
    pub date: String,
    pub amount: String,
    pub transaction_type: String,
    pub category: String,
    pub description: String,
}

impl TransactionForm {
    /// Empty form with the date preset to `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    pub fn set(&mut self, field: FormField, value: &str) {
        let slot = match field {
            FormField::Date => &mut self.date,
            FormField::Amount => &mut self.amount,
            FormField::Type => &mut self.transaction_type,
            FormField::Category => &mut self.category,
            FormField::Description => &mut self.description,
        };
        *slot = value.to_string();
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::Amount => &self.amount,
            FormField::Type => &self.transaction_type,
            FormField::Category => &self.category,
            FormField::Description => &self.description,
        }
    }

    /// Fill the form from an existing record (begin edit)
    pub fn from_transaction(tx: &crate::models::Transaction) -> Self {
        Self {
            date: tx.date.format("%Y-%m-%d").to_string(),
            amount: tx.amount.to_string(),
            transaction_type: tx.transaction_type.as_str().to_string(),
            category: tx.category.clone(),
            description: tx.description.clone(),
        }
    }
}

/// Outcome of validating a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub errors: Vec<FieldError>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Parse an amount; `None` when the text is not a finite number
fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when the live amount field should be flagged while typing
pub fn amount_field_invalid(raw: &str) -> bool {
    !matches!(parse_amount(raw), Some(v) if v > 0.0)
}

/// Validate the transaction form
///
/// Required non-empty: date, type, category, description (trimmed).
/// Amount must parse as a number strictly greater than zero.
pub fn validate(form: &TransactionForm) -> Validation {
    let checks = [
        (
            FormField::Date,
            form.date.trim().is_empty(),
            "Date is required",
        ),
        (
            FormField::Amount,
            amount_field_invalid(&form.amount),
            "Amount must be greater than ₹0.00",
        ),
        (
            FormField::Type,
            form.transaction_type.trim().is_empty(),
            "Transaction type is required",
        ),
        (
            FormField::Category,
            form.category.trim().is_empty(),
            "Category is required",
        ),
        (
            FormField::Description,
            form.description.trim().is_empty(),
            "Description is required",
        ),
    ];

    Validation {
        errors: checks
            .into_iter()
            .filter(|(_, failed, _)| *failed)
            .map(|(field, _, message)| FieldError {
                field,
                message: message.to_string(),
            })
            .collect(),
    }
}

/// Convert a form into the API payload
///
/// Returns the errors instead when the form is invalid or a field that passed
/// the presence checks still cannot be interpreted (bad date or type).
pub fn to_new_transaction(form: &TransactionForm) -> Result<NewTransaction, Vec<FieldError>> {
    let validation = validate(form);
    if !validation.is_valid() {
        return Err(validation.errors);
    }

    let mut errors = Vec::new();

    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d");
    if date.is_err() {
        errors.push(FieldError {
            field: FormField::Date,
            message: "Date must be in YYYY-MM-DD format".into(),
        });
    }

    let transaction_type = form.transaction_type.parse::<TransactionType>();
    if transaction_type.is_err() {
        errors.push(FieldError {
            field: FormField::Type,
            message: "Transaction type must be income or expense".into(),
        });
    }

    match (date, transaction_type, parse_amount(&form.amount)) {
        (Ok(date), Ok(transaction_type), Some(amount)) if errors.is_empty() => {
            Ok(NewTransaction {
                date,
                amount,
                transaction_type,
                category: form.category.clone(),
                description: form.description.trim().to_string(),
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> TransactionForm {
        TransactionForm {
            date: "2024-01-01".into(),
            amount: "50".into(),
            transaction_type: "expense".into(),
            category: "Food".into(),
            description: "lunch".into(),
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        let v = validate(&valid_form());
        assert!(v.is_valid());
        assert!(v.errors.is_empty());
    }

    #[test]
    fn test_missing_date_is_single_error() {
        let form = TransactionForm {
            date: String::new(),
            ..valid_form()
        };
        let v = validate(&form);
        assert!(!v.is_valid());
        assert_eq!(v.errors.len(), 1);
        assert_eq!(v.errors[0].field, FormField::Date);
        assert_eq!(v.error_for(FormField::Date), Some("Date is required"));
    }

    #[test]
    fn test_zero_amount() {
        let form = TransactionForm {
            amount: "0".into(),
            ..valid_form()
        };
        let v = validate(&form);
        assert_eq!(v.errors.len(), 1);
        assert_eq!(
            v.error_for(FormField::Amount),
            Some("Amount must be greater than ₹0.00")
        );
    }

    #[test]
    fn test_amount_edge_values() {
        for bad in ["", "abc", "-5", "0.0", "NaN", "inf"] {
            assert!(amount_field_invalid(bad), "{:?} should be invalid", bad);
        }
        for good in ["0.01", "50", " 12.5 ", "1e3"] {
            assert!(!amount_field_invalid(good), "{:?} should be valid", good);
        }
    }

    #[test]
    fn test_everything_missing() {
        let v = validate(&TransactionForm::default());
        let fields: Vec<_> = v.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                FormField::Date,
                FormField::Amount,
                FormField::Type,
                FormField::Category,
                FormField::Description
            ]
        );
    }

    #[test]
    fn test_whitespace_description_is_missing() {
        let form = TransactionForm {
            description: "   ".into(),
            ..valid_form()
        };
        assert_eq!(
            validate(&form).error_for(FormField::Description),
            Some("Description is required")
        );
    }

    #[test]
    fn test_rerun_does_not_accumulate() {
        let mut form = TransactionForm {
            date: String::new(),
            ..valid_form()
        };
        assert_eq!(validate(&form).errors.len(), 1);
        assert_eq!(validate(&form).errors.len(), 1);
        form.date = "2024-01-01".into();
        assert!(validate(&form).is_valid());
    }

    #[test]
    fn test_to_new_transaction() {
        let tx = to_new_transaction(&valid_form()).unwrap();
        assert_eq!(tx.amount, 50.0);
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_to_new_transaction_bad_date_and_type() {
        let form = TransactionForm {
            date: "01/01/2024".into(),
            transaction_type: "transfer".into(),
            ..valid_form()
        };
        let errors = to_new_transaction(&form).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_new_form_presets_date() {
        let form = TransactionForm::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(form.date, "2024-06-30");
        assert!(form.description.is_empty());
    }
}
