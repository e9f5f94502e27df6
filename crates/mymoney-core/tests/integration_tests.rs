//! Integration tests for mymoney-core
//!
//! These tests exercise the HTTP client and the controller against the mock
//! finance backend: suggest → correct → submit → mirror.

use std::time::Duration;

use chrono::NaiveDate;
use mymoney_core::test_utils::{MockFinanceServer, ReplyMode};
use mymoney_core::{
    AppEvent, ClientConfig, Controller, Error, FileStore, FinanceApi, FormField, HttpApi,
    LocalMirror, NewTransaction, RecordingUi, SuggestionPhase, TransactionType, UiCall, View,
};
use tempfile::TempDir;

fn new_transaction(category: &str, amount: f64, kind: TransactionType) -> NewTransaction {
    NewTransaction {
        date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        amount,
        transaction_type: kind,
        category: category.to_string(),
        description: format!("{} spend", category),
    }
}

fn test_config(server: &MockFinanceServer, data_dir: &TempDir) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api_base_url = server.url();
    config.data_dir = data_dir.path().to_path_buf();
    config.suggestions.debounce = Duration::from_millis(20);
    config
}

// =============================================================================
// HTTP client
// =============================================================================

#[tokio::test]
async fn test_transaction_crud_round_trip() {
    let server = MockFinanceServer::start().await;
    let api = HttpApi::new(&server.url());

    let created = api
        .create_transaction(&new_transaction("Food & Dining", 120.0, TransactionType::Expense))
        .await
        .expect("create");
    let id = created.id.expect("server assigns id");
    assert!(created.extra.contains_key("created_at"));

    let mut changed = new_transaction("Shopping", 80.0, TransactionType::Expense);
    changed.description = "new shoes".into();
    api.update_transaction(id, &changed).await.expect("update");

    let listed = api.list_transactions().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].category, "Shopping");
    assert_eq!(listed[0].amount, 80.0);

    api.delete_transaction(id).await.expect("delete");
    assert!(api.list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_write_is_api_error() {
    let server = MockFinanceServer::start().await;
    server.set_failing(true);
    let api = HttpApi::new(&server.url());

    let err = api
        .create_transaction(&new_transaction("Food & Dining", 10.0, TransactionType::Expense))
        .await
        .unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to save transaction");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_categorize_learns_from_correction() {
    let server = MockFinanceServer::start().await;
    let api = HttpApi::new(&server.url());

    let first = api.categorize("uber to office", "demo_user").await.unwrap();
    assert_eq!(first.suggested_category, "Transportation");
    assert_eq!(first.source.as_deref(), Some("rule_based"));

    api.learn_correction("uber to office", "Work Commute", "demo_user")
        .await
        .unwrap();

    let second = api.categorize("office party", "demo_user").await.unwrap();
    assert_eq!(second.suggested_category, "Work Commute");
    assert_eq!(second.confidence, 0.95);
}

#[tokio::test]
async fn test_blank_description_rejected() {
    let server = MockFinanceServer::start().await;
    let api = HttpApi::new(&server.url());

    let err = api.categorize("   ", "demo_user").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_spending_insights() {
    let server = MockFinanceServer::start().await;
    let api = HttpApi::new(&server.url());

    for (category, amount) in [("Food & Dining", 600.0), ("Shopping", 200.0)] {
        api.create_transaction(&new_transaction(category, amount, TransactionType::Expense))
            .await
            .unwrap();
    }
    api.create_transaction(&new_transaction("Salary", 5000.0, TransactionType::Income))
        .await
        .unwrap();

    let insights = api.spending_insights("demo_user").await.unwrap();
    assert_eq!(insights.category_breakdown.len(), 2);
    assert_eq!(
        insights.insights[0],
        "Your highest spending category is Food & Dining (₹600.00)"
    );
    assert_eq!(insights.recommendations.len(), 1);
}

// =============================================================================
// Controller workflow
// =============================================================================

#[tokio::test]
async fn test_suggest_correct_submit_workflow() {
    let server = MockFinanceServer::start().await;
    let data_dir = TempDir::new().unwrap();
    let config = test_config(&server, &data_dir);
    let store = FileStore::new(data_dir.path()).unwrap();
    let mut c = Controller::new(
        HttpApi::from_config(&config),
        store,
        RecordingUi::new(),
        config,
    );
    c.handle(AppEvent::ShowView(View::Personal));

    // Suggestion arrives and auto-fills
    c.handle(AppEvent::FieldInput(FormField::Description, "uber car ride".into()));
    c.handle(AppEvent::DescriptionBlur);
    c.settle().await;
    assert_eq!(c.state().form.category, "Transportation");
    assert_eq!(c.phase(), SuggestionPhase::Accepted);

    // User disagrees: the correction reaches the backend
    c.handle(AppEvent::FieldInput(FormField::Category, "Travel".into()));
    c.settle().await;
    let corrections = server.corrections();
    assert_eq!(corrections.len(), 1);
    assert_eq!(corrections[0].description, "uber car ride");
    assert_eq!(corrections[0].correct_category, "Travel");

    // Submit persists server-side and in the local mirror
    c.handle(AppEvent::FieldInput(FormField::Amount, "350".into()));
    c.handle(AppEvent::FieldInput(FormField::Type, "expense".into()));
    c.handle(AppEvent::Submit);
    c.settle().await;

    assert_eq!(server.transactions().len(), 1);
    assert_eq!(c.mirror().transactions().len(), 1);
    assert_eq!(c.mirror().transactions()[0].category, "Travel");

    // A fresh mirror over the same directory sees the record
    let reopened = LocalMirror::open(FileStore::new(data_dir.path()).unwrap());
    assert_eq!(reopened.transactions(), c.mirror().transactions());
}

#[tokio::test]
async fn test_failed_submit_keeps_mirror_empty() {
    let server = MockFinanceServer::start().await;
    server.set_failing(true);
    let data_dir = TempDir::new().unwrap();
    let config = test_config(&server, &data_dir);
    let store = FileStore::new(data_dir.path()).unwrap();
    let mut c = Controller::new(
        HttpApi::from_config(&config),
        store,
        RecordingUi::new(),
        config,
    );

    c.handle(AppEvent::FieldInput(FormField::Amount, "10".into()));
    c.handle(AppEvent::FieldInput(FormField::Type, "expense".into()));
    c.handle(AppEvent::FieldInput(FormField::Category, "Food & Dining".into()));
    c.handle(AppEvent::FieldInput(FormField::Description, "tea".into()));
    c.handle(AppEvent::Submit);
    c.settle().await;

    assert!(c.mirror().transactions().is_empty());
    assert!(!data_dir.path().join("transactions.json").exists());
    assert_eq!(
        c.ui().toasts().last().map(String::as_str),
        Some("Failed to save transaction. Please try again.")
    );
}

#[tokio::test]
async fn test_refresh_replaces_mirror() {
    let server = MockFinanceServer::start().await;
    let data_dir = TempDir::new().unwrap();
    let config = test_config(&server, &data_dir);
    let api = HttpApi::from_config(&config);
    api.create_transaction(&new_transaction("Food & Dining", 99.0, TransactionType::Expense))
        .await
        .unwrap();

    let mut c = Controller::new(
        api,
        FileStore::new(data_dir.path()).unwrap(),
        RecordingUi::new(),
        config,
    );
    c.handle(AppEvent::Refresh);
    c.settle().await;

    assert_eq!(c.mirror().transactions().len(), 1);
    assert!(data_dir.path().join("transactions.json").exists());
}

// =============================================================================
// Unsuccessful payloads with HTTP 200
// =============================================================================

#[tokio::test]
async fn test_declined_payloads_are_errors() {
    let server = MockFinanceServer::start().await;
    server.set_reply_mode(ReplyMode::Declined);
    let api = HttpApi::new(&server.url());

    match api.categorize("uber car ride", "demo_user").await {
        Err(Error::InvalidData(message)) => assert_eq!(message, "AI service unavailable"),
        other => panic!("expected invalid data, got {:?}", other),
    }

    let tx = new_transaction("Food & Dining", 120.0, TransactionType::Expense);
    match api.create_transaction(&tx).await {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 200);
            assert_eq!(message, "Duplicate transaction");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_success_without_body_is_error() {
    let server = MockFinanceServer::start().await;
    server.set_reply_mode(ReplyMode::Empty);
    let api = HttpApi::new(&server.url());

    assert!(matches!(
        api.categorize("uber car ride", "demo_user").await,
        Err(Error::InvalidData(_))
    ));
    let tx = new_transaction("Food & Dining", 120.0, TransactionType::Expense);
    assert!(matches!(
        api.create_transaction(&tx).await,
        Err(Error::InvalidData(_))
    ));
}

#[tokio::test]
async fn test_declined_payloads_through_controller() {
    let server = MockFinanceServer::start().await;
    let data_dir = TempDir::new().unwrap();
    let config = test_config(&server, &data_dir);
    let mut c = Controller::new(
        HttpApi::from_config(&config),
        FileStore::new(data_dir.path()).unwrap(),
        RecordingUi::new(),
        config,
    );

    c.handle(AppEvent::FieldInput(FormField::Description, "uber car ride".into()));
    c.settle().await;
    assert!(c.state().badge.is_some());

    // A declined answer clears the suggestion shown for the earlier input
    server.set_reply_mode(ReplyMode::Declined);
    c.handle(AppEvent::FieldInput(FormField::Description, "pizza dinner".into()));
    c.settle().await;

    assert_eq!(c.phase(), SuggestionPhase::Idle);
    assert!(c.state().suggestion.is_none());
    assert!(c.state().badge.is_none());
    assert_eq!(c.ui().count(|call| *call == UiCall::ShowLoading), 2);
    assert_eq!(c.ui().count(|call| *call == UiCall::HideLoading), 2);

    c.handle(AppEvent::FieldInput(FormField::Amount, "80".into()));
    c.handle(AppEvent::FieldInput(FormField::Type, "expense".into()));
    c.handle(AppEvent::FieldInput(FormField::Category, "Food & Dining".into()));
    c.handle(AppEvent::Submit);
    c.settle().await;

    assert!(server.transactions().is_empty());
    assert!(c.mirror().transactions().is_empty());
    assert_eq!(
        c.ui().toasts().last().map(String::as_str),
        Some("Failed to save transaction. Please try again.")
    );
}
