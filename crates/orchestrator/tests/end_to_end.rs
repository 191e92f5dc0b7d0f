//! End-to-end tests: Orchestrator over an in-memory SQLite database.

use std::sync::Arc;

use database::{user, Database, UserUpdate};
use mock_brain::{DelayedBrain, EchoBrain, ScriptedBrain};
use orchestrator::{
    CompletionClient, DispatchConfig, DispatchPath, InboundEvent, Orchestrator, RecordingSender,
};

const SENDER: &str = "27820000000";

async fn test_db() -> Database {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    db
}

fn event_from(sender: &str, text: &str) -> InboundEvent {
    InboundEvent::new(
        sender,
        Some("Thandi".to_string()),
        text,
        format!("whatsapp:+{}", sender),
    )
}

fn event(text: &str) -> InboundEvent {
    event_from(SENDER, text)
}

fn relay(
    db: &Database,
    brain: Arc<dyn CompletionClient>,
    sender: Arc<RecordingSender>,
) -> Orchestrator {
    Orchestrator::new(
        DispatchConfig::default(),
        brain,
        Arc::new(db.clone()),
        sender,
    )
}

#[tokio::test]
async fn test_first_contact_creates_default_record() {
    let db = test_db().await;
    let sender = Arc::new(RecordingSender::new());
    let relay = relay(&db, Arc::new(ScriptedBrain::new()), sender.clone());

    let report = relay.process(event("Hi")).await.unwrap();

    assert_eq!(report.path, Some(DispatchPath::Greeting));
    assert_eq!(sender.sent().len(), 2);
    let stored = user::get_user(db.pool(), SENDER).await.unwrap();
    assert_eq!(stored.balance, 5.0);
    assert!(stored.messages.is_empty());
}

#[tokio::test]
async fn test_served_prompt_is_charged() {
    let db = test_db().await;
    let sender = Arc::new(RecordingSender::new());
    let relay = relay(&db, Arc::new(EchoBrain::new()), sender.clone());

    relay.process(event("balance")).await.unwrap();
    user::update_user_fields(db.pool(), SENDER, &UserUpdate::balance(1.0))
        .await
        .unwrap();

    let prompt = "x".repeat(300);
    let report = relay.process(event(&prompt)).await.unwrap();

    assert_eq!(report.path, Some(DispatchPath::Completion));
    let stored = user::get_user(db.pool(), SENDER).await.unwrap();
    assert!((stored.balance - 0.2).abs() < 1e-9);
    assert_eq!(stored.messages.len(), 2);
}

#[tokio::test]
async fn test_unaffordable_prompt_is_refused() {
    let db = test_db().await;
    let sender = Arc::new(RecordingSender::new());
    let relay = relay(&db, Arc::new(EchoBrain::new()), sender.clone());

    relay.process(event("balance")).await.unwrap();
    user::update_user_fields(db.pool(), SENDER, &UserUpdate::balance(0.5))
        .await
        .unwrap();

    let report = relay.process(event(&"x".repeat(300))).await.unwrap();

    assert_eq!(report.path, Some(DispatchPath::NoBalance));
    let stored = user::get_user(db.pool(), SENDER).await.unwrap();
    assert_eq!(stored.balance, 0.5);
    assert!(stored.messages.is_empty());
    assert!(sender
        .texts()
        .last()
        .unwrap()
        .starts_with("You don't have enough funds"));
}

#[tokio::test]
async fn test_image_charges_flat_cost() {
    let db = test_db().await;
    let sender = Arc::new(RecordingSender::new());
    let relay = relay(&db, Arc::new(EchoBrain::new()), sender.clone());

    let report = relay.process(event("imagine: a red fox")).await.unwrap();

    assert_eq!(report.path, Some(DispatchPath::Image));
    let stored = user::get_user(db.pool(), SENDER).await.unwrap();
    assert!((stored.balance - 4.75).abs() < 1e-9);
    assert!(stored.messages.is_empty());
    assert_eq!(sender.sent()[0].media.len(), 1);
}

#[tokio::test]
async fn test_termination_flow() {
    let db = test_db().await;
    let sender = Arc::new(RecordingSender::new());
    let relay = relay(&db, Arc::new(EchoBrain::new()), sender.clone());

    let report = relay.process(event("stop")).await.unwrap();
    assert_eq!(report.path, Some(DispatchPath::TerminationPending));

    let report = relay.process(event("exit")).await.unwrap();
    assert_eq!(report.path, Some(DispatchPath::TerminationPending));

    let report = relay.process(event("exit")).await.unwrap();
    assert_eq!(report.path, Some(DispatchPath::TerminationConfirmed));
    assert!(user::find_user(db.pool(), SENDER).await.unwrap().is_none());

    relay.process(event("hello")).await.unwrap();
    let stored = user::get_user(db.pool(), SENDER).await.unwrap();
    assert_eq!(stored.balance, 5.0);
    assert!(stored.messages.is_empty());
}

#[tokio::test]
async fn test_keyword_between_terminations_resets_the_wait() {
    let db = test_db().await;
    let sender = Arc::new(RecordingSender::new());
    let relay = relay(&db, Arc::new(EchoBrain::new()), sender.clone());

    for between in ["balance", "menu", "hi"] {
        relay.process(event("stop")).await.unwrap();
        let stored = user::get_user(db.pool(), SENDER).await.unwrap();
        assert_eq!(stored.pending_termination.as_deref(), Some("stop"));

        relay.process(event(between)).await.unwrap();
        let stored = user::get_user(db.pool(), SENDER).await.unwrap();
        assert!(stored.pending_termination.is_none(), "{}", between);
    }

    let report = relay.process(event("stop")).await.unwrap();
    assert_eq!(report.path, Some(DispatchPath::TerminationPending));
    assert!(user::find_user(db.pool(), SENDER).await.unwrap().is_some());
}

#[tokio::test]
async fn test_same_sender_events_are_serialized() {
    let db = test_db().await;
    let sender = Arc::new(RecordingSender::new());
    let brain = Arc::new(DelayedBrain::with_millis(EchoBrain::new(), 50));
    let relay = relay(&db, brain, sender.clone());

    let first = "what is rain";
    let second = "what is snow";
    let (a, b) = tokio::join!(relay.process(event(first)), relay.process(event(second)));
    a.unwrap();
    b.unwrap();

    let stored = user::get_user(db.pool(), SENDER).await.unwrap();
    // Neither update was lost
    assert_eq!(stored.messages.len(), 4);
    let pricing = DispatchConfig::default().pricing;
    let expected = 5.0 - pricing.required_cost(first) - pricing.required_cost(second);
    assert!((stored.balance - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_different_senders_are_independent() {
    let db = test_db().await;
    let sender = Arc::new(RecordingSender::new());
    let brain = Arc::new(DelayedBrain::with_millis(EchoBrain::new(), 20));
    let relay = relay(&db, brain, sender.clone());

    let (a, b) = tokio::join!(
        relay.process(event_from("111", "hello there friend")),
        relay.process(event_from("222", "good evening"))
    );
    assert_eq!(a.unwrap().path, Some(DispatchPath::Completion));
    assert_eq!(b.unwrap().path, Some(DispatchPath::Greeting));

    assert_eq!(user::count_users(db.pool()).await.unwrap(), 2);
}
