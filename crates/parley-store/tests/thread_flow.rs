//! End-to-end flows through the in-memory collaborators: sign in, submit,
//! watch the snapshot come back and the tree rebuild.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::time::timeout;

use parley_core::{
    with_optional_attestation, Attestor, CollectionPath, CommentStore, FaultKind, FaultSink,
    GateView, IdentityGate, LiveThread, ReplyAffordance, SubmissionController, Composer,
    StoreConfig, User,
};
use parley_store::{MemoryIdentity, MemoryStore, SiteKeyAttestor};

fn path() -> CollectionPath {
    CollectionPath::new("posts", "hello-world")
}

fn ada() -> User {
    User::new("u1", "Ada")
}

fn clock() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

#[tokio::test]
async fn test_submit_shows_up_as_top_level_comment() {
    let store = Arc::new(MemoryStore::default().with_clock(clock));
    let faults = FaultSink::new();
    let mut snapshots = store.subscribe(&path());
    let mut thread = LiveThread::new();

    thread.apply_snapshot(&snapshots.next().await.unwrap()).unwrap();
    assert_eq!(thread.view(None, clock()), Some(vec![]));

    let mut controller = SubmissionController::new(
        Composer::top_level(),
        store.clone(),
        path(),
        faults.clone(),
    );
    match controller.submit_text("hello", Some(&ada())) {
        parley_core::SubmitOutcome::Dispatched(handle) => handle.await.unwrap(),
        other => panic!("expected a write, got {other:?}"),
    }
    assert_eq!(controller.composer().draft(), "");

    // Pending snapshot, then the stamped one
    thread.apply_snapshot(&snapshots.next().await.unwrap()).unwrap();
    let pending = thread.view(Some(&ada()), clock()).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].time_label, "moments ago");

    thread.apply_snapshot(&snapshots.next().await.unwrap()).unwrap();
    let views = thread.view(Some(&ada()), clock()).unwrap();
    assert_eq!(views[0].text, "hello");
    assert_eq!(views[0].author_name, "Ada");
    assert_eq!(views[0].time_label, "0 seconds ago");
    assert!(views[0].children.is_empty());
    assert_eq!(faults.current(), None);
}

#[tokio::test]
async fn test_whitespace_submission_writes_nothing() {
    let store = Arc::new(MemoryStore::default());
    let mut controller = SubmissionController::new(
        Composer::top_level(),
        store.clone(),
        path(),
        FaultSink::new(),
    );

    let outcome = controller.submit_text("   ", Some(&ada()));
    assert!(!outcome.is_dispatched());
    assert_eq!(controller.composer().draft(), "   ");
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_reply_lands_under_parent_and_panel_stays_open() {
    let store = Arc::new(MemoryStore::default());
    let mut snapshots = store.subscribe(&path());
    let mut thread = LiveThread::new();
    thread.apply_snapshot(&snapshots.next().await.unwrap()).unwrap();

    let mut top = SubmissionController::new(
        Composer::top_level(),
        store.clone(),
        path(),
        FaultSink::new(),
    );
    if let parley_core::SubmitOutcome::Dispatched(h) = top.submit_text("first", Some(&ada())) {
        h.await.unwrap();
    }
    let parent_id = store.records(&path())[0].id.clone();

    thread.toggle_reply(&parent_id);
    let mut reply = SubmissionController::new(
        Composer::reply_to(parent_id.clone()),
        store.clone(),
        path(),
        FaultSink::new(),
    );
    if let parley_core::SubmitOutcome::Dispatched(h) = reply.submit_text(" answer ", Some(&ada())) {
        h.await.unwrap();
    }

    // Drain to the latest snapshot
    let mut latest = None;
    while let Ok(Some(s)) = timeout(Duration::from_millis(50), snapshots.next()).await {
        latest = Some(s);
    }
    thread.apply_snapshot(&latest.unwrap()).unwrap();

    let views = thread.view(Some(&ada()), Utc::now()).unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].id, parent_id);
    assert_eq!(views[0].reply, ReplyAffordance::Expanded);
    assert_eq!(views[0].children[0].text, "answer");
    assert_eq!(views[0].children[0].depth, 1);
}

#[tokio::test]
async fn test_write_failure_reaches_fault_sink() {
    let store = Arc::new(MemoryStore::default());
    store.fail_next_write("permission denied");
    let faults = FaultSink::new();

    let mut controller = SubmissionController::new(
        Composer::top_level(),
        store.clone(),
        path(),
        faults.clone(),
    );
    if let parley_core::SubmitOutcome::Dispatched(h) = controller.submit_text("x", Some(&ada())) {
        h.await.unwrap();
    }

    let fault = faults.current().unwrap();
    assert_eq!(fault.kind, FaultKind::Collaborator);
    assert!(fault.message.contains("permission denied"));
    assert!(store.records(&path()).is_empty());
}

#[tokio::test]
async fn test_attested_writes_pass_a_guarded_store() {
    let inner = Arc::new(MemoryStore::new(StoreConfig::default()).require_attestation(true));
    let attestor: Arc<dyn Attestor> = Arc::new(SiteKeyAttestor::new("site-key").unwrap());
    let store = with_optional_attestation(inner.clone(), Some(attestor));
    let faults = FaultSink::new();

    let mut controller =
        SubmissionController::new(Composer::top_level(), store, path(), faults.clone());
    if let parley_core::SubmitOutcome::Dispatched(h) = controller.submit_text("hi", Some(&ada())) {
        h.await.unwrap();
    }
    assert_eq!(inner.write_count(), 1);
    assert_eq!(faults.current(), None);

    // Without the attestor the same store refuses
    let bare = with_optional_attestation(inner.clone(), None);
    let mut controller =
        SubmissionController::new(Composer::top_level(), bare, path(), faults.clone());
    if let parley_core::SubmitOutcome::Dispatched(h) = controller.submit_text("hi", Some(&ada())) {
        h.await.unwrap();
    }
    assert_eq!(inner.write_count(), 1);
    assert!(faults.current().is_some());
}

#[tokio::test]
async fn test_gate_follows_login_and_logout() {
    let identity = Arc::new(MemoryIdentity::new().with_account(ada()));
    let gate = IdentityGate::new(identity.clone(), FaultSink::new());
    assert_eq!(gate.view(), GateView::Loading);

    identity.resolve(None);
    assert_eq!(gate.view(), GateView::LoginPrompt);

    gate.login().await.unwrap();
    assert_eq!(
        gate.view(),
        GateView::SignedIn {
            display_name: "Ada".into()
        }
    );

    gate.logout().await.unwrap();
    assert_eq!(gate.view(), GateView::LoginPrompt);
}

#[tokio::test]
async fn test_structural_fault_keeps_last_good_tree() {
    let store = MemoryStore::default();
    let mut snapshots = store.subscribe(&path());
    let faults = FaultSink::new();
    let mut thread = LiveThread::new();
    thread.apply_snapshot(&snapshots.next().await.unwrap()).unwrap();

    store.seed(
        &path(),
        [
            parley_core::CommentRecord::new("a", Some("b"), "u", "Ada", "x"),
            parley_core::CommentRecord::new("b", Some("a"), "u", "Ada", "y"),
        ],
    );
    if let Err(e) = thread.apply_snapshot(&snapshots.next().await.unwrap()) {
        faults.report(e.into());
    }

    assert_eq!(faults.current().unwrap().kind, FaultKind::Structural);
    assert_eq!(thread.view(None, Utc::now()), Some(vec![]));
}
