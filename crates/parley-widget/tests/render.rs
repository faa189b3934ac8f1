//! Server-side renders of the widget components against in-memory services.

use std::sync::Arc;

use dioxus::prelude::*;

use parley_core::{CommentRecord, LiveThread, User, WidgetConfig};
use parley_store::{MemoryIdentity, MemoryStore};
use parley_widget::components::{CommentComposer, CommentThread, IdentityBar};
use parley_widget::{WidgetContext, WidgetServices};

fn ada() -> User {
    User::new("u-ada", "Ada")
}

fn records() -> Vec<CommentRecord> {
    vec![
        CommentRecord::new("a", None, "u-bo", "Bo", "first comment"),
        CommentRecord::new("b", Some("a"), "u-ada", "Ada", "a nested answer"),
    ]
}

/// Provide a widget context whose thread already holds `records()`.
fn provide(identity: MemoryIdentity, open_panel: Option<&'static str>) {
    use_context_provider(move || {
        let services = WidgetServices::new(Arc::new(identity), Arc::new(MemoryStore::default()));
        let mut thread = LiveThread::new();
        let _ = thread.apply_snapshot(&records());
        if let Some(id) = open_panel {
            thread.toggle_reply(id);
        }
        WidgetContext {
            thread: Signal::new(thread),
            ..WidgetContext::new(&WidgetConfig::new("posts", "p1"), &services)
        }
    });
}

fn render(app: fn() -> Element) -> String {
    let mut dom = VirtualDom::new(app);
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

fn signed_out_widget() -> Element {
    provide(MemoryIdentity::signed_out(ada()), Some("a"));
    rsx! {
        IdentityBar {}
        CommentComposer { parent_id: None }
        CommentThread {}
    }
}

fn signed_in_widget() -> Element {
    provide(MemoryIdentity::signed_in(ada()), None);
    rsx! {
        IdentityBar {}
        CommentComposer { parent_id: None }
        CommentThread {}
    }
}

fn signed_in_with_open_panel() -> Element {
    provide(MemoryIdentity::signed_in(ada()), Some("a"));
    rsx! { CommentThread {} }
}

fn identity_loading() -> Element {
    use_context_provider(|| {
        let services =
            WidgetServices::new(Arc::new(MemoryIdentity::new()), Arc::new(MemoryStore::default()));
        WidgetContext::new(&WidgetConfig::new("posts", "p1"), &services)
    });
    rsx! {
        IdentityBar {}
        CommentComposer { parent_id: None }
        CommentThread {}
    }
}

#[test]
fn test_signed_out_has_login_prompt_and_no_write_surface() {
    let html = render(signed_out_widget);

    assert!(html.contains("Start the discussion by"));
    assert!(html.contains("logging in"));
    assert!(!html.contains("parley-form"));
    assert!(!html.contains("parley-input"));
    // An open panel left over from a session shows nothing once signed out
    assert!(!html.contains("Reply"));
    assert!(!html.contains("Cancel"));

    assert!(html.contains("first comment"));
    assert!(html.contains("a nested answer"));
}

#[test]
fn test_signed_in_has_composer_and_reply_toggles() {
    let html = render(signed_in_widget);

    assert!(html.contains("Logged in as"));
    assert!(html.contains("Ada"));
    assert!(html.contains("log out"));
    assert_eq!(html.matches("parley-form").count(), 1);
    assert_eq!(html.matches("Reply").count(), 2);
    assert!(!html.contains("Cancel"));
}

#[test]
fn test_open_panel_renders_reply_composer() {
    let html = render(signed_in_with_open_panel);

    assert_eq!(html.matches("parley-form").count(), 1);
    assert_eq!(html.matches("Cancel").count(), 1);
    assert_eq!(html.matches("Reply").count(), 1);
    assert_eq!(html.matches("class=\"parley-comments\"").count(), 2);
}

#[test]
fn test_loading_before_identity_and_first_snapshot() {
    let html = render(identity_loading);

    assert_eq!(html.matches("Loading").count(), 2);
    assert!(!html.contains("parley-form"));
    assert!(!html.contains("logging in"));
}
