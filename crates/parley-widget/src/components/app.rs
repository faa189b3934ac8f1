//! Root widget component and the fault boundary around it.

use std::time::Duration;

use chrono::Utc;
use dioxus::prelude::*;
use futures::StreamExt;

use parley_core::stream::watch_to_stream;
use parley_core::{CommentStore, Fault, WidgetConfig};

use crate::components::{CommentComposer, CommentThread, IdentityBar};
use crate::context::{WidgetContext, WidgetServices};

/// How often relative time labels are refreshed.
const CLOCK_TICK: Duration = Duration::from_secs(30);

/// The comments widget: identity bar, top-level composer, thread.
#[component]
pub fn Widget(config: WidgetConfig, services: WidgetServices) -> Element {
    let ctx = use_context_provider(|| WidgetContext::new(&config, &services));

    // Follow the identity provider
    use_effect(move || {
        let gate = ctx.gate.read().clone();
        let mut auth = ctx.auth;
        spawn(async move {
            let mut changes = gate.changes();
            while let Some(current) = changes.next().await {
                auth.set(current);
            }
        });
    });

    // Rebuild the tree on every snapshot
    use_effect(move || {
        let store = ctx.store.read().clone();
        let path = ctx.path.read().clone();
        let faults = ctx.faults.read().clone();
        let mut thread = ctx.thread;
        spawn(async move {
            tracing::info!(path = %path, "Subscribing to comments");
            let mut snapshots = store.subscribe(&path);
            while let Some(snapshot) = snapshots.next().await {
                let applied = thread.write().apply_snapshot(&snapshot);
                if let Err(e) = applied {
                    faults.report(e.into());
                }
            }
        });
    });

    // Keep "N minutes ago" labels moving
    use_effect(move || {
        let mut now = ctx.now;
        spawn(async move {
            loop {
                tokio::time::sleep(CLOCK_TICK).await;
                now.set(Utc::now());
            }
        });
    });

    rsx! {
        FaultBoundary {
            div { class: "parley-container",
                IdentityBar {}
                CommentComposer { parent_id: None }
                CommentThread {}
            }
        }
    }
}

/// Replaces everything below it with an error message once a fault is
/// reported to the widget's fault sink.
#[component]
pub fn FaultBoundary(children: Element) -> Element {
    let ctx = use_context::<WidgetContext>();
    let mut fault = use_signal(|| None::<Fault>);

    use_effect(move || {
        let sink = ctx.faults.read().clone();
        spawn(async move {
            let mut reported = watch_to_stream(sink.subscribe());
            while let Some(current) = reported.next().await {
                fault.set(current);
            }
        });
    });

    let current = fault.read().clone();
    match current {
        Some(fault) => rsx! {
            div { class: "parley-container",
                div { class: "parley-error", role: "alert",
                    strong { "Comments are unavailable." }
                    " {fault.message}"
                }
            }
        },
        None => children,
    }
}
