//! Nested comment list.

use dioxus::prelude::*;

use parley_core::{CommentView, ReplyAffordance};

use crate::components::CommentComposer;
use crate::context::WidgetContext;

/// The whole thread, or a loading indicator until the first snapshot.
#[component]
pub fn CommentThread() -> Element {
    let ctx = use_context::<WidgetContext>();
    let viewer = ctx.auth.read().user.clone();
    let now = *ctx.now.read();
    let views = ctx.thread.read().view(viewer.as_ref(), now);

    match views {
        None => rsx! {
            div { class: "parley-loading", "Loading…" }
        },
        Some(comments) => rsx! {
            CommentList { comments }
        },
    }
}

/// One level of the thread.
#[component]
pub fn CommentList(comments: Vec<CommentView>) -> Element {
    rsx! {
        ul { class: "parley-comments",
            for comment in comments {
                CommentItem { key: "{comment.id}", comment }
            }
        }
    }
}

/// A comment, its reply panel and its replies.
#[component]
pub fn CommentItem(comment: CommentView) -> Element {
    let ctx = use_context::<WidgetContext>();
    let mut thread = ctx.thread;
    let id = comment.id.clone();

    rsx! {
        li { class: "parley-comment",
            div { class: "parley-comment-meta",
                strong { class: "parley-comment-name", "{comment.author_name}" }
                time {
                    class: "parley-comment-timestamp",
                    datetime: comment.timestamp.clone(),
                    title: comment.timestamp.clone(),
                    "{comment.time_label}"
                }
            }
            div { class: "parley-comment-text", "{comment.text}" }
            if let Some(label) = comment.reply.toggle_label() {
                div { class: "parley-comment-reply",
                    if comment.reply == ReplyAffordance::Expanded {
                        CommentComposer { parent_id: Some(comment.id.clone()) }
                    }
                    a {
                        href: "#",
                        onclick: move |evt: MouseEvent| {
                            evt.prevent_default();
                            thread.write().toggle_reply(&id);
                        },
                        "{label}"
                    }
                }
            }
            if !comment.children.is_empty() {
                CommentList { comments: comment.children.clone() }
            }
        }
    }
}
