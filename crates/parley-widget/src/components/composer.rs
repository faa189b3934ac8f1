//! Comment form, used both at the top of the thread and inside reply panels.

use std::rc::Rc;

use dioxus::prelude::*;

use parley_core::{dispatch_append, CommentId, Composer, Submission};

use crate::context::WidgetContext;

/// Comment composer. Renders nothing while nobody is signed in.
///
/// The text area takes focus when it mounts and again after every
/// accepted submission. The write itself runs detached, so closing a
/// reply panel never cancels it.
#[component]
pub fn CommentComposer(#[props(!optional)] parent_id: Option<CommentId>) -> Element {
    let ctx = use_context::<WidgetContext>();
    let mut composer = use_signal(|| Composer::new(parent_id.clone()));
    let mut input = use_signal(|| None::<Rc<MountedData>>);
    let focus_generation = use_memo(move || composer.read().focus_generation());

    use_effect(move || {
        let _generation = focus_generation();
        if let Some(element) = input.read().clone() {
            spawn(async move {
                if let Err(e) = element.set_focus(true).await {
                    tracing::debug!(error = ?e, "Could not focus comment input");
                }
            });
        }
    });

    if ctx.auth.read().signed_in().is_none() {
        return rsx! {};
    }

    let draft = composer.read().draft().to_string();

    rsx! {
        form {
            class: "parley-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                let user = ctx.auth.read().user.clone();
                let submission = composer.write().take_submission(user.as_ref());
                if let Submission::Ready(comment) = submission {
                    let _ = dispatch_append(
                        ctx.store.read().clone(),
                        ctx.path.read().clone(),
                        comment,
                        ctx.faults.read().clone(),
                    );
                }
            },
            textarea {
                class: "parley-input",
                name: "text",
                required: true,
                value: "{draft}",
                oninput: move |evt| composer.write().set_draft(evt.value()),
                onmounted: move |evt: MountedEvent| input.set(Some(evt.data())),
            }
            button { class: "parley-submit", r#type: "submit", "Submit" }
        }
    }
}
