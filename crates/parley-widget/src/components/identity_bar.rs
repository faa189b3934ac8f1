//! "Logged in as ..." / "Start the discussion by logging in" bar.

use dioxus::prelude::*;

use parley_core::GateView;

use crate::context::WidgetContext;

/// Identity bar component.
#[component]
pub fn IdentityBar() -> Element {
    let ctx = use_context::<WidgetContext>();
    let view = GateView::from(&*ctx.auth.read());

    match view {
        GateView::Loading => rsx! {
            div { class: "parley-loading", "Loading…" }
        },
        GateView::LoginPrompt => rsx! {
            div { class: "parley-login",
                "Start the discussion by "
                a {
                    class: "parley-login-link",
                    href: "#",
                    onclick: move |evt: MouseEvent| {
                        evt.prevent_default();
                        let _ = ctx.gate.read().login();
                    },
                    "logging in"
                }
            }
        },
        GateView::SignedIn { display_name } => rsx! {
            div { class: "parley-user",
                "Logged in as "
                strong { "{display_name}" }
                " ("
                a {
                    class: "parley-logout-link",
                    href: "#",
                    onclick: move |evt: MouseEvent| {
                        evt.prevent_default();
                        let _ = ctx.gate.read().logout();
                    },
                    "log out"
                }
                ")"
            }
        },
    }
}
