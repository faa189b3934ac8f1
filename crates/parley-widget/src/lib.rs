//! Parley: an embeddable threaded comments widget.
//!
//! Dioxus components over `parley-core`. The host supplies identity and
//! document-store services plus a [`WidgetConfig`](parley_core::WidgetConfig)
//! and calls [`mount`]; from then on the widget follows the signed-in user
//! and the live comment collection on its own.
//!
//! ```ignore
//! use parley_core::WidgetConfig;
//! use parley_widget::{demo_services, mount, DemoOptions};
//!
//! let config = WidgetConfig::new("posts", "hello-world");
//! let services = demo_services(&config, &DemoOptions::default())?;
//! mount(config, services);
//! ```

pub mod components;
pub mod context;
pub mod demo;
pub mod mount;

pub use context::{WidgetContext, WidgetServices};
pub use demo::{demo_services, sample_thread, DemoOptions};
pub use mount::{desktop_config, mount, mount_in};

/// Widget CSS for embedding in host apps.
pub const WIDGET_CSS: &str = include_str!("../assets/style.css");
