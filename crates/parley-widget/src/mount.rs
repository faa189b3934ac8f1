//! Host entry point: render the widget into a desktop webview.
//!
//! The launcher takes a root component function with no props, so the
//! configuration and services are parked in a process-wide slot first and
//! picked up by [`MountedWidget`]. A process can mount one widget.

use std::sync::OnceLock;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use tracing::{error, info};

use parley_core::{ParleyError, Result, WidgetConfig};

use crate::components::Widget;
use crate::context::WidgetServices;
use crate::WIDGET_CSS;

static MOUNTED: OnceLock<(WidgetConfig, WidgetServices)> = OnceLock::new();

/// Render the widget with a default window. Returns once the window closes.
///
/// Failures (invalid configuration, second mount) are logged; nothing is
/// rendered in that case.
pub fn mount(config: WidgetConfig, services: WidgetServices) {
    if let Err(e) = mount_in(config, services, default_window()) {
        error!(error = %e, "Failed to mount comments widget");
    }
}

/// Render the widget inside the given window.
///
/// The services must carry an attestor exactly when the configuration
/// names an attestation site key, and for that key.
pub fn mount_in(config: WidgetConfig, services: WidgetServices, window: WindowBuilder) -> Result<()> {
    config.validate()?;
    services.check_attestation(&config)?;
    let cfg = desktop_config(&config.target, window);
    let target = config.target.clone();

    MOUNTED
        .set((config, services))
        .map_err(|_| ParleyError::Config("comments widget is already mounted".into()))?;

    info!(target_element = %target, "Mounting comments widget");
    dioxus::LaunchBuilder::desktop().with_cfg(cfg).launch(MountedWidget);
    Ok(())
}

/// Desktop configuration: the widget's stylesheet and a root element
/// named after the mount target.
pub fn desktop_config(target: &str, window: WindowBuilder) -> Config {
    Config::new()
        .with_window(window)
        .with_root_name(target)
        .with_custom_head(format!(r#"<style>{}</style>"#, WIDGET_CSS))
}

fn default_window() -> WindowBuilder {
    WindowBuilder::new()
        .with_title("Comments")
        .with_inner_size(LogicalSize::new(720.0, 860.0))
}

/// Root component reading what [`mount_in`] parked.
#[component]
fn MountedWidget() -> Element {
    match MOUNTED.get() {
        Some((config, services)) => rsx! {
            Widget { config: config.clone(), services: services.clone() }
        },
        None => rsx! {},
    }
}
