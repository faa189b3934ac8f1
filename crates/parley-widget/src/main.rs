//! Stand-alone demo: the comments widget over in-memory services.

use std::path::PathBuf;

use clap::Parser;
use dioxus::desktop::{LogicalSize, WindowBuilder};

use parley_core::{Result, WidgetConfig};
use parley_logging::{LogConfig, ParleySubscriberBuilder};
use parley_widget::{demo_services, mount_in, DemoOptions};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "parley-demo")]
#[command(about = "Threaded comments widget running on in-memory services")]
struct Args {
    /// Collection holding page/post documents
    #[arg(long, default_value = "posts")]
    collection: String,

    /// Page/post whose comments are shown
    #[arg(long, default_value = "welcome")]
    document_id: String,

    /// Display name to log in as
    #[arg(short, long, default_value = "Guest")]
    user: String,

    /// Start already logged in
    #[arg(long)]
    signed_in: bool,

    /// Pre-fill the thread with a sample conversation
    #[arg(long)]
    seed: bool,

    /// Require and attach attestation tokens for this site key
    #[arg(long)]
    attestation_site_key: Option<String>,

    /// JSON widget configuration; overrides --collection and --document-id
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON log lines instead of pretty output
    #[arg(long)]
    json_logs: bool,
}

fn load_config(args: &Args) -> Result<WidgetConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                parley_core::ParleyError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            WidgetConfig::from_json(&json)?
        }
        None => match WidgetConfig::from_env() {
            Ok(config) => config,
            Err(_) => WidgetConfig::new(&args.collection, &args.document_id),
        },
    };
    if let Some(site_key) = &args.attestation_site_key {
        config = config.with_attestation(site_key);
    }
    config.validate()?;
    Ok(config)
}

fn main() {
    let args = Args::parse();

    let log_config = if args.json_logs {
        LogConfig::production()
    } else {
        LogConfig::development()
    };
    ParleySubscriberBuilder::new().with_config(log_config).init();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid widget configuration");
            std::process::exit(1);
        }
    };

    let options = DemoOptions {
        user: args.user.clone(),
        signed_in: args.signed_in,
        seed: args.seed,
    };
    let services = match demo_services(&config, &options) {
        Ok(services) => services,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up demo services");
            std::process::exit(1);
        }
    };

    tracing::info!(
        path = %config.comments_path(),
        user = %options.user,
        attestation = config.attestation_site_key.is_some(),
        "Starting Parley demo"
    );

    let window = WindowBuilder::new()
        .with_title(format!("Parley - {}", config.comments_path()))
        .with_inner_size(LogicalSize::new(720.0, 860.0))
        .with_maximized(false);

    if let Err(e) = mount_in(config, services, window) {
        tracing::error!(error = %e, "Failed to mount comments widget");
        std::process::exit(1);
    }
}
