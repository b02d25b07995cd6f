use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use auth_client::{load_settings, AuthProvider, IdentityToolkitClient, SettingsOverrides};
use backend_bridge::commands::BackendCommand;
use clap::Parser;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::{app::APP_TITLE, DesktopGuiApp};

#[derive(Parser, Debug)]
#[command(about = "Desktop email/password sign-in")]
struct Args {
    /// Settings file (defaults to ./signin.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    auth_base_url: Option<String>,
    /// Where the signed-in session is persisted between launches.
    #[arg(long)]
    session_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    settings.apply_overrides(SettingsOverrides {
        api_key: args.api_key,
        auth_base_url: args.auth_base_url,
        session_path: args.session_path,
    });
    let provider: Arc<dyn AuthProvider> = Arc::new(
        IdentityToolkitClient::new(&settings).context("failed to initialise identity provider")?,
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(Arc::clone(&provider), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([420.0, 560.0])
            .with_min_inner_size([320.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(DesktopGuiApp::bootstrap(provider, cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop gui exited with error: {err}"))
}
