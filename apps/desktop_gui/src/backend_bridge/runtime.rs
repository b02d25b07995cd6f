//! Backend worker: owns a tokio runtime on its own thread and runs provider
//! calls for commands queued by the UI.

use std::{sync::Arc, thread};

use auth_client::AuthProvider;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Spawns the worker. It exits once every command sender is dropped.
pub fn launch(
    provider: Arc<dyn AuthProvider>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                notify(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("failed to build runtime: {err}"),
                    )),
                );
                return;
            }
        };

        runtime.block_on(async move {
            tracing::debug!("backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                let event = run_command(provider.as_ref(), cmd).await;
                notify(&ui_tx, event);
            }
            tracing::debug!("command queue closed; backend worker exiting");
        });
    })
}

async fn run_command(provider: &dyn AuthProvider, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::SignIn { credentials } => {
            tracing::info!(email = %credentials.email, "backend: sign_in");
            match provider.sign_in(&credentials).await {
                Ok(_) => UiEvent::SignedIn,
                Err(err) => {
                    tracing::warn!(
                        email = %credentials.email,
                        code = ?err.code,
                        "backend: sign_in failed: {err}"
                    );
                    UiEvent::Error(UiError::from_auth(UiErrorContext::SignIn, &err))
                }
            }
        }
        BackendCommand::SignUp { credentials } => {
            tracing::info!(email = %credentials.email, "backend: sign_up");
            match provider.sign_up(&credentials).await {
                Ok(_) => UiEvent::AccountCreated,
                Err(err) => {
                    tracing::warn!(
                        email = %credentials.email,
                        code = ?err.code,
                        "backend: sign_up failed: {err}"
                    );
                    UiEvent::Error(UiError::from_auth(UiErrorContext::SignUp, &err))
                }
            }
        }
    }
}

fn notify(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if let Err(err) = ui_tx.try_send(event) {
        tracing::warn!("dropping backend event; ui queue unavailable: {err}");
    }
}
