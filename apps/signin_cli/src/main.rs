use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use auth_client::{load_settings, AuthProvider, IdentityToolkitClient, SettingsOverrides};
use clap::{Parser, Subcommand};
use shared::domain::Credentials;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "signin", about = "Email/password sign-in from the terminal")]
struct Args {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    api_key: Option<String>,
    #[arg(long, global = true)]
    auth_base_url: Option<String>,
    #[arg(long, global = true)]
    session_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print who is signed in.
    Status,
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Create the account with the same credentials if sign-in fails.
        #[arg(long)]
        create_if_missing: bool,
    },
    SignOut,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    settings.apply_overrides(SettingsOverrides {
        api_key: args.api_key,
        auth_base_url: args.auth_base_url,
        session_path: args.session_path,
    });
    let provider =
        IdentityToolkitClient::new(&settings).context("failed to initialise identity provider")?;

    run(&provider, args.command, &mut std::io::stdout()).await
}

async fn run(provider: &dyn AuthProvider, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Status => match provider.current_session() {
            Some(session) => writeln!(
                out,
                "signed in as {}",
                session.email.as_deref().unwrap_or(session.user_id.0.as_str())
            )?,
            None => writeln!(out, "signed out")?,
        },
        Command::SignIn {
            email,
            password,
            create_if_missing,
        } => {
            let credentials = Credentials::from_form(&email, &password)?;
            match provider.sign_in(&credentials).await {
                Ok(session) => writeln!(
                    out,
                    "signed in as {}",
                    session.email.as_deref().unwrap_or(&credentials.email)
                )?,
                Err(err) if create_if_missing => {
                    if !err.code.is_credential_rejection() {
                        tracing::warn!(code = ?err.code, "sign-in did not reach a verdict: {err}");
                    }
                    tracing::info!(email = %credentials.email, "creating account after failed sign-in");
                    let session = provider
                        .sign_up(&credentials)
                        .await
                        .context("account creation failed")?;
                    writeln!(
                        out,
                        "created account {}",
                        session.email.as_deref().unwrap_or(&credentials.email)
                    )?;
                }
                Err(err) => return Err(err).context("sign-in failed"),
            }
        }
        Command::SignOut => {
            provider.sign_out().context("sign-out failed")?;
            writeln!(out, "signed out")?;
        }
    }
    Ok(())
}
