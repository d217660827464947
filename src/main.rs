// src/main.rs

//! # Credential Client - Command Line Entry Point
//!
//! Loads settings, builds a [`CredentialClient`] and runs one credential
//! operation against the authorization server.
//!
//! ## Environment Variables
//! - `CREDENTIAL_CLIENT_SERVER_URL`: Authorization server base URL
//! - `CREDENTIAL_CLIENT_VOUCHER__SIGNING_KEY`: HMAC secret for voucher tokens
//! - `CREDENTIAL_CLIENT_PASSWORD`: (Optional) password for `create`/`update`
//! - `RUST_LOG`: (Optional) log filter, default `info`
//!
//! ## Exit Codes
//! - `0`: success
//! - `1`: failure
//! - `2`: credential already exists

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use credential_session_client::{
    CreateCredentialOutcome, CreateVoucherOutcome, CredentialClient, Settings,
    UpdateCredentialOutcome,
};
use dotenv::dotenv;
use std::process::ExitCode;
use url::Url;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "credential-client", version, about = "Submit credentials and mint vouchers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new username/password credential
    Create(ImplicitArgs),
    /// Replace the password of an existing credential
    Update(ImplicitArgs),
    /// Mint a voucher token and register it as a credential
    Voucher(VoucherArgs),
}

#[derive(Args)]
struct ImplicitArgs {
    #[arg(long)]
    auth_id: Uuid,
    #[arg(long)]
    provider: Url,
    #[arg(long)]
    username: String,
    #[arg(long, env = "CREDENTIAL_CLIENT_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args)]
struct VoucherArgs {
    #[arg(long)]
    auth_id: Uuid,
    #[arg(long)]
    provider: Url,
    /// Voucher lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    duration_secs: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let settings = Settings::load().context("failed to load settings")?;
    let client =
        CredentialClient::from_settings(&settings).context("failed to build credential client")?;

    let code = match cli.command {
        Command::Create(args) => {
            match client
                .create_credential(args.auth_id, &args.provider, &args.username, &args.password)
                .await
            {
                CreateCredentialOutcome::Success => {
                    println!("Credential created");
                    ExitCode::SUCCESS
                }
                CreateCredentialOutcome::AlreadyExists(location) => {
                    println!("Credential already exists at {}", location);
                    ExitCode::from(2)
                }
                CreateCredentialOutcome::Failure(why) => {
                    eprintln!("Credential creation failed: {}", why);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Update(args) => {
            match client
                .update_credential(args.auth_id, &args.provider, &args.username, &args.password)
                .await
            {
                UpdateCredentialOutcome::Success => {
                    println!("Credential updated");
                    ExitCode::SUCCESS
                }
                UpdateCredentialOutcome::Failure(why) => {
                    eprintln!("Credential update failed: {}", why);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Voucher(args) => {
            let duration = chrono::Duration::try_seconds(args.duration_secs)
                .context("voucher duration out of range")?;
            match client.create_voucher(args.auth_id, &args.provider, duration).await {
                CreateVoucherOutcome::Success(token) => {
                    println!("{}", token);
                    ExitCode::SUCCESS
                }
                CreateVoucherOutcome::Failure(why) => {
                    eprintln!("Voucher creation failed: {}", why);
                    ExitCode::FAILURE
                }
            }
        }
    };

    Ok(code)
}
