use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use diary_client::net::transport::ReqwestTransport;
use diary_client::router::guard::{self, Decision};
use diary_client::storage::FileStorage;
use diary_client::{ApiError, AuthStore, ClientConfig, HttpClient, RouteTable, StorageError};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("login failed: {0}")]
    LoginFailed(String),
    #[error("not logged in; run `diary login` first")]
    NotLoggedIn,
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "diary", about = "Teacher diary session client")]
struct Cli {
    /// Backend base URL; defaults to `DIARY_API_BASE_URL` or http://127.0.0.1:8000.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "DIARY_SESSION_FILE", default_value = ".diary-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "DIARY_PASSWORD", hide_env_values = true)]
        password: String,
        /// Location the user originally asked for.
        #[arg(long)]
        redirect: Option<String>,
    },
    /// Drop the persisted session.
    Logout,
    /// Show the current session.
    Whoami,
    /// Run the navigation guard for a location.
    Check { path: String },
    /// Authenticated GET against an API path.
    Get { path: String },
    /// Change the password and lift the forced-change lock.
    ChangePassword {
        #[arg(long)]
        old_password: String,
        #[arg(long)]
        new_password: String,
    },
}

struct CliContext {
    store: AuthStore,
    http: HttpClient,
    routes: RouteTable,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_owned();
    }

    let storage = Rc::new(FileStorage::open(&cli.session_file)?);
    let store = AuthStore::restore(storage);
    let transport = Rc::new(ReqwestTransport::new()?);
    let http = HttpClient::for_session(config, transport, &store);
    let ctx = CliContext { store, http, routes: RouteTable::diary() };

    match cli.command {
        Command::Login { username, password, redirect } => run_login(&ctx, &username, &password, redirect.as_deref()).await,
        Command::Logout => {
            ctx.store.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => run_whoami(&ctx),
        Command::Check { path } => {
            run_check(&ctx, &path);
            Ok(())
        }
        Command::Get { path } => run_get(&ctx, &path).await,
        Command::ChangePassword { old_password, new_password } => {
            ctx.store.change_password(&ctx.http, &old_password, &new_password).await?;
            println!("password changed");
            Ok(())
        }
    }
}

async fn run_login(ctx: &CliContext, username: &str, password: &str, redirect: Option<&str>) -> Result<(), CliError> {
    if !ctx.store.login(&ctx.http, username, password).await {
        return Err(CliError::LoginFailed(ctx.store.error().unwrap_or_default()));
    }
    let role = ctx.store.role().map_or_else(|| "none".to_owned(), |r| r.to_string());
    println!("logged in as {} ({role})", ctx.store.display_name());
    if ctx.store.password_change_required() {
        println!("password change required before anything else");
    }
    let next = guard::post_login_path(&ctx.routes, redirect, &ctx.store.snapshot());
    println!("next: {next}");
    Ok(())
}

fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    let Some(profile) = ctx.store.profile() else {
        return Err(CliError::NotLoggedIn);
    };
    let summary = json!({
        "display_name": profile.display_name(),
        "profile": profile,
        "password_change_required": ctx.store.password_change_required(),
    });
    print_json(&summary)
}

fn run_check(ctx: &CliContext, path: &str) {
    match guard::check(&ctx.routes, path, &ctx.store.snapshot()) {
        Decision::Allow => println!("allow {path}"),
        Decision::Redirect(redirect) => println!("redirect {}", redirect.href(&ctx.routes)),
    }
}

async fn run_get(ctx: &CliContext, path: &str) -> Result<(), CliError> {
    match ctx.http.get_json::<Value>(path).await {
        Ok(json) => print_json(&json),
        Err(err) => {
            if err.is_unauthorized() {
                tracing::warn!("session expired and was cleared; log in again");
            }
            Err(err.into())
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
