//! Console Front End
//!
//! Line-oriented stand-in for the browser page: sign in and out against the
//! hosted provider, call the relay, and render the current session.

mod command;
mod config;

use anyhow::Context;
use platform::config::env_lookup;
use platform::provider::AuthProviderClient;
use session::{
    AuthClient, ControllerView, JsonFileStorage, MemoryStorage, Notifier, RelayClient,
    SessionController, SessionStorage,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::command::{Command, USAGE};
use crate::config::ConsoleConfig;

/// Alerts go to stderr so they stand apart from rendered state
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

fn render(view: &ControllerView) {
    println!("Session: {}", view.user_email.as_deref().unwrap_or("none"));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web=info,session=info,platform=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ConsoleConfig::from_lookup(env_lookup).context("Invalid console configuration")?;

    let storage: Arc<dyn SessionStorage> = match &config.session_file {
        Some(path) => Arc::new(JsonFileStorage::new(path)),
        None => Arc::new(MemoryStorage::new()),
    };

    let provider = AuthProviderClient::new(config.provider.clone())
        .context("Failed to build auth provider client")?;
    let client = Arc::new(AuthClient::new(provider, storage));
    client.restore();

    let relay = RelayClient::new(&config.api_base_url).context("Invalid API_BASE_URL")?;
    let controller = SessionController::new(client, relay, Arc::new(StderrNotifier));

    let subscription = controller.activate(render);
    println!("{USAGE}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(message)) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            Command::SignIn { email, password } => controller.sign_in(&email, &password).await,
            Command::SignOut => controller.sign_out().await,
            Command::Profile => println!("{}", controller.call_profile().await),
            Command::Help => println!("{USAGE}"),
            Command::Quit => break,
        }
    }

    subscription.unsubscribe();
    Ok(())
}
