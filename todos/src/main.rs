//! Interactive todo-list client.
//!
//! Reads one command per line from stdin, dispatches it to the store, waits
//! until its remote calls are reconciled and prints the list again.
//!
//! ```bash
//! TODOS_USER_ID=2351 cargo run --bin todos
//! TODOS_OFFLINE=1 cargo run --bin todos   # no network, in-memory backend
//! ```

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use todo_sync_runtime::Store;
use todos::command::HELP;
use todos::view::render;
use todos::{
    Command, Config, HttpTodoApi, InMemoryTodoApi, ParseCommandError, TodoAction, TodoApi,
    TodoEnvironment, TodoReducer, TodoState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// How long in-flight calls may take to settle on exit
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todos=info,todo_sync_runtime=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn build_api(config: &Config) -> anyhow::Result<Arc<dyn TodoApi>> {
    if config.offline {
        info!("Offline mode: todos are kept in memory");
        return Ok(Arc::new(InMemoryTodoApi::new()));
    }

    info!(api_url = %config.api_url, user_id = %config.user_id, "Using remote todo API");
    let api = HttpTodoApi::new(config.api_url.clone(), config.request_timeout)
        .context("Failed to build HTTP client")?;
    Ok(Arc::new(api))
}

/// Sends `action` and waits until the calls it started are reconciled
async fn dispatch(store: &TodoStore, action: TodoAction, timeout: Duration) -> anyhow::Result<()> {
    let mut handle = store.send(action).await?;
    if let Err(error) = handle.wait_with_timeout(timeout).await {
        warn!(%error, pending = handle.pending(), "Remote calls still running");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Invalid configuration")?;
    let api = build_api(&config)?;
    let wait = config.settle_wait();

    let store = Store::new(
        TodoState::new(config.user_id),
        TodoReducer::new(),
        TodoEnvironment::new(api),
    );

    dispatch(&store, TodoAction::Load, wait).await?;
    println!("{}", store.state(render).await);
    println!("(type `help` for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => {
                println!("{HELP}");
                continue;
            },
            Ok(command) => {
                for action in command.into_actions() {
                    dispatch(&store, action, wait).await?;
                }
            },
            Err(ParseCommandError::Empty) => {},
            Err(error) => {
                println!("error: {error}");
                continue;
            },
        }

        println!("{}", store.state(render).await);
    }

    store.shutdown(SHUTDOWN_TIMEOUT).await?;
    Ok(())
}
