//! Parley chat room server.
//!
//! Live presence over WebSocket, messages over the synchronous HTTP path, both
//! fanned out to every live connection of the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parley-server -- --seed seed.json
//! cargo run --bin parley-server -- --host 0.0.0.0 --port 3000 --idle-timeout-secs 300
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use parley_server::{
    domain::Timestamp,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        registry::InMemoryConnectionRegistry,
        repository::{InMemoryMessageRepository, InMemoryRoomRepository},
        seed::Seed,
    },
    ui::{AppState, Server},
};
use parley_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "parley-server")]
#[command(about = "Real-time chat room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "PARLEY_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PARLEY_PORT", default_value = "8080")]
    port: u16,

    /// JSON file with the rooms and credentials to start with
    #[arg(long, env = "PARLEY_SEED")]
    seed: Option<PathBuf>,

    /// Close live connections silent for this many seconds (0 = never)
    #[arg(long, env = "PARLEY_IDLE_TIMEOUT_SECS", default_value = "0")]
    idle_timeout_secs: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "PARLEY_LOG_LEVEL", default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = run(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize dependencies in order:
    // 1. Repositories and registry
    // 2. MessagePusher
    // 3. Seed data and identity
    // 4. AppState and server
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let rooms = Arc::new(InMemoryRoomRepository::new(clock.clone()));
    let messages = Arc::new(InMemoryMessageRepository::new(clock.clone()));
    let registry = Arc::new(InMemoryConnectionRegistry::new());

    let message_pusher = Arc::new(WebSocketMessagePusher::new(registry.clone()));

    let seed = match &args.seed {
        Some(path) => Seed::from_path(path)?,
        None => {
            tracing::warn!("No seed file given: starting without rooms or credentials");
            Seed::default()
        }
    };
    let loaded = seed
        .load_rooms(rooms.as_ref(), Timestamp::new(clock.now_millis()))
        .await?;
    let identity = Arc::new(seed.verifier()?);
    tracing::info!("Loaded {} rooms and {} credentials", loaded, identity.len());

    let idle_timeout = (args.idle_timeout_secs > 0)
        .then(|| Duration::from_secs(args.idle_timeout_secs));
    let app_state = AppState::new(rooms, messages, registry, message_pusher, identity)
        .with_idle_timeout(idle_timeout);

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Connect to: ws://{}/api/ws/chat/{{room_id}}", bind_addr);

    Server::new(app_state).serve(listener).await?;
    Ok(())
}
