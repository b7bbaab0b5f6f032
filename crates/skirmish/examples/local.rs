//! Runs one lobby through a full simulation locally and prints every
//! event frame as wire JSON.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example local
//! ```

use std::time::Duration;

use skirmish::{Coordinator, CreateLobby, LobbyLimits, MemoryDirectory, SimConfig};
use skirmish_protocol::{BotId, UserId};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let directory = MemoryDirectory::new();
    let host = UserId::random();
    let bot = BotId::random();
    directory.insert_user(host);
    directory.insert_bot(bot);

    let coordinator = Coordinator::with_config(
        directory,
        LobbyLimits::default(),
        SimConfig {
            turn_interval: Duration::from_millis(500),
            max_turns: 5,
            start_jitter: Duration::ZERO,
        },
    );

    let lobby = coordinator
        .create_lobby(CreateLobby {
            name: "Arena1".into(),
            max_players: 4,
            max_spectators: 0,
            host_id: host,
            host_name: "alice".into(),
            selected_bot: Some(bot),
        })
        .await?;
    println!("created lobby: {}", serde_json::to_string_pretty(&lobby)?);

    let mut events = coordinator.subscribe("Arena1")?;
    coordinator.start_simulation("Arena1")?;

    while let Some(event) = events.recv().await {
        println!("frame: {}", serde_json::to_string(&event)?);
    }

    println!("lobby gone: {}", coordinator.get_lobby("Arena1").is_err());
    Ok(())
}
