mod constants;
mod error;
mod routes;
mod transport;

use clap::Parser;
use constants::{DEFAULT_LISTEN, DEFAULT_PEER_TIMEOUT_SECS};
use ledger_core::{constants::MINING_REWARD, constants::POW_DIFFICULTY, Ledger, LedgerConfig};
use routes::{router, AppState};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing::{info, Level};
use transport::HttpTransport;

#[derive(Parser, Debug)]
struct Args {
    /// Address to listen on, e.g. 127.0.0.1:5000
    #[arg(long, default_value = DEFAULT_LISTEN)]
    listen: String,

    /// Leading zero hex digits required of a proof digest
    #[arg(long, default_value_t = POW_DIFFICULTY)]
    difficulty: usize,

    /// Amount credited to the miner for each block
    #[arg(long, default_value_t = MINING_REWARD)]
    reward: f64,

    /// Receiver of mining rewards; defaults to this node's generated id
    #[arg(long)]
    miner: Option<String>,

    /// Per-peer timeout when fetching chains during consensus
    #[arg(long, default_value_t = DEFAULT_PEER_TIMEOUT_SECS)]
    peer_timeout_secs: u64,

    /// Peers to register at startup
    #[arg(long = "peer")]
    peers: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = LedgerConfig {
        difficulty: args.difficulty,
        reward: args.reward,
        ..LedgerConfig::default()
    };
    if let Some(miner) = args.miner {
        config = config.with_miner(miner);
    }
    info!(node_id = %config.node_id, difficulty = config.difficulty, "starting ledger node");

    let ledger = Arc::new(Ledger::new(config));
    for (address, result) in ledger.connect_nodes(args.peers.iter().map(String::as_str)) {
        match result {
            Ok(node) => info!(%node, "registered peer"),
            Err(err) => anyhow::bail!("invalid --peer {address}: {err}"),
        }
    }

    let transport = HttpTransport::new(Duration::from_secs(args.peer_timeout_secs))?;
    let app = router(AppState {
        ledger,
        transport: Arc::new(transport),
    });

    let addr: SocketAddr = args.listen.parse()?;
    info!("ledger-node listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
