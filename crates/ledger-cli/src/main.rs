use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "CLI client for the minimal ledger node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:5000)
    #[arg(long, global = true, default_value = "http://127.0.0.1:5000")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a transaction to the pending pool
    Submit {
        /// Sender
        #[arg(long)]
        sender: String,
        /// Receiver
        #[arg(long)]
        receiver: String,
        /// Amount
        #[arg(long)]
        amount: f64,
    },
    /// Mine a block from the pending pool
    Mine,
    /// Print the full chain and its length
    Chain,
    /// Ask the node to validate its own chain
    Valid,
    /// Run longest-valid-chain consensus against the node's peers
    Resolve,
    /// Register one or more peer addresses
    Connect {
        /// Peer addresses, e.g. http://127.0.0.1:5001
        #[arg(required = true)]
        nodes: Vec<String>,
    },
}

#[derive(Serialize)]
struct Tx {
    sender: String,
    receiver: String,
    amount: f64,
}

#[derive(Serialize)]
struct Peers {
    nodes: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let base = cli.node.trim_end_matches('/');
    let client = Client::new();
    let request = match cli.cmd {
        Command::Submit {
            sender,
            receiver,
            amount,
        } => client
            .post(format!("{base}/add_transaction"))
            .json(&Tx {
                sender,
                receiver,
                amount,
            }),
        Command::Mine => client.get(format!("{base}/mine_block")),
        Command::Chain => client.get(format!("{base}/get_chain")),
        Command::Valid => client.get(format!("{base}/is_valid")),
        Command::Resolve => client.get(format!("{base}/replace_chain")),
        Command::Connect { nodes } => client
            .post(format!("{base}/connect_node"))
            .json(&Peers { nodes }),
    };
    debug!(?request, "sending request");
    let res = request
        .send()
        .await
        .with_context(|| format!("could not reach node at {base}"))?;
    print_response(res).await
}

async fn print_response(res: Response) -> Result<()> {
    let status = res.status();
    let body = res.text().await?;
    println!("status: {status}");
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{body}"),
    }
    if !status.is_success() {
        anyhow::bail!("node answered {status}");
    }
    Ok(())
}
