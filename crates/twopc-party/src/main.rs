//! Two-party protocol CLI
//!
//! Runs one side of a protocol against a peer over TCP:
//! - OT sender and receiver (byte-string payloads)
//! - Coin tossing, as party one or party two

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::OsRng;
use tokio::net::TcpListener;
use tracing::{info, Level};
use twopc_core::channel::TcpChannel;
use twopc_core::coin_tossing::{CoinTossPartyOne, CoinTossPartyTwo};
use twopc_core::commitment::{PedersenCommitter, PedersenReceiver};
use twopc_core::group::{DlogGroup, RistrettoGroup, Secp256k1Group, ZpSafePrimeGroup};
use twopc_core::kdf::HkdfSha256;
use twopc_core::ot::{ByteArrayPayload, OtReceiver, OtSender};
use twopc_core::security::Malicious;
use twopc_core::sigma::SchnorrProofs;
use twopc_core::{ChoiceBit, CoinTossConfig};

/// twopc-party - two-party protocol node
#[derive(Parser)]
#[command(name = "twopc-party")]
#[command(about = "Oblivious transfer and coin tossing between two parties")]
#[command(version)]
struct Cli {
    /// Wait for the peer on this address
    #[arg(short, long, env = "TWOPC_LISTEN", conflicts_with = "connect")]
    listen: Option<String>,

    /// Connect to a listening peer
    #[arg(short, long, env = "TWOPC_CONNECT")]
    connect: Option<String>,

    /// Group both parties run over
    #[arg(short, long, env = "TWOPC_GROUP", value_enum, default_value_t = GroupKind::Secp256k1)]
    group: GroupKind,

    /// Run the malicious-secure OT variant
    #[arg(long)]
    malicious: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GroupKind {
    Secp256k1,
    Ristretto,
    Modp2048,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Role {
    One,
    Two,
}

#[derive(Subcommand)]
enum Commands {
    /// Offer two inputs as the OT sender
    OtSend {
        /// First input (hex)
        #[arg(long)]
        x0: String,

        /// Second input (hex), same length as x0
        #[arg(long)]
        x1: String,
    },

    /// Pick one input as the OT receiver
    OtReceive {
        /// Choice bit (0 or 1)
        #[arg(long)]
        choice: u8,
    },

    /// Toss a shared random string
    CoinToss {
        /// Which party to play
        #[arg(long, value_enum)]
        role: Role,

        /// Output length in bits (multiple of 8)
        #[arg(long, default_value_t = CoinTossConfig::DEFAULT_BIT_LENGTH)]
        bits: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.group {
        GroupKind::Secp256k1 => run(&cli, Secp256k1Group::new()).await,
        GroupKind::Ristretto => run(&cli, RistrettoGroup::new()).await,
        GroupKind::Modp2048 => run(&cli, ZpSafePrimeGroup::rfc3526_2048()).await,
    }
}

async fn open_channel(cli: &Cli) -> Result<TcpChannel> {
    match (&cli.listen, &cli.connect) {
        (Some(addr), None) => {
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            info!(%addr, "Waiting for peer");
            Ok(TcpChannel::accept(&listener).await?)
        }
        (None, Some(addr)) => {
            info!(%addr, "Connecting to peer");
            Ok(TcpChannel::connect(addr.as_str()).await?)
        }
        _ => bail!("Exactly one of --listen or --connect is required"),
    }
}

/// A command with its arguments parsed, ready to run
enum Job {
    Send { x0: Vec<u8>, x1: Vec<u8> },
    Receive { sigma: ChoiceBit },
    Toss { role: Role, config: CoinTossConfig },
}

impl Job {
    fn parse(command: &Commands) -> Result<Self> {
        Ok(match command {
            Commands::OtSend { x0, x1 } => Job::Send {
                x0: hex::decode(x0).context("x0 must be hex")?,
                x1: hex::decode(x1).context("x1 must be hex")?,
            },
            Commands::OtReceive { choice } => Job::Receive {
                sigma: ChoiceBit::try_from(*choice)?,
            },
            Commands::CoinToss { role, bits } => Job::Toss {
                role: *role,
                config: CoinTossConfig::new(*bits)?,
            },
        })
    }
}

async fn run<G: DlogGroup>(cli: &Cli, group: G) -> Result<()> {
    // Arguments are checked before the peer is contacted
    let job = Job::parse(&cli.command)?;

    let mut channel = open_channel(cli).await?;
    let mut rng = OsRng;
    let payload = ByteArrayPayload::new(HkdfSha256::new());

    match job {
        Job::Send { x0, x1 } => {
            if cli.malicious {
                OtSender::with_level(group, payload, Malicious::new(SchnorrProofs))
                    .transfer(&mut channel, &mut rng, &x0, &x1)
                    .await?;
            } else {
                OtSender::new(group, payload)
                    .transfer(&mut channel, &mut rng, &x0, &x1)
                    .await?;
            }
            info!("Inputs transferred");
        }
        Job::Receive { sigma } => {
            let output = if cli.malicious {
                OtReceiver::with_level(group, payload, Malicious::new(SchnorrProofs))
                    .transfer(&mut channel, &mut rng, sigma)
                    .await?
            } else {
                OtReceiver::new(group, payload)
                    .transfer(&mut channel, &mut rng, sigma)
                    .await?
            };
            println!("{}", hex::encode(output));
        }
        Job::Toss { role, config } => {
            let output = match role {
                Role::One => {
                    let committer = PedersenCommitter::setup(group, &mut channel).await?;
                    CoinTossPartyOne::new(config, committer, HkdfSha256::new())
                        .toss(&mut channel, &mut rng)
                        .await?
                }
                Role::Two => {
                    let receiver = PedersenReceiver::setup(group, &mut channel, &mut rng).await?;
                    CoinTossPartyTwo::new(config, receiver, HkdfSha256::new())
                        .toss(&mut channel, &mut rng)
                        .await?
                }
            };
            println!("{}", hex::encode(output.as_bytes()));
        }
    }

    Ok(())
}
