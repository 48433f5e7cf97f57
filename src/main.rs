use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use lottery_core::*;

#[derive(Parser)]
#[command(name = "lottery-cli")]
#[command(about = "Lottery Core CLI - deterministic, verifiable lottery settlement")]
#[command(version = "1.0.0")]
struct Cli {
    /// Path of the JSON-backed state store
    #[arg(long, default_value = "lottery-state.json", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Transaction context supplied per call. A real deployment gets these from
/// the chain; the CLI takes them as flags so every run stays replayable.
#[derive(Args, Clone)]
struct EnvArgs {
    /// Calling account
    #[arg(long)]
    caller: String,

    /// Unix timestamp of the call
    #[arg(long)]
    timestamp: i64,

    /// Transaction id (entropy for execution seeds)
    #[arg(long, default_value = "")]
    tx_id: String,

    /// Block height (entropy for execution seeds)
    #[arg(long, default_value = "0")]
    block_height: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new lottery
    Create {
        #[command(flatten)]
        env: EnvArgs,

        /// Lottery name
        #[arg(long)]
        name: String,

        /// Deadline in hours from now (1..=2160)
        #[arg(long)]
        deadline_hours: u64,

        /// Burn percentage (5..=75)
        #[arg(long)]
        burn_percent: u8,

        /// Ticket price in display units (e.g. 5.0)
        #[arg(long)]
        ticket_price: f64,

        /// Asset symbol
        #[arg(long, default_value = "HIVE")]
        asset: String,

        /// Winner shares as comma-separated integers summing to 100
        #[arg(long)]
        shares: String,

        /// Maximum tickets sellable (0 = uncapped)
        #[arg(long, default_value = "0")]
        max_tickets: u64,

        /// Donation recipient (optional)
        #[arg(long, default_value = "")]
        donation_account: String,

        /// Donation percentage (required with a donation account)
        #[arg(long, default_value = "0")]
        donation_percent: u8,

        /// Opaque annotation (optional)
        #[arg(long, default_value = "")]
        annotation: String,
    },

    /// Buy tickets in an active lottery
    Join {
        #[command(flatten)]
        env: EnvArgs,

        /// Lottery id
        #[arg(long)]
        id: u64,

        /// Funds offered in display units; whole tickets are bought by
        /// floor division, the excess is never drawn
        #[arg(long)]
        offer: f64,

        /// Asset symbol of the offer
        #[arg(long, default_value = "HIVE")]
        asset: String,
    },

    /// Execute a lottery whose deadline has passed
    Execute {
        #[command(flatten)]
        env: EnvArgs,

        /// Lottery id
        #[arg(long)]
        id: u64,
    },

    /// Replay winner selection with a claimed seed and compare
    Verify {
        /// Lottery id
        #[arg(long)]
        id: u64,

        /// Claimed 64-bit seed
        #[arg(long)]
        seed: u64,
    },

    /// Attach or replace the creator annotation
    Annotate {
        #[command(flatten)]
        env: EnvArgs,

        /// Lottery id
        #[arg(long)]
        id: u64,

        /// Annotation text
        #[arg(long)]
        annotation: String,
    },

    /// Print a lottery's metadata, pool stats, and participants
    Show {
        /// Lottery id
        #[arg(long)]
        id: u64,
    },

    /// Print the recorded audit event log
    Events,
}

/// On-disk store: record bytes hex-encoded under their keys, plus the
/// append-only audit event log.
#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    state: BTreeMap<String, String>,
    events: Vec<String>,
}

impl StoreFile {
    fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading store {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing store {}", path.display()))
    }

    fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("writing store {}", path.display()))?;
        Ok(())
    }
}

/// Host over the JSON file store. Funds movements are printed (the CLI has
/// no ledger); state writes and events land in the store file.
struct FileHost {
    env: TxEnv,
    file: StoreFile,
}

impl FileHost {
    fn new(file: StoreFile, env: TxEnv) -> Self {
        Self { env, file }
    }
}

impl Host for FileHost {
    fn env(&self) -> &TxEnv {
        &self.env
    }

    fn state_get(&self, key: &str) -> Option<Vec<u8>> {
        self.file
            .state
            .get(key)
            .and_then(|hex_str| hex::decode(hex_str).ok())
    }

    fn state_set(&mut self, key: &str, value: Vec<u8>) {
        self.file.state.insert(key.to_string(), hex::encode(value));
    }

    fn draw_funds(&mut self, amount: Amount, asset: &str) -> Result<()> {
        println!("draw  {} {} <- {}", amount, asset, self.env.caller);
        Ok(())
    }

    fn send_funds(&mut self, to: &Address, amount: Amount, asset: &str) -> Result<()> {
        println!("send  {} {} -> {}", amount, asset, to);
        Ok(())
    }

    fn emit_event(&mut self, event: String) {
        println!("event {}", event);
        self.file.events.push(event);
    }
}

fn tx_env(args: &EnvArgs) -> TxEnv {
    TxEnv {
        tx_id: args.tx_id.clone(),
        block_height: args.block_height,
        timestamp: args.timestamp,
        caller: args.caller.clone(),
    }
}

fn parse_shares(text: &str) -> anyhow::Result<Vec<u8>> {
    text.split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .with_context(|| format!("invalid winner share '{}'", part.trim()))
        })
        .collect()
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let file = StoreFile::load(&cli.store)?;

    match cli.command {
        Commands::Create {
            env,
            name,
            deadline_hours,
            burn_percent,
            ticket_price,
            asset,
            shares,
            max_tickets,
            donation_account,
            donation_percent,
            annotation,
        } => {
            let mut engine = LotteryEngine::new(FileHost::new(file, tx_env(&env)));
            let id = engine.create(CreateParams {
                name,
                deadline_hours,
                burn_percent,
                ticket_price: Amount::from_value(ticket_price),
                asset,
                winner_shares: parse_shares(&shares)?,
                max_tickets,
                donation_account,
                donation_percent,
                annotation,
            })?;
            println!("lottery created with ID: {}", id);
            engine.into_host().file.save(&cli.store)?;
        }

        Commands::Join { env, id, offer, asset } => {
            let mut engine = LotteryEngine::new(FileHost::new(file, tx_env(&env)));
            let receipt = engine.join(id, Amount::from_value(offer), &asset)?;
            println!(
                "joined lottery with {} ticket(s) for {} (tickets {}..={})",
                receipt.tickets, receipt.cost, receipt.ticket_start, receipt.ticket_end
            );
            engine.into_host().file.save(&cli.store)?;
        }

        Commands::Execute { env, id } => {
            let mut engine = LotteryEngine::new(FileHost::new(file, tx_env(&env)));
            let summary = engine.execute(id)?;
            println!(
                "lottery executed with {} winner(s), seed {}, burned {}, donated {}",
                summary.winners.len(),
                summary.seed,
                summary.burned,
                summary.donated
            );
            for (i, w) in summary.winners.iter().enumerate() {
                println!("  {}. {} -> {} ({}%)", i + 1, w.address, w.amount, w.share);
            }
            engine.into_host().file.save(&cli.store)?;
        }

        Commands::Verify { id, seed } => {
            let engine = LotteryEngine::new(FileHost::new(file, TxEnv::default()));
            match engine.verify(id, seed)? {
                Verification::Confirmed(winners) => {
                    println!("verification successful: {} winner(s) match", winners.len());
                    for (i, address) in winners.iter().enumerate() {
                        println!("  {}. {}", i + 1, address);
                    }
                }
                Verification::CountMismatch { recorded, replayed } => {
                    println!(
                        "verification failed: winner count mismatch (recorded {}, replayed {})",
                        recorded, replayed
                    );
                    process::exit(1);
                }
                Verification::AddressMismatch { position } => {
                    println!(
                        "verification failed: winners do not match at position {}",
                        position + 1
                    );
                    process::exit(1);
                }
            }
        }

        Commands::Annotate { env, id, annotation } => {
            let mut engine = LotteryEngine::new(FileHost::new(file, tx_env(&env)));
            engine.set_annotation(id, annotation)?;
            println!("lottery metadata updated");
            engine.into_host().file.save(&cli.store)?;
        }

        Commands::Show { id } => {
            let engine = LotteryEngine::new(FileHost::new(file, TxEnv::default()));
            let meta = engine.metadata(id)?;
            let stats = engine.stats(id)?;
            let participants = engine.participants(id)?;
            println!("{}", serde_json::to_string_pretty(&meta)?);
            println!(
                "pool: {}  tickets: {}  participants: {}",
                stats.pool, stats.total_tickets, stats.participant_count
            );
            for (slot, p) in participants.iter().enumerate() {
                println!("  slot {}: {} ({} tickets)", slot + 1, p.address, p.tickets);
            }
        }

        Commands::Events => {
            for event in &file.events {
                println!("{}", event);
            }
        }
    }

    Ok(())
}
