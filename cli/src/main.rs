use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};
use swaplock_core::interface::{load_swap_data, save_swap_data, SNAPSHOT_PATH};
use swaplock_core::{Coin, Object, Owner, ID};

mod state;
use state::World;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { seed } => {
            let world = World::new(&seed);
            save_swap_data(&cli.file, &world)?;
            tracing::info!("Ledger initialized at {}", cli.file.display());
        }
        Commands::Deposit { owner, value } => {
            let mut world: World = load_swap_data(&cli.file)?;
            let owner = world.party(&owner)?;
            let id = world.ledger.fresh_id();
            world.ledger.deposit(owner, Coin::new(id, value)?)?;
            save_swap_data(&cli.file, &world)?;
            tracing::info!("Minted coin {id} ({value}) for {}", world.name_of(owner));
        }
        Commands::Lock { owner, item } => {
            let mut world: World = load_swap_data(&cli.file)?;
            let owner = world.party(&owner)?;
            let item: ID = item.parse()?;
            let (lock, key) = world.ledger.lock(owner, item)?;
            save_swap_data(&cli.file, &world)?;
            tracing::info!("Locked {item}: lock {lock}, key {key}");
        }
        Commands::Unlock { owner, lock, key } => {
            let mut world: World = load_swap_data(&cli.file)?;
            let owner = world.party(&owner)?;
            let item = world.ledger.unlock(owner, lock.parse()?, key.parse()?)?;
            save_swap_data(&cli.file, &world)?;
            tracing::info!("Unlocked {item} for {}", world.name_of(owner));
        }
        Commands::Transfer { from, to, object } => {
            let mut world: World = load_swap_data(&cli.file)?;
            let from = world.party(&from)?;
            let to = world.party(&to)?;
            let object: ID = object.parse()?;
            world.ledger.transfer(from, object, to)?;
            save_swap_data(&cli.file, &world)?;
            tracing::info!("Transferred {object} to {}", world.name_of(to));
        }
        Commands::Escrow(cmd) => {
            let mut world: World = load_swap_data(&cli.file)?;
            run_escrow(&mut world, cmd)?;
            save_swap_data(&cli.file, &world)?;
        }
        Commands::Custody(cmd) => {
            let mut world: World = load_swap_data(&cli.file)?;
            run_custody(&mut world, cmd)?;
            save_swap_data(&cli.file, &world)?;
        }
        Commands::Show => {
            let world: World = load_swap_data(&cli.file)?;
            show(&world);
        }
        Commands::Events { json } => {
            let world: World = load_swap_data(&cli.file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(world.ledger.events())?);
            } else {
                for event in world.ledger.events() {
                    println!("{event}");
                }
            }
        }
    }

    Ok(())
}

fn run_escrow(world: &mut World, cmd: EscrowCmd) -> anyhow::Result<()> {
    match cmd {
        EscrowCmd::Create {
            sender,
            item,
            exchange_key,
            recipient,
        } => {
            let sender = world.party(&sender)?;
            let recipient = world.party(&recipient)?;
            let escrow =
                world
                    .ledger
                    .shared_create(sender, item.parse()?, exchange_key.parse()?, recipient)?;
            tracing::info!("Escrow {escrow} published for {}", world.name_of(recipient));
        }
        EscrowCmd::Swap {
            caller,
            escrow,
            key,
            lock,
        } => {
            let caller = world.party(&caller)?;
            let received =
                world
                    .ledger
                    .shared_swap(caller, escrow.parse()?, key.parse()?, lock.parse()?)?;
            tracing::info!("Swap complete: {} received {received}", world.name_of(caller));
        }
        EscrowCmd::Cancel { caller, escrow } => {
            let caller = world.party(&caller)?;
            let returned = world.ledger.shared_return_to_sender(caller, escrow.parse()?)?;
            tracing::info!("Escrow cancelled; {returned} returned to sender");
        }
    }
    Ok(())
}

fn run_custody(world: &mut World, cmd: CustodyCmd) -> anyhow::Result<()> {
    match cmd {
        CustodyCmd::Create {
            sender,
            key,
            lock,
            exchange_key,
            recipient,
            custodian,
        } => {
            let sender = world.party(&sender)?;
            let recipient = world.party(&recipient)?;
            let custodian = world.party(&custodian)?;
            let escrow = world.ledger.custodial_create(
                sender,
                key.parse()?,
                lock.parse()?,
                exchange_key.parse()?,
                recipient,
                custodian,
            )?;
            tracing::info!("Escrow {escrow} handed to {}", world.name_of(custodian));
        }
        CustodyCmd::Swap {
            custodian,
            first,
            second,
        } => {
            let custodian = world.party(&custodian)?;
            let (to_first, to_second) =
                world
                    .ledger
                    .custodial_swap(custodian, first.parse()?, second.parse()?)?;
            tracing::info!("Swap complete: released {to_first} and {to_second}");
        }
        CustodyCmd::Return { custodian, escrow } => {
            let custodian = world.party(&custodian)?;
            let returned = world
                .ledger
                .custodial_return_to_sender(custodian, escrow.parse()?)?;
            tracing::info!("Escrow resolved; {returned} returned to sender");
        }
    }
    Ok(())
}

fn show(world: &World) {
    for (id, record) in world.ledger.records() {
        let owner = match record.owner {
            Owner::Account(party) => world.name_of(party),
            Owner::Shared => "(shared)".to_string(),
        };
        match &record.body {
            Object::Asset(coin) => {
                println!("{id}  coin value={} owner={owner}", coin.value());
            }
            Object::Locked(locked) => {
                println!("{id}  locked-asset key={} owner={owner}", locked.key_id());
            }
            Object::Key(_) => {
                println!("{id}  key owner={owner}");
            }
            Object::SharedEscrow(escrow) => {
                println!(
                    "{id}  shared-escrow held={} wants={} sender={} recipient={}",
                    escrow.held().value(),
                    escrow.exchange_key(),
                    world.name_of(escrow.sender()),
                    world.name_of(escrow.recipient()),
                );
            }
            Object::CustodialEscrow(escrow) => {
                println!(
                    "{id}  custodial-escrow held={} wants={} sender={} recipient={} custodian={owner}",
                    escrow.held().value(),
                    escrow.exchange_key(),
                    world.name_of(escrow.sender()),
                    world.name_of(escrow.recipient()),
                );
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "swaplock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ledger snapshot file.
    #[arg(long,
        value_parser,
        default_value = SNAPSHOT_PATH,
        value_hint = ValueHint::FilePath)]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh ledger snapshot.
    Init {
        /// Seed phrase for deterministic identity minting.
        #[arg(short, long, default_value = "swaplock")]
        seed: String,
    },
    /// Mint a coin into a party's account.
    Deposit {
        #[arg(short, long)]
        owner: String,

        #[arg(short, long)]
        value: u64,
    },
    /// Lock an owned coin behind a fresh single-use key.
    Lock {
        #[arg(short, long)]
        owner: String,

        #[arg(short, long)]
        item: String,
    },
    /// Open an owned lock with its key.
    Unlock {
        #[arg(short, long)]
        owner: String,

        #[arg(short, long)]
        lock: String,

        #[arg(short, long)]
        key: String,
    },
    /// Hand an owned object to another party.
    Transfer {
        #[arg(short, long)]
        from: String,

        #[arg(short, long)]
        to: String,

        #[arg(short, long)]
        object: String,
    },
    /// Shared-custody escrow operations.
    #[command(subcommand)]
    Escrow(EscrowCmd),
    /// Custodian-mediated escrow operations.
    #[command(subcommand)]
    Custody(CustodyCmd),
    /// List every object on the ledger.
    Show,
    /// Print the emitted-event feed.
    Events {
        /// Dump the feed as JSON instead of text lines.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum EscrowCmd {
    /// Publish a commitment offering an owned coin for a specific key.
    Create {
        #[arg(short, long)]
        sender: String,

        #[arg(short, long)]
        item: String,

        #[arg(short, long)]
        exchange_key: String,

        #[arg(short, long)]
        recipient: String,
    },
    /// Resolve a commitment by presenting the committed lock and key.
    Swap {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        escrow: String,

        #[arg(short, long)]
        key: String,

        #[arg(short, long)]
        lock: String,
    },
    /// Cancel a commitment and reclaim the offered coin.
    Cancel {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        escrow: String,
    },
}

#[derive(Subcommand)]
enum CustodyCmd {
    /// Consume an owned lock/key pair and hand the asset to a custodian.
    Create {
        #[arg(short, long)]
        sender: String,

        #[arg(short, long)]
        key: String,

        #[arg(short, long)]
        lock: String,

        #[arg(short, long)]
        exchange_key: String,

        #[arg(short, long)]
        recipient: String,

        #[arg(short, long)]
        custodian: String,
    },
    /// Resolve two cross-matched commitments held by the custodian.
    Swap {
        #[arg(short, long)]
        custodian: String,

        #[arg(short, long)]
        first: String,

        #[arg(short, long)]
        second: String,
    },
    /// Return a commitment's asset to its original sender.
    Return {
        #[arg(short, long)]
        custodian: String,

        #[arg(short, long)]
        escrow: String,
    },
}
