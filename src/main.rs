use clap::{Args, Parser, Subcommand};
use log::{debug, error, info};
use rand::{rngs::StdRng, SeedableRng};

use secret_santa::{
    draw::{self, DrawOptions},
    error::Result,
    logging::{self, LOG_CONFIG_PATH},
    model::{common::Cycle, db::AccountCore},
    pairing::{Participant, PriorAssignment},
    store::{AssignmentLookup, HistorySource, MongoStore, WriteMode},
    Config,
};

/// Draw Secret Santa pairs, keeping a history so nobody gets the same
/// person two years running.
///
/// Configuration is read from `SecretSanta.toml` (or `$SECRET_SANTA_CONFIG`)
/// and `SECRET_SANTA_*` environment variables.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage the accounts that take part.
    #[command(subcommand)]
    Participants(ParticipantsCommand),
    /// Draw the pairs for a cycle and store them.
    Draw(DrawArgs),
    /// Store the pairs of a cycle drawn without this tool.
    Record {
        #[arg(long)]
        cycle: Cycle,
        /// Pairs as `GIVER=RECEIVER`.
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
        /// Replace the pairs already stored for the cycle.
        #[arg(long)]
        replace: bool,
    },
    /// List all pairs of a cycle.
    Show {
        /// Defaults to the current year.
        #[arg(long)]
        cycle: Option<Cycle>,
    },
    /// Print who a participant gives to, or `?` if nobody.
    Receiver {
        name: String,
        /// Defaults to the current year.
        #[arg(long)]
        cycle: Option<Cycle>,
    },
}

#[derive(Debug, Subcommand)]
enum ParticipantsCommand {
    /// List all accounts.
    List,
    /// Add accounts.
    Add {
        #[arg(required = true)]
        names: Vec<String>,
        /// Administrators are never part of a draw.
        #[arg(long)]
        admin: bool,
    },
    /// Remove an account. Pairs already drawn for it are kept.
    Remove { name: String },
}

#[derive(Debug, Args)]
struct DrawArgs {
    /// Defaults to the current year.
    #[arg(long)]
    cycle: Option<Cycle>,
    /// Allow repeating last cycle's pairs.
    #[arg(long)]
    allow_repeat: bool,
    /// Allow two participants to give to each other.
    #[arg(long)]
    allow_mutual: bool,
    /// Give up after this many shuffles.
    #[arg(long)]
    max_attempts: Option<u32>,
    /// Seed the shuffle, for a reproducible draw.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the pairs without storing them.
    #[arg(long)]
    dry_run: bool,
    /// Replace the pairs already stored for the cycle.
    #[arg(long)]
    redraw: bool,
}

impl DrawArgs {
    /// Command-line flags take precedence over configured rules.
    fn options(&self, config: &Config) -> DrawOptions {
        let mut rules = config.rules();
        rules.allow_repeat_of_prior_pairing |= self.allow_repeat;
        rules.allow_mutual_pairing |= self.allow_mutual;
        if let Some(max_attempts) = self.max_attempts {
            rules.max_attempts = max_attempts;
        }
        DrawOptions {
            mode: write_mode(self.redraw),
            dry_run: self.dry_run,
            ..DrawOptions::new(self.cycle.unwrap_or_else(Cycle::current), rules)
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn write_mode(replace: bool) -> WriteMode {
    if replace {
        WriteMode::Replace
    } else {
        WriteMode::RejectExisting
    }
}

/// Parse a `GIVER=RECEIVER` argument.
fn parse_pair(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((giver, receiver)) if !giver.trim().is_empty() && !receiver.trim().is_empty() => {
            Ok((giver.trim().to_string(), receiver.trim().to_string()))
        }
        _ => Err(format!("expected GIVER=RECEIVER, got \"{arg}\"")),
    }
}

async fn run(command: Command) -> Result<()> {
    let config = Config::load()?;
    let store = MongoStore::connect(&config).await?;

    match command {
        Command::Participants(ParticipantsCommand::List) => {
            for account in store.accounts().await? {
                debug!("Account {} has ID {}", account.name, account.id);
                if account.admin {
                    println!("{} (admin)", account.name);
                } else {
                    println!("{}", account.name);
                }
            }
        }
        Command::Participants(ParticipantsCommand::Add { names, admin }) => {
            for name in names {
                let account = if admin {
                    AccountCore::admin(name)
                } else {
                    AccountCore::participant(name)
                };
                info!("Adding account {}", account.name);
                store.add_account(account).await?;
            }
        }
        Command::Participants(ParticipantsCommand::Remove { name }) => {
            store.remove_account(&Participant::from(name)).await?;
        }
        Command::Draw(args) => {
            let options = args.options(&config);
            let assignment =
                draw::draw_cycle(&store, config.exclusions(), &options, &mut args.rng()).await?;
            print!("{assignment}");
        }
        Command::Record {
            cycle,
            pairs,
            replace,
        } => {
            let pairs: PriorAssignment = pairs
                .into_iter()
                .map(|(giver, receiver)| (giver.into(), receiver.into()))
                .collect();
            draw::record_cycle(
                &store,
                config.exclusions(),
                cycle,
                pairs,
                write_mode(replace),
            )
            .await?;
        }
        Command::Show { cycle } => {
            let cycle = cycle.unwrap_or_else(Cycle::current);
            let pairs = store.get_assignment(cycle).await?;
            if pairs.is_empty() {
                info!("No pairs stored for {cycle}");
            }
            for (giver, receiver) in pairs {
                println!("{giver} -> {receiver}");
            }
        }
        Command::Receiver { name, cycle } => {
            let cycle = cycle.unwrap_or_else(Cycle::current);
            let receiver = store.get_receiver(&Participant::from(name), cycle).await?;
            println!("{receiver}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging.
    if let Err(err) = logging::init(LOG_CONFIG_PATH, cli.verbose) {
        eprintln!("{err}");
        std::process::exit(1)
    }

    if let Err(err) = run(cli.command).await {
        error!("{err}");
        std::process::exit(1)
    }
}
