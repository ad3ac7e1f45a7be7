use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use sweeper_client::{ClientConfig, HttpMoveProvider, MoveClient, MoveError, SharedSession, shared};
use sweeper_core::{ActionOutcome, ClickOutcome, Coord, Coord2, GameSession};
use sweeper_protocol::Strategy;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Move-provider root, overrides the settings file
    #[arg(long)]
    url: Option<String>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play in the terminal, asking the agent for moves on demand (default)
    Play {
        /// Strategy used by `a` when none is given
        #[arg(long)]
        strategy: Option<Strategy>,
    },
    /// Ask the provider to train its reinforcement-learning agent
    Train,
    /// Check that the provider is up
    Ping,
}

type Client = Arc<MoveClient<HttpMoveProvider>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = args.verbose.log_level_filter().to_string().to_lowercase();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = args.url {
        config.base_url = url;
    }
    log::debug!("config: {:?}", config);

    let client = Arc::new(MoveClient::new(
        HttpMoveProvider::new(config.clone()).context("Failed to build HTTP client")?,
    ));

    match args.command.unwrap_or(Command::Play { strategy: None }) {
        Command::Ping => {
            println!("{}", client.ping().await?);
        }
        Command::Train => {
            println!("{}", client.train().await?);
        }
        Command::Play { strategy } => {
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            let seed = args.seed.unwrap_or_else(|| rand::rng().random());
            log::debug!("seed: {}", seed);
            play(client, config, seed).await?;
        }
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Input {
    Reveal(Coord2),
    Flag(Coord2),
    Agent(Option<Strategy>),
    Train,
    NewGame,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err("empty command".to_string());
    };

    let input = match command {
        "r" | "c" => Input::Reveal(parse_coords(&mut words)?),
        "f" => Input::Flag(parse_coords(&mut words)?),
        "a" => Input::Agent(words.next().map(str::parse::<Strategy>).transpose()?),
        "t" => Input::Train,
        "n" => Input::NewGame,
        "h" | "?" => Input::Help,
        "q" => Input::Quit,
        other => return Err(format!("unknown command `{}`", other)),
    };
    Ok(input)
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2, String> {
    let mut next = || -> Result<Coord, String> {
        let word = words.next().ok_or_else(|| "expected ROW COL".to_string())?;
        word.parse()
            .map_err(|err| format!("bad coordinate `{}`: {}", word, err))
    };
    Ok((next()?, next()?))
}

const HELP: &str = "\
r ROW COL   reveal a cell
f ROW COL   toggle a flag
a [STRAT]   ask the agent for a move (basic, probability, rl)
t           train the agent
n           new game
q           quit";

async fn play(client: Client, config: ClientConfig, seed: u64) -> Result<()> {
    let session = shared(GameSession::new(config.game, seed));
    let reset_delay = Duration::from_millis(config.reset_delay_ms);

    println!("{}", HELP);
    print_session(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        match input {
            Input::Reveal(coords) => {
                let (outcome, generation) = {
                    let mut session = session.lock();
                    (session.click(coords), session.generation())
                };
                match outcome {
                    Ok(outcome) if outcome.needs_reset() => {
                        schedule_reset(&session, generation, reset_delay);
                    }
                    Ok(outcome) if !outcome.has_update() => continue,
                    Ok(_) => {}
                    Err(err) => {
                        println!("{}", err);
                        continue;
                    }
                }
            }
            Input::Flag(coords) => {
                let outcome = session.lock().flag(coords);
                match outcome {
                    Ok(outcome) if !outcome.has_update() => continue,
                    Ok(_) => {}
                    Err(err) => {
                        println!("{}", err);
                        continue;
                    }
                }
            }
            Input::Agent(strategy) => {
                spawn_agent_move(&client, &session, strategy.unwrap_or(config.strategy), reset_delay);
                continue;
            }
            Input::Train => {
                let client = client.clone();
                tokio::spawn(async move {
                    match client.train().await {
                        Ok(message) => println!("{}", message),
                        Err(err) => println!("Training failed: {}", err),
                    }
                });
                continue;
            }
            Input::NewGame => session.lock().reset(),
            Input::Help => {
                println!("{}", HELP);
                continue;
            }
            Input::Quit => break,
        }
        print_session(&session);
    }

    Ok(())
}

/// Runs the agent in the background so the board stays playable while it thinks.
fn spawn_agent_move(client: &Client, session: &SharedSession, strategy: Strategy, reset_delay: Duration) {
    let client = client.clone();
    let session = session.clone();
    tokio::spawn(async move {
        match client.request_move(&session, strategy).await {
            Ok(applied) => {
                println!(
                    "Agent ({}) {:?} {:?}",
                    strategy, applied.action.kind, applied.action.coords
                );
                if let ActionOutcome::Click(ClickOutcome::MineHit) = applied.outcome {
                    schedule_reset(&session, applied.generation, reset_delay);
                }
                print_session(&session);
            }
            Err(MoveError::Stale { .. }) => {}
            Err(err) => println!("Agent move failed: {}", err),
        }
    });
}

/// Clears a lost board after `delay`, unless the player already moved on.
fn schedule_reset(session: &SharedSession, generation: u64, delay: Duration) {
    let session = session.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let mut session = session.lock();
        if session.generation() == generation {
            session.reset();
            println!("{}", session);
        }
    });
}

fn print_session(session: &SharedSession) {
    let session = session.lock();
    println!("{}", session);
    println!(
        "game {} | {:?} | mines left: {}",
        session.generation(),
        session.phase(),
        session.mines_left()
    );
}
