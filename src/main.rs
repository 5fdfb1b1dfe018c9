use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_tournament::api::{build_router, state::AppState};
use swiss_tournament::config::AppConfig;
use swiss_tournament::models::{PlayerId, StandingsOrder};
use swiss_tournament::Tournament;

#[derive(Parser)]
#[command(name = "swiss-tournament")]
#[command(about = "Swiss-system tournament tracker: players, results, standings, pairings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new player
    Register {
        /// Player's full name (need not be unique)
        name: String,
    },

    /// Report a match result
    Report {
        /// Id of the player who won
        #[arg(long)]
        winner: PlayerId,

        /// Id of the player who lost
        #[arg(long)]
        loser: PlayerId,
    },

    /// Print the number of registered players
    Count,

    /// List registered players
    Players,

    /// List reported matches
    Matches,

    /// Print current standings
    Standings {
        /// Sort order by wins: "desc" (default) or "asc"
        #[arg(long)]
        order: Option<StandingsOrder>,
    },

    /// Print pairings for the next round
    Pairings {
        /// Standings order the pairings are drawn from
        #[arg(long)]
        order: Option<StandingsOrder>,
    },

    /// Delete all match records
    DeleteMatches,

    /// Delete all players (matches must be deleted first)
    DeletePlayers,

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = PathBuf::from(&cli.config);
    let mut config = if path.exists() {
        AppConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        AppConfig::default()
    };

    if let Some(ref data_dir) = cli.data_dir {
        config.data_dir = PathBuf::from(data_dir);
    }
    if let Some(ref log_level) = cli.log_level {
        config.log_level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(log_level: &str, json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_tracing(&config.log_level, cli.json_logs);
    tracing::debug!("Starting swiss-tournament v{}", env!("CARGO_PKG_VERSION"));

    let tournament = Tournament::new(config.open_store()).with_order(config.standings.order);

    match cli.command {
        Commands::Register { name } => {
            let id = tournament.register_player(&name)?;
            println!("Registered {} with id {}", name.trim(), id);
        }
        Commands::Report { winner, loser } => {
            tournament.report_match(winner, loser)?;
            println!("Recorded: {} beat {}", winner, loser);
        }
        Commands::Count => {
            println!("{}", tournament.count_players()?);
        }
        Commands::Players => {
            for player in tournament.players()? {
                println!("{:>5}  {}", player.id, player.name);
            }
        }
        Commands::Matches => {
            for record in tournament.matches()? {
                println!(
                    "{:>5} beat {:>5}  ({})",
                    record.winner,
                    record.loser(),
                    record.reported_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        Commands::Standings { order } => {
            let tournament = match order {
                Some(order) => tournament.with_order(order),
                None => tournament,
            };

            println!("{:>5}  {:<30} {:>5} {:>7}", "ID", "NAME", "WINS", "MATCHES");
            for entry in tournament.player_standings()? {
                println!(
                    "{:>5}  {:<30} {:>5} {:>7}",
                    entry.id, entry.name, entry.wins, entry.matches
                );
            }
        }
        Commands::Pairings { order } => {
            let tournament = match order {
                Some(order) => tournament.with_order(order),
                None => tournament,
            };

            for pairing in tournament.swiss_pairings()? {
                println!(
                    "{:>5} {:<30} vs {:>5} {}",
                    pairing.id1, pairing.name1, pairing.id2, pairing.name2
                );
            }
        }
        Commands::DeleteMatches => {
            tournament.delete_matches()?;
            println!("All matches deleted");
        }
        Commands::DeletePlayers => {
            tournament.delete_players()?;
            println!("All players deleted");
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState { tournament };
            let app = build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
