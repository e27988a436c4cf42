use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use settlers_sim::cli::{ConsoleReporter, ReportFormat, StatisticsAccumulator, Verbosity};
use settlers_sim::config::SimulationConfig;
use settlers_sim::game::{Game, GameError, Outcome};
use settlers_sim::players::RandomPolicy;
use settlers_sim::random::RngSource;
use settlers_sim::types::NUM_AGENTS;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser, Clone)]
#[command(name = "settlers-sim")]
#[command(about = "Simulate four random agents on the standard settlers board")]
struct Args {
    /// Config file with `turns:`, `vps_to_win:` and `seed:` lines
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total agent turns (clamped to 1..=8192); four turns make a round
    #[arg(long)]
    turns: Option<i64>,

    /// Random seed; game i of a batch uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Victory points needed to win
    #[arg(long)]
    vps_to_win: Option<u32>,

    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 1)]
    games: u32,

    /// Only print results
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,

    /// Also print every dice roll
    #[arg(short, long)]
    verbose: bool,

    /// Emit one JSON object per event
    #[arg(long)]
    json: bool,
}

impl Args {
    fn simulation_config(&self) -> SimulationConfig {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path),
            None => SimulationConfig::default(),
        };
        if let Some(turns) = self.turns {
            config = config.with_turns(turns);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(vps_to_win) = self.vps_to_win {
            config.vps_to_win = vps_to_win;
        }
        config
    }

    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn format(&self) -> ReportFormat {
        if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.simulation_config();
    let players = [RandomPolicy::default(); NUM_AGENTS];

    let result = if args.games <= 1 {
        run_single(&args, config, &players)
    } else {
        run_batch(&args, config, &players)
    };
    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run_single(
    args: &Args,
    config: SimulationConfig,
    players: &[RandomPolicy],
) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = ConsoleReporter::stdout(args.format(), args.verbosity());
    let mut game = Game::new(config.game_config(), RngSource::seeded(config.seed))?
        .with_sink(reporter);
    game.start_simulation(players)?;
    game.into_sink().finish()?;
    Ok(())
}

fn run_batch(
    args: &Args,
    config: SimulationConfig,
    players: &[RandomPolicy],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stats = StatisticsAccumulator::new();
    for game_idx in 0..args.games {
        let seed = config.seed.wrapping_add(u64::from(game_idx));
        let start = Instant::now();
        let outcome = play_silently(config, seed, players)?;
        let duration = start.elapsed();
        stats.after(&outcome, duration);

        if args.json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else if !args.quiet {
            let winner = outcome
                .winner
                .map(settlers_sim::cli::player_label)
                .unwrap_or_else(|| "None".to_string());
            println!(
                "Game {:>4}: Seed={}, Winner={:>8}, Rounds={:>4}, Duration={:?}",
                game_idx + 1,
                seed,
                winner,
                outcome.rounds_played,
                duration
            );
        }
    }

    if !args.json {
        print!("{}", stats.stats.render_summary());
    }
    Ok(())
}

fn play_silently(
    config: SimulationConfig,
    seed: u64,
    players: &[RandomPolicy],
) -> Result<Outcome, GameError> {
    let mut game_config = config.game_config();
    game_config.seed = seed;
    let mut game = Game::new(game_config, RngSource::seeded(seed))?;
    game.start_simulation(players)
}
