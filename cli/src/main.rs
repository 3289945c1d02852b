use std::fs;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sweeper_core::{CellCount, Coord, Game, GameConfig};
use tracing_subscriber::filter::LevelFilter;

mod play;

#[derive(Parser, Debug)]
#[command(name = "sweeper", about = "Clear the field without stepping on a mine", version)]
struct Args {
    /// TOML file with a `[field]` table and an optional `seed`
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Field width, overrides the config file
    #[arg(long)]
    width: Option<Coord>,
    /// Field height, overrides the config file
    #[arg(long)]
    height: Option<Coord>,
    /// Number of mines, overrides the config file
    #[arg(long)]
    mines: Option<CellCount>,
    /// Seed for reproducible mine placement
    #[arg(long)]
    seed: Option<u64>,
    /// Resume a saved game instead of starting a new one
    #[arg(long, value_name = "FILE", conflicts_with_all = ["config", "width", "height", "mines", "seed"])]
    load: Option<PathBuf>,
    /// Where `save` writes when no path is given
    #[arg(long, value_name = "FILE", default_value = "sweeper-save.json")]
    save: PathBuf,
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

impl Args {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("could not read config {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("could not parse config {}", path.display()))?
            }
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.field.width = width;
        }
        if let Some(height) = self.height {
            config.field.height = height;
        }
        if let Some(mines) = self.mines {
            config.field.mine_count = mines;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }

    fn start_game(&self) -> anyhow::Result<Game> {
        if let Some(path) = &self.load {
            let file = fs::File::open(path)
                .with_context(|| format!("could not open saved game {}", path.display()))?;
            let game = Game::restore(BufReader::new(file))
                .with_context(|| format!("could not restore saved game {}", path.display()))?;
            log::info!("Resumed game from {}", path.display());
            return Ok(game);
        }

        let config = self.game_config()?;
        log::info!(
            "New {}x{} game with {} mines",
            config.field.width,
            config.field.height,
            config.field.mine_count
        );
        Game::new(&config).context("could not start a new game")
    }
}

fn level_filter(filter: log::LevelFilter) -> LevelFilter {
    match filter {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(level_filter(args.verbosity.log_level_filter()))
        .with_writer(io::stderr)
        .init();

    let mut game = args.start_game()?;
    play::run(&mut game, io::stdin().lock(), io::stdout().lock(), &args.save)
}
