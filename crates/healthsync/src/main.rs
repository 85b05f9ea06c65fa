//! healthsync - local-first daily health record sync
//!
//! This is the main entry point for the healthsync tool.
//! It wires together all the components:
//! - Configuration loading
//! - Store initialization
//! - Sync engine
//! - Desktop host adapters (export provider, HTTP remote, connectivity probe)
//! - The daily word game

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use healthsync_api::SymptomOverrides;
use healthsync_config::{Settings, load_config_or_default};
use healthsync_core::SyncEngine;
use healthsync_host_api::{HealthProvider, RemoteSymptoms};
use healthsync_host_desktop::{HttpConnectivity, HttpSymptomsClient, JsonExportProvider, LogNotifier};
use healthsync_store::{KvStore, SqliteStore, SymptomCache};
use healthsync_util::{DATABASE_FILENAME, default_config_path, parse_day};
use healthsync_wordgame::{Game, GameStatus, LetterState, WORDS, daily_answer, playable};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// healthsync - Collect today's health metrics and sync them to the backend
#[derive(Parser, Debug)]
#[command(name = "healthsync")]
#[command(about = "Local-first daily health record sync", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/healthsync/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set HEALTHSYNC_DATA_DIR env var)
    #[arg(short, long, env = "HEALTHSYNC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one sync cycle for today
    Sync {
        /// Manually entered heart rate (bpm)
        #[arg(long)]
        pulse: Option<f64>,

        /// Manually entered step count
        #[arg(long)]
        steps: Option<u64>,

        /// Manually entered active calories (kcal)
        #[arg(long)]
        calories: Option<f64>,

        /// Manually entered sleep duration (hours)
        #[arg(long)]
        sleep_hours: Option<f64>,
    },

    /// Print the cached record for a day
    Show {
        /// Day to show, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List cache keys
    Keys,

    /// Play today's word game
    Word,
}

struct App {
    settings: Settings,
    store: Arc<dyn KvStore>,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let mut settings = load_config_or_default(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        if let Some(dir) = &args.data_dir {
            settings.storage.data_dir = dir.clone();
        }

        info!(
            config_path = %args.config.display(),
            remote = settings.remote.base_url.as_deref().unwrap_or("(none)"),
            "Configuration loaded"
        );

        let data_dir = &settings.storage.data_dir;
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = data_dir.join(DATABASE_FILENAME);
        let store: Arc<dyn KvStore> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        info!(db_path = %db_path.display(), "Store initialized");

        Ok(Self { settings, store })
    }

    fn cache(&self) -> SymptomCache {
        SymptomCache::new(self.store.clone(), self.settings.sync.cache_key_prefix.clone())
    }

    fn engine(&self) -> Result<SyncEngine> {
        let export_path = self
            .settings
            .health
            .export_path
            .clone()
            .unwrap_or_else(|| self.settings.storage.data_dir.join("health.json"));
        debug!(path = %export_path.display(), "Using health export");
        let provider: Arc<dyn HealthProvider> = Arc::new(JsonExportProvider::new(export_path));

        let connectivity = Arc::new(
            HttpConnectivity::new(&self.settings.connectivity)
                .context("Failed to create connectivity probe")?,
        );

        let engine = SyncEngine::new(
            &self.settings.sync,
            provider,
            self.store.clone(),
            connectivity,
            Arc::new(LogNotifier),
        );

        let remote = HttpSymptomsClient::from_settings(&self.settings.remote)
            .context("Failed to create remote client")?;
        Ok(match remote {
            Some(remote) => {
                let remote: Arc<dyn RemoteSymptoms> = Arc::new(remote);
                engine.with_remote(remote)
            }
            None => engine,
        })
    }
}

async fn run_sync(app: &App, overrides: SymptomOverrides) -> Result<()> {
    let engine = app.engine()?;
    let report = engine.sync(overrides).await.context("Sync cycle failed")?;

    println!("{}", serde_json::to_string_pretty(&report.symptoms)?);
    println!("outcome: {}", report.outcome);
    Ok(())
}

fn show(app: &App, date: Option<&str>) -> Result<()> {
    let day = match date {
        Some(s) => parse_day(s).with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", s))?,
        None => healthsync_util::today(),
    };

    match app.cache().read(day)? {
        Some(envelope) => println!("{}", serde_json::to_string_pretty(&envelope)?),
        None => println!("No cached record for {}", day),
    }
    Ok(())
}

fn keys(app: &App) -> Result<()> {
    for key in app.cache().list_keys()? {
        println!("{}", key);
    }
    Ok(())
}

fn render_row(word: &str, states: &[LetterState]) -> String {
    word.chars()
        .zip(states)
        .map(|(c, state)| match state {
            LetterState::Correct => format!("[{}]", c.to_ascii_uppercase()),
            LetterState::Present => format!("({})", c),
            LetterState::Absent => format!(" {} ", c),
        })
        .collect()
}

fn play_word_game(day: NaiveDate) -> Result<()> {
    let words = playable(WORDS);
    let Some(answer) = daily_answer(day, &words) else {
        bail!("Word list is empty");
    };
    let mut game = Game::new(answer).with_dictionary(&words);

    println!("Guess the five-letter word. [X] right spot, (x) wrong spot.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    while game.status() == GameStatus::InProgress {
        print!("{} left> ", game.remaining_guesses());
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match game.guess(line?.trim()) {
            Ok(row) => println!("{}", render_row(&row.word, &row.states)),
            Err(e) => println!("{}", e),
        }
    }

    match game.status() {
        GameStatus::Won => println!("Solved in {}!", game.guesses().len()),
        GameStatus::Lost => println!("The word was {}", game.reveal().unwrap_or_default()),
        GameStatus::InProgress => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "healthsync starting");

    match &args.command {
        Command::Sync {
            pulse,
            steps,
            calories,
            sleep_hours,
        } => {
            let mut overrides = SymptomOverrides::default();
            if let Some(v) = pulse {
                overrides = overrides.with_pulse(*v);
            }
            if let Some(v) = steps {
                overrides = overrides.with_steps(*v);
            }
            if let Some(v) = calories {
                overrides = overrides.with_active_calories(*v);
            }
            if let Some(v) = sleep_hours {
                overrides = overrides.with_sleep_hours(*v);
            }
            run_sync(&App::new(&args)?, overrides).await
        }
        Command::Show { date } => show(&App::new(&args)?, date.as_deref()),
        Command::Keys => keys(&App::new(&args)?),
        Command::Word => play_word_game(healthsync_util::today()),
    }
}
