// Devrs CLI
// Device identification from the command line, with a simulator-style watch mode

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use devrs_core::config::Config;
use devrs_core::{
    DeviceLookup, DeviceTable, EnvModelProvider, FileModelProvider, FixedModelProvider,
    FsTableSource, ModelProvider,
};

/// Polling interval used when neither the CLI nor the config names one.
const DEFAULT_INTERVAL_MS: u64 = 500;

/// Device identification from a CSV lookup table
#[derive(Parser, Debug)]
#[command(name = "devrs")]
#[command(author = "devrs contributors")]
#[command(version = "0.1.0")]
#[command(about = "Map a hardware model identifier to a device name and notch height", long_about = None)]
struct Args {
    /// Device table CSV file
    #[arg(short, long, value_name = "TABLE")]
    table: Option<PathBuf>,

    /// Model identifier to look up (overrides the ambient provider)
    #[arg(short, long, value_name = "MODEL")]
    model: Option<String>,

    /// File to read the model identifier from, re-read on every tick
    #[arg(long, value_name = "FILE")]
    model_file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Poll for model changes and reload on transitions
    #[arg(short, long)]
    watch: bool,

    /// Polling interval for --watch, in milliseconds (10-10000)
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Validate the table and exit
    #[arg(long)]
    check_table: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Main application state
struct Application {
    args: Args,
    config: Config,
    table_path: PathBuf,
    /// Flag to signal the watch loop to stop
    running: Arc<AtomicBool>,
}

impl Application {
    fn new(args: Args, config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        // Resolve table path precedence: CLI --table > config [table].path.
        let table_path = args
            .table
            .clone()
            .or_else(|| config.table_path().map(PathBuf::from))
            .ok_or_else(|| {
                Box::<dyn std::error::Error>::from(
                    "no device table; pass --table or set [table].path in the config",
                )
            })?;

        Ok(Self {
            args,
            config,
            table_path,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Resolve the model provider with precedence:
    /// CLI --model-file > CLI --model > config [device].model > environment.
    fn model_provider(&self) -> Box<dyn ModelProvider> {
        if let Some(path) = &self.args.model_file {
            return Box::new(FileModelProvider::new(path));
        }
        if let Some(model) = &self.args.model {
            return Box::new(FixedModelProvider::new(model.clone()));
        }
        if let Some(model) = self.config.model_override() {
            return Box::new(FixedModelProvider::new(model));
        }
        Box::new(EnvModelProvider::default())
    }

    fn lookup(&self) -> DeviceLookup {
        DeviceLookup::new(
            self.model_provider(),
            Box::new(FsTableSource::new(&self.table_path)),
        )
    }

    fn interval(&self) -> Result<Duration, Box<dyn std::error::Error>> {
        let ms = self
            .args
            .interval_ms
            .or_else(|| self.config.poll_interval_ms())
            .unwrap_or(DEFAULT_INTERVAL_MS);
        if !(10..=10_000).contains(&ms) {
            return Err(format!("--interval-ms must be 10-10000ms, got {}", ms).into());
        }
        Ok(Duration::from_millis(ms))
    }

    /// Validate the table file and print a summary
    fn check_table(&self) -> Result<(), Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(&self.table_path)?;
        let table = DeviceTable::parse(&raw);

        let identifiers: usize = table
            .rows()
            .iter()
            .map(|row| row.model_identifiers.len())
            .sum();

        println!("Table: {}", self.table_path.display());
        println!("  rows: {}", table.len());
        println!("  model identifiers: {}", identifiers);
        println!("  skipped lines: {}", table.skipped_lines());

        if table.is_empty() {
            return Err("table has no usable rows".into());
        }
        Ok(())
    }

    fn print_status(lookup: &DeviceLookup) {
        println!("Model: {}", lookup.last_model().unwrap_or(""));
        if lookup.is_supported() {
            println!("Device: {}", lookup.device_name());
            println!("Notch height: {}", lookup.notch_height());
        } else {
            println!("Device: (unsupported)");
            println!("Notch height: 0");
        }
    }

    /// One-shot lookup
    fn run_once(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut lookup = self.lookup();
        lookup.refresh_if_changed()?;
        Self::print_status(&lookup);
        Ok(())
    }

    /// Poll the model provider and reload on transitions
    fn run_watch(&self) -> Result<(), Box<dyn std::error::Error>> {
        let interval = self.interval()?;
        let mut lookup = self.lookup();

        // Signal handler for graceful shutdown
        {
            use signal_hook::iterator::Signals;
            let running = self.running.clone();

            std::thread::spawn(move || {
                if let Ok(mut signals) =
                    Signals::new([signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM])
                {
                    for signal in &mut signals {
                        match signal {
                            signal_hook::consts::SIGINT | signal_hook::consts::SIGTERM => {
                                println!("\nReceived signal, shutting down...");
                                running.store(false, Ordering::SeqCst);
                                break;
                            }
                            _ => {}
                        }
                    }
                }
            });
        }

        println!(
            "devrs is watching for model changes (every {}ms). Press Ctrl+C to exit.",
            interval.as_millis()
        );

        while self.running.load(Ordering::SeqCst) {
            match lookup.refresh_if_changed() {
                Ok(true) => Self::print_status(&lookup),
                Ok(false) => {}
                // A failed load is non-fatal; the next tick tries again
                // once the model changes.
                Err(e) => log::warn!("reload failed: {}", e),
            }
            std::thread::sleep(interval);
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if args.verbose { "debug" } else { "warn" },
    ))
    .init();

    // Config file precedence: CLI --config > default location > empty.
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default()?,
    };

    let app = Application::new(args, config)?;

    if app.args.check_table {
        return app.check_table();
    }

    if app.args.watch {
        return app.run_watch();
    }

    app.run_once()
}
