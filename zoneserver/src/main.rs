//! The zone server binary: loads configuration and the `scrty` table, boots
//! one `ZoneServerRuntime`, and drives it at the 100 ticks/sec cadence the
//! rest of the stack assumes (§5).

mod config;
mod runtime;
mod tilemap;

use clap::Parser;
use config::ZoneServerConfig;
use security::ScrtyTable;
use std::fs::File;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "zoneserver", about = "SubSpace-lineage zone server core")]
struct Cli {
    /// Path to the zone's TOML configuration file.
    #[arg(long, default_value = "zone.toml")]
    config: String,

    /// Path to the `scrty` seed-cycle table. Missing file degrades to a
    /// random-key/zero-checksum seed cycle (§7).
    #[arg(long, default_value = "scrty")]
    scrty: String,

    /// Raise the log level to trace.
    #[arg(short, long)]
    verbose: bool,

    /// Run a fixed number of ticks then exit, instead of running forever.
    #[arg(long)]
    ticks: Option<u64>,
}

fn load_scrty(path: &str, log: &slog::Logger) -> ScrtyTable {
    match File::open(path).and_then(ScrtyTable::load) {
        Ok(table) => table,
        Err(err) => {
            slog::warn!(log, "scrty table unavailable, degrading to random seed cycle"; "path" => path, "error" => %err);
            ScrtyTable::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let log = corelib::logging::init(cli.verbose);

    let config = if std::path::Path::new(&cli.config).exists() {
        ZoneServerConfig::load(&cli.config)
    } else {
        slog::warn!(log, "config file not found, using defaults"; "path" => &cli.config);
        ZoneServerConfig::default()
    };
    let scrty = load_scrty(&cli.scrty, &log);

    slog::info!(log, "zone server starting"; "arena" => &config.arena.name);
    let mut rt = runtime::ZoneServerRuntime::new(config, scrty, log.clone());

    const TICK_PERIOD: Duration = Duration::from_millis(10);
    let mut ticks_run: u64 = 0;
    loop {
        rt.tick();
        ticks_run += 1;
        if let Some(limit) = cli.ticks {
            if ticks_run >= limit {
                break;
            }
        }
        thread::sleep(TICK_PERIOD);
    }

    slog::info!(log, "zone server stopped"; "ticks" => ticks_run);
}
