//! storescope - Live TUI inspector for local record stores.
//!
//! Points at a data root holding one store per directory, polls the target
//! store, and renders its collections as tables with sorting and relation
//! highlighting.
//!
//! Usage:
//!   storescope                         # inspect ./data, default store
//!   storescope -d /var/lib/app/stores  # custom data root
//!   storescope -s my-db -i 1000        # custom store, 1s cadence
//!   storescope --demo                  # canned in-memory scenario

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::File;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use storescope::backend::{DirBackend, MemoryBackend, StoreBackend};
use storescope::sync::SyncEngine;
use storescope::transport::{ChannelTransport, LocalTransport};
use storescope::tui::App;
use storescope::view::{DEFAULT_STORE_NAME, StoreProfile, ViewState};

/// Live TUI inspector for local record stores.
#[derive(Parser)]
#[command(name = "storescope", about = "Local record store inspector", version)]
struct Args {
    /// Data root holding one directory per store.
    #[arg(short = 'd', long, default_value = "./data")]
    data_root: String,

    /// Name of the store to inspect.
    #[arg(short = 's', long, default_value = DEFAULT_STORE_NAME)]
    store: String,

    /// Polling cadence in milliseconds (clamped to 100..=10000).
    #[arg(short = 'i', long, default_value = "500")]
    interval_ms: u64,

    /// Where the sync loop runs relative to the view.
    #[arg(long, value_enum, default_value_t = Mode::Auto)]
    mode: Mode,

    /// Field linking child records to their parent, instead of the default.
    #[arg(long, value_name = "FIELD")]
    relation_field: Option<String>,

    /// Write logs to this file. Without it logging is off; stderr would
    /// corrupt the terminal UI.
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Serve a canned in-memory store instead of reading the data root.
    #[arg(long)]
    demo: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Probe for thread support; detached when available.
    Auto,
    /// Sync loop on its own thread, messages over the channel transport.
    Detached,
    /// Sync loop inside the UI loop, single-threaded.
    Inline,
}

fn init_logging(log_file: Option<&str>, verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("storescope={}", level).parse().unwrap());

    match log_file {
        Some(path) => {
            let file = match File::create(path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("Error opening log file '{}': {}", path, e);
                    std::process::exit(1);
                }
            };
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
}

/// Checks whether a second thread can actually be spawned. Restricted
/// environments fail this, in which case the loop runs inline.
fn threads_available() -> bool {
    thread::Builder::new()
        .name("probe".to_string())
        .spawn(|| {})
        .map(|handle| handle.join().is_ok())
        .unwrap_or(false)
}

fn main() {
    let args = Args::parse();

    init_logging(args.log_file.as_deref(), args.verbose);
    info!("storescope {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: store={}, root={}, interval={}ms",
        args.store, args.data_root, args.interval_ms
    );

    let backend: Box<dyn StoreBackend> = if args.demo {
        Box::new(MemoryBackend::construction_site())
    } else {
        Box::new(DirBackend::new(&args.data_root))
    };

    let mut profile = StoreProfile::default();
    if let Some(field) = &args.relation_field {
        profile = profile.with_relation_field(field);
    }
    let view = ViewState::new(&args.store, profile);

    let detached = match args.mode {
        Mode::Detached => true,
        Mode::Inline => false,
        Mode::Auto => threads_available(),
    };

    let app = if detached {
        info!("running detached: sync loop on its own thread");
        let (loop_end, view_end) = ChannelTransport::pair();
        let mut engine = SyncEngine::new(backend, Box::new(loop_end), &args.store, args.interval_ms);
        thread::spawn(move || {
            engine.startup(Instant::now());
            while !engine.is_disconnected() {
                engine.pump(Instant::now());
                thread::sleep(Duration::from_millis(50));
            }
        });
        App::detached(view, Box::new(view_end))
    } else {
        info!("running inline: sync loop inside the UI loop");
        let (loop_end, view_end) = LocalTransport::pair();
        let engine = SyncEngine::new(backend, Box::new(loop_end), &args.store, args.interval_ms);
        App::inline(view, Box::new(view_end), engine)
    };

    if let Err(e) = app.run() {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
