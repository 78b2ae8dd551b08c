//! Main application entry point (native).

#[cfg(feature = "native")]
use clap::Parser;
#[cfg(feature = "native")]
use std::path::PathBuf;

/// Replay a scripted input sequence through a wheel selector.
#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(name = "drumroll")]
#[command(about = "Replay scripted input through a momentum wheel selector", long_about = None)]
#[command(version)]
struct Args {
    /// Path to an app config JSON file; the built-in demo runs without one
    config: Option<PathBuf>,
}

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "native")]
fn run(args: Args) -> drumroll_app::AppResult<()> {
    use drumroll_app::{AppConfig, Demo};

    let config = match args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            AppConfig::load(&path)?
        }
        None => AppConfig::default(),
    };
    log::info!("Starting {}", config.title);

    let mut demo = Demo::new(&config)?;
    let report = demo.run(&config.script);
    demo.shutdown();

    for (label, index) in &report.changes {
        println!("  -> {label} ({index})");
    }
    println!(
        "{}: selected {} (index {}) after {} frames / {:.0}ms",
        config.title, report.selected_label, report.selected_index, report.frames, report.elapsed_ms
    );
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
