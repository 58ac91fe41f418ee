//! Replay a captured meta-state action log and print the resulting state.

mod replay;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use widgetmeta_core::MetaStore;

use replay::{load_input, replay, store_config, write_state, ReplayError, ReplayOptions};

#[derive(Parser)]
#[command(name = "widgetmeta-replay", version, about = "Replay a widget meta-state action log")]
struct Cli {
    /// Action log, JSON lines or a JSON array (stdin when omitted)
    input: Option<PathBuf>,
    /// Print the state after every action and log each transition
    #[arg(long)]
    trace: bool,
    /// Abort on the first malformed action instead of skipping it
    #[arg(long)]
    strict: bool,
    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("widgetmeta-replay: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ReplayError> {
    let text = load_input(cli.input.as_deref())?;
    log::info!(
        "Replaying {}",
        cli.input
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdin".to_string())
    );

    let mut store = MetaStore::with_config(store_config(cli.trace));
    let options = ReplayOptions {
        strict: cli.strict,
        trace: cli.trace,
        compact: cli.compact,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = replay(&text, &mut store, &options, &mut out)?;

    write_state(store.state(), options.compact, &mut out)?;
    out.flush()?;

    log::info!(
        "Applied {}, ignored {}, skipped {} actions; {} widgets in final state",
        summary.applied,
        summary.ignored,
        summary.skipped,
        store.state().len()
    );
    Ok(())
}
