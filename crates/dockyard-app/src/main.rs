// Dockyard headless driver.
// Builds a panel tree from a scenario file, replays pointer, drag and tab
// steps against it, then prints the resulting layout.

mod report;
mod scenario;
mod settings;

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;

use report::SignalCounts;
use scenario::ScenarioError;
use settings::DockyardSettings;

/// Replay a panel layout scenario
#[derive(Parser, Debug)]
#[command(name = "dockyard", version, about = "Replay a panel layout scenario")]
struct CliArgs {
    /// Scenario JSON file
    #[arg(value_name = "SCENARIO", required_unless_present = "init_settings")]
    scenario: Option<PathBuf>,

    /// Print the tree after every step
    #[arg(long)]
    trace: bool,

    /// Read settings from this file instead of the config dir
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Write the effective settings to the config dir if none exist yet
    #[arg(long)]
    init_settings: bool,
}

// ──────────────────────────────────────────────
// Entry point
// ──────────────────────────────────────────────

fn main() -> ExitCode {
    env_logger::init();

    let args = CliArgs::parse();
    let settings = match &args.settings {
        Some(path) => settings::load_settings_from(path),
        None => settings::load_settings(),
    };

    if args.init_settings {
        init_settings(&settings);
    }

    let Some(path) = &args.scenario else {
        return ExitCode::SUCCESS;
    };
    match run(path, args.trace, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Scenario {} failed: {}", path.display(), e);
            eprintln!("dockyard: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_settings(settings: &DockyardSettings) {
    match settings::settings_path() {
        Some(path) if path.exists() => {
            log::info!("Settings already exist at {}", path.display());
        }
        Some(path) => {
            settings::save_settings_to(&path, settings);
            println!("wrote {}", path.display());
        }
        None => log::warn!("Cannot determine settings path"),
    }
}

fn run(path: &std::path::Path, trace: bool, settings: &DockyardSettings) -> Result<(), ScenarioError> {
    let scenario = scenario::load_scenario(path)?;
    let mut ws = scenario.workspace(settings.layout.clone())?;
    log::debug!("loaded {} steps from {}", scenario.steps.len(), path.display());

    let counts = Rc::new(RefCell::new(SignalCounts::default()));
    let sink = Rc::clone(&counts);
    ws.subscribe(move |signal| sink.borrow_mut().record(signal));

    if trace {
        print!("{}", report::render(&ws, &settings.report));
    }
    for (i, step) in scenario.steps.iter().enumerate() {
        let outcome = scenario::run_step(&mut ws, step);
        println!("step {}: {:?} -> {}", i + 1, step, outcome);
        if trace {
            print!("{}", report::render(&ws, &settings.report));
        }
    }

    println!();
    print!("{}", report::render(&ws, &settings.report));
    let counts = *counts.borrow();
    let bus = ws.bus();
    println!(
        "signals: layout={} resize={} suppressed={}",
        counts.layout,
        counts.resize,
        bus.suppressed()
    );

    ws.check_invariants()?;
    Ok(())
}
