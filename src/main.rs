//! Simulator entry point: CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use hess_sim::config::ScenarioConfig;
use hess_sim::io::export::{CsvSink, DataSink, NullSink};
use hess_sim::sim::engine::Engine;
use hess_sim::sim::report::RunReport;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    export_out: Option<String>,
    verbose: bool,
}

fn print_help() {
    eprintln!("hess-sim — hydrogen-based hybrid energy-storage simulator");
    eprintln!();
    eprintln!("Usage: hess-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (baseline)");
    eprintln!("  --seed <u64>        Override random seed");
    eprintln!("  --export <path>     Export per-step state records to CSV");
    eprintln!("  --verbose           Print every step record");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        export_out: None,
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                let value = args.get(i).and_then(|s| s.parse().ok());
                match value {
                    Some(seed) => cli.seed_override = Some(seed),
                    None => {
                        eprintln!("error: --seed requires an unsigned integer argument");
                        process::exit(1);
                    }
                }
            }
            "--export" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --export requires a path argument");
                    process::exit(1);
                }
                cli.export_out = Some(args[i].clone());
            }
            "--verbose" => {
                cli.verbose = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }
    cli
}

fn load_scenario(cli: &CliArgs) -> ScenarioConfig {
    let result = match (&cli.scenario_path, &cli.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(Path::new(path)),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => Ok(ScenarioConfig::baseline()),
    };
    match result {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = parse_args();
    let mut scenario = load_scenario(&cli);
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        eprintln!("invalid scenario configuration:");
        for e in &errors {
            eprintln!("  {e}");
        }
        process::exit(1);
    }

    let sink: Box<dyn DataSink> = match &cli.export_out {
        Some(path) => match CsvSink::to_path(Path::new(path)) {
            Ok(sink) => Box::new(sink),
            Err(e) => {
                eprintln!("error: cannot create \"{path}\": {e}");
                process::exit(1);
            }
        },
        None => Box::new(NullSink),
    };

    let mut engine = match Engine::from_scenario(&scenario, sink) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    println!(
        "Simulating {} steps of {:.0} s with strategy {}",
        engine.config().steps,
        engine.config().timestep_s,
        engine.strategy_name(),
    );

    let results = engine.run();
    if cli.verbose {
        for r in &results {
            println!("{r}");
        }
    }

    let report = RunReport::from_results(&results, engine.config().timestep_s);
    println!("{report}");
}
