//! `dscript` — validate a D-Script file and optionally simulate training it.
//!
//! Run with:
//!   cargo run --bin dscript -- my_network.ds --run --rounds 5
//! Pass `-` to read the script from stdin.

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_dscript::{
    extract_config, init_logging, run_simulation, validate, LogLevel, Rounds, SimulationConfig,
};

#[derive(Parser, Debug)]
#[command(version, about = "Validate and run D-Script network definitions")]
struct CliArgs {
    /// path to the script file, or `-` for stdin
    input: String,

    /// print results as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// simulate training the network after it validates
    #[arg(long)]
    run: bool,

    /// number of training rounds to simulate (1-5)
    #[arg(long, default_value_t = 3)]
    rounds: usize,

    /// seed for the simulation, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// multiplier on the nominal 10-50 s training time; 0 finishes instantly
    #[arg(long, default_value_t = 0.0)]
    time_scale: f64,

    /// level of logging details (into stderr)
    #[arg(short, long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.log_level);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(false)` when the script is invalid.
fn run(args: &CliArgs) -> ferrite_dscript::Result<bool> {
    let source = read_source(&args.input)?;
    let result = validate(&source);

    if !result.is_valid {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            for error in &result.errors {
                println!("{}", error);
            }
        }
        return Ok(false);
    }

    let config = extract_config(&source);

    if !args.run {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!("Script is valid.");
            println!("  network type   : {}", config.network_type.map(|k| k.token()).unwrap_or("-"));
            println!("  default layers : {}", config.default_layer_count);
            println!("  special layers : {}", config.special_layer_count);
            println!("  metrics key    : {}", config.metrics_key());
        }
        return Ok(true);
    }

    let rounds = Rounds::new(args.rounds)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sim = SimulationConfig::new(rounds, args.time_scale);
    let outcome = run_simulation(&config, &sim, &mut rng);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Trained {} for {}.", config.metrics_key(), rounds);
        for (round, value) in outcome.metrics.epochs.iter().zip(&outcome.metrics.values) {
            println!("  round {round}: {value:.1}%");
        }
        println!("Accuracy: {:.1}%", outcome.metrics.accuracy);
        println!("{}", outcome.metrics.verdict);
    }
    Ok(true)
}

fn read_source(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(strip_bom(buf))
    } else {
        std::fs::read_to_string(input).map(strip_bom)
    }
}

/// Drops a leading UTF-8 byte order mark so editors that write one do not
/// turn the first command into an unknown line.
fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_owned(),
        None => text,
    }
}
