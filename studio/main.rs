/// ferrite-dscript Studio
///
/// Browser front end for the D-Script playground.
/// Served by a synchronous tiny_http server; no JavaScript frameworks required.
///
/// Run with:
///   cargo run --bin studio --release
/// Then open http://127.0.0.1:7878
///
/// Tabs:
///   1. Editor  — write D-Script, see per-line errors, run the simulation
///   2. Builder — click a network together layer by layer and train it

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::sync::{Arc, Mutex};

use clap::Parser;
use tiny_http::Server;

use ferrite_dscript::{init_logging, LogLevel};

use state::StudioState;

#[derive(Parser, Debug)]
#[command(version, about = "D-Script studio web server")]
struct StudioArgs {
    /// address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1:7878")]
    addr: String,

    /// multiplier on the nominal 10-50 s simulated training time
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// level of logging details (into stderr)
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn main() {
    let args = StudioArgs::parse();
    init_logging(args.log_level);

    let server = match Server::http(&args.addr) {
        Ok(server) => server,
        Err(e) => {
            log::error!("failed to bind HTTP server on {}: {}", args.addr, e);
            std::process::exit(1);
        }
    };

    let shared_state = Arc::new(Mutex::new(StudioState::new(args.time_scale)));

    println!("╔══════════════════════════════════════════════╗");
    println!("║          ferrite-dscript Studio              ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Open in your browser:                       ║");
    println!("║  http://{:<37}║", args.addr);
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Tabs: Editor > Builder                      ║");
    println!("╚══════════════════════════════════════════════╝");
    log::info!("simulated training time scale: {}", args.time_scale);

    // Each request is dispatched on its own thread so the SSE handler
    // (which blocks for the entire simulated run) does not stall
    // regular page loads and form submissions.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
