//! ifscout: local network interface enumeration.
//!
//! Entry point for the ifscout binary.

use std::process::ExitCode;

use ifscout::enumerate;

mod app;
mod cli;

use app::setup_tracing;
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    let interfaces = enumerate();

    if cli.json {
        return print_json(&interfaces);
    }

    // An empty result is "nothing discoverable right now", not a failure.
    if interfaces.is_empty() {
        println!("no interfaces currently discoverable");
    }
    for iface in &interfaces {
        println!("{iface}");
    }

    ExitCode::SUCCESS
}

fn print_json(interfaces: &[ifscout::InterfaceSnapshot]) -> ExitCode {
    match serde_json::to_string_pretty(interfaces) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
