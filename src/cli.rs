//! CLI argument parsing using clap.

use clap::Parser;

/// ifscout: local network interface enumeration
///
/// Takes a one-shot snapshot of the active local network interfaces
/// (address, netmask, broadcast, name) and prints one line per interface.
#[derive(Debug, Parser)]
#[command(name = "ifscout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print the snapshot as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Parses arguments from the process command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_off() {
        let cli = Cli::try_parse_from(["ifscout"]).unwrap();
        assert!(!cli.json);
        assert!(!cli.verbose);
    }

    #[test]
    fn json_and_verbose_flags_parse() {
        let cli = Cli::try_parse_from(["ifscout", "--json", "-v"]).unwrap();
        assert!(cli.json);
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["ifscout", "--watch"]).is_err());
    }
}
