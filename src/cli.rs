//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "ipjournal")]
#[command(author, version, about = "Count IPv4 addresses in a log file by subnet and time window")]
pub struct Cli {
    /// Log file to read
    #[arg(long, value_name = "PATH")]
    pub file_log: Option<PathBuf>,

    /// File to write "<address>: <count>" lines to
    #[arg(long, value_name = "PATH")]
    pub file_output: Option<PathBuf>,

    /// Start address of the subnet filter (e.g. 192.168.1.0)
    #[arg(long, value_name = "IPV4")]
    pub address_start: Option<String>,

    /// Subnet mask length, 1-32 (used with --address-start)
    #[arg(long, value_name = "BITS")]
    pub address_mask: Option<String>,

    /// Lower time bound, inclusive (dd.MM.yyyy or "dd.MM.yyyy HH:mm:ss")
    #[arg(long, value_name = "TIME")]
    pub time_start: Option<String>,

    /// Upper time bound, inclusive (dd.MM.yyyy or "dd.MM.yyyy HH:mm:ss")
    #[arg(long, value_name = "TIME")]
    pub time_end: Option<String>,

    /// Config file path [default: ipjournal.yaml, if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug output, including every dropped line)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Values given on the command line, as a config layer.
    pub fn overrides(&self) -> Config {
        Config {
            file_log: self.file_log.clone(),
            file_output: self.file_output.clone(),
            address_start: self.address_start.clone(),
            address_mask: self.address_mask.clone(),
            time_start: self.time_start.clone(),
            time_end: self.time_end.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_all_options() {
        let cli = Cli::try_parse_from([
            "ipjournal",
            "--file-log",
            "access.log",
            "--file-output",
            "out.txt",
            "--address-start",
            "192.168.1.0",
            "--address-mask",
            "24",
            "--time-start",
            "01.01.2020",
            "--time-end",
            "31.12.2020 23:59:59",
        ])
        .unwrap();
        let config = cli.overrides();
        assert_eq!(config.file_log, Some(PathBuf::from("access.log")));
        assert_eq!(config.address_mask.as_deref(), Some("24"));
        assert_eq!(config.time_end.as_deref(), Some("31.12.2020 23:59:59"));
        assert!(!cli.quiet && !cli.verbose);
    }

    #[test]
    fn test_parse_equals_syntax() {
        let cli = Cli::try_parse_from(["ipjournal", "--file-log=a.log", "--address-mask=8"]).unwrap();
        assert_eq!(cli.file_log, Some(PathBuf::from("a.log")));
        assert_eq!(cli.address_mask.as_deref(), Some("8"));
    }

    #[test]
    fn test_parse_nothing_is_allowed() {
        // Required paths may come from the config file instead
        let cli = Cli::try_parse_from(["ipjournal"]).unwrap();
        assert_eq!(cli.overrides(), Config::default());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["ipjournal", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_mask_is_validated_later() {
        // Raw strings pass through untouched so errors name the parameter
        let cli = Cli::try_parse_from(["ipjournal", "--address-mask", "abc"]).unwrap();
        assert_eq!(cli.address_mask.as_deref(), Some("abc"));
    }
}
