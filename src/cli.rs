use clap::{Parser, ValueEnum};
use std::fmt;

/// CLI scraper for the Python documentation site and the PEP index
#[derive(Parser, Debug)]
#[command(name = "docscrape")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Scraping mode to run
    #[arg(value_enum)]
    pub mode: Mode,

    /// Clear the HTTP response cache before running
    #[arg(short, long)]
    pub clear_cache: bool,

    /// Alternative output for tabular results (default: plain console)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,
}

/// The four extraction modes, one per invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Per-version "What's new in Python" article summaries
    WhatsNew,
    /// Documented Python versions and their statuses
    LatestVersions,
    /// Download the PDF (A4) docs archive
    Download,
    /// Reconcile PEP statuses against the index legend
    Pep,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::WhatsNew => write!(f, "whats-new"),
            Mode::LatestVersions => write!(f, "latest-versions"),
            Mode::Download => write!(f, "download"),
            Mode::Pep => write!(f, "pep"),
        }
    }
}

/// Alternative renderings for a tabular result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Aligned table on the console
    Pretty,
    /// CSV file under results/
    File,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_only() {
        let cli = Cli::try_parse_from(["docscrape", "pep"]).unwrap();
        assert_eq!(cli.mode, Mode::Pep);
        assert!(!cli.clear_cache);
        assert_eq!(cli.output, None);
    }

    #[test]
    fn test_parse_all_modes() {
        for (arg, mode) in [
            ("whats-new", Mode::WhatsNew),
            ("latest-versions", Mode::LatestVersions),
            ("download", Mode::Download),
            ("pep", Mode::Pep),
        ] {
            let cli = Cli::try_parse_from(["docscrape", arg]).unwrap();
            assert_eq!(cli.mode, mode);
        }
    }

    #[test]
    fn test_parse_clear_cache_flag() {
        let cli = Cli::try_parse_from(["docscrape", "pep", "--clear-cache"]).unwrap();
        assert!(cli.clear_cache);

        let cli = Cli::try_parse_from(["docscrape", "pep", "-c"]).unwrap();
        assert!(cli.clear_cache);
    }

    #[test]
    fn test_parse_output_modes() {
        let cli = Cli::try_parse_from(["docscrape", "pep", "-o", "pretty"]).unwrap();
        assert_eq!(cli.output, Some(OutputMode::Pretty));

        let cli = Cli::try_parse_from(["docscrape", "pep", "--output", "file"]).unwrap();
        assert_eq!(cli.output, Some(OutputMode::File));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["docscrape", "everything"]).is_err());
    }

    #[test]
    fn test_missing_mode_rejected() {
        assert!(Cli::try_parse_from(["docscrape"]).is_err());
    }

    #[test]
    fn test_mode_display_matches_cli_names() {
        assert_eq!(Mode::WhatsNew.to_string(), "whats-new");
        assert_eq!(Mode::LatestVersions.to_string(), "latest-versions");
        assert_eq!(Mode::Download.to_string(), "download");
        assert_eq!(Mode::Pep.to_string(), "pep");
    }
}
