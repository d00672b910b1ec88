use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tinywiki")]
#[command(version)]
#[command(about = "Extract articles from a multistream Wikipedia dump", long_about = None)]
#[command(after_help = "Examples:\n  \
  tinywiki Anarchism                     print the source of one article\n  \
  tinywiki -l 'Alan *'                   list titles starting with \"Alan \"\n  \
  tinywiki -o out 'Apollo 1?'            write Apollo 10..19 into out/\n  \
  tinywiki -d https://dumps.example.org/enwiki.xml.bz2 Anarchism")]
pub struct Cli {
    /// Index file path or HTTP URL
    #[arg(
        short = 'i',
        long = "index",
        value_name = "INDEX",
        env = "TINYWIKI_INDEX",
        default_value = "enwiki-latest-pages-articles-multistream-index.txt.bz2"
    )]
    pub index: String,

    /// Content file path or HTTP URL
    #[arg(
        short = 'd',
        long = "data",
        value_name = "DATA",
        env = "TINYWIKI_DATA",
        default_value = "enwiki-latest-pages-articles-multistream.xml.bz2"
    )]
    pub data: String,

    /// Article titles or glob patterns (`*`, `?`)
    #[arg(value_name = "TITLES")]
    pub titles: Vec<String>,

    /// List matching titles instead of extracting
    #[arg(short = 'l')]
    pub list: bool,

    /// Write articles into this directory instead of stdout
    #[arg(short = 'o', value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'f')]
    pub overwrite: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Default log filter for the chosen verbosity; `RUST_LOG` overrides it.
    pub fn log_level(&self) -> tracing::Level {
        match self.quiet {
            0 => tracing::Level::INFO,
            1 => tracing::Level::WARN,
            _ => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tinywiki", "Anarchism"]).unwrap();
        assert_eq!(cli.titles, vec!["Anarchism"]);
        assert!(cli.index.ends_with("index.txt.bz2"));
        assert!(!cli.is_quiet());
        assert_eq!(cli.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "tinywiki", "-i", "idx.bz2", "-d", "https://host/dump.bz2", "-qq", "-l", "A*",
        ])
        .unwrap();
        assert_eq!(cli.index, "idx.bz2");
        assert!(crate::io::is_http_url(&cli.data));
        assert!(!crate::io::is_http_url(&cli.index));
        assert!(cli.list);
        assert!(cli.is_very_quiet());
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }
}
