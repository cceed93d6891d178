//! CLI module - Command-line interface definitions and handlers

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::commands::{self, Output};
use crate::config::{DelimiterPair, EnrichConfig};
use crate::core::render::{OutputFormat, RenderConfig};

/// anchorlink - find titles in text and attach them to document nodes.
#[derive(Parser, Debug)]
#[command(name = "anchorlink")]
#[command(
    author,
    version,
    about,
    long_about = r#"anchorlink locates delimited titles such as 《公司法》 and maps them back onto
the text nodes of a structured document.

Each command prints a ResultSet in the selected format (default: jsonl).
All ranges are byte offsets into the input text (or the flattened document).

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: excerpts only (unstable; intended for debugging)

Examples:
    anchorlink extract notes.txt --pair '<=>'
    anchorlink titles --nested law.txt
    anchorlink split law.txt
    anchorlink flatten doc.json --ignore-tag footnote
    cat doc.json | anchorlink --format md enrich -
"#
)]
pub struct Cli {
    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    /// Maximum bytes to emit in each excerpt.
    #[arg(
        long,
        global = true,
        default_value = "65536",
        value_name = "BYTES",
        long_help = "Maximum bytes to emit in each excerpt.\n\n\
Longer excerpts are cut at a character boundary and the result meta marks them\n\
as truncated. Ranges always cover the full span."
    )]
    pub max_bytes: usize,

    /// Read settings from a JSON config file.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        long_help = "Read settings from a JSON config file with the keys pairs,\n\
sentence_delimiters, ignore_tags and nested_titles. Command-line options\n\
override the values from the file."
    )]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter, e.g. `info` or `anchorlink=trace`.
    #[arg(
        long,
        global = true,
        env = "LOG_LEVEL",
        value_name = "LEVEL",
        long_help = "Log filter directive for stderr logging. Takes precedence over\n\
--verbose and --quiet. Defaults to warn."
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List nested paired-delimiter spans in a text file.
    #[command(
        long_about = "Scan INPUT for spans enclosed by the configured delimiter pairs and emit\n\
one keyword item per span, ordered by start offset. Nested spans carry the\n\
id of their parent.\n\n\
Examples:\n\
  anchorlink extract law.txt\n\
  anchorlink extract notes.txt --pair '<=>' --pair '[=]'\n"
    )]
    Extract {
        /// Input file, or - for stdin.
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Delimiter pair as OPEN=CLOSE; may be repeated.
        #[arg(long = "pair", value_name = "OPEN=CLOSE")]
        pairs: Vec<DelimiterPair>,
    },

    /// List title anchors in a text file.
    Titles {
        /// Input file, or - for stdin.
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Delimiter pair as OPEN=CLOSE; may be repeated.
        #[arg(long = "pair", value_name = "OPEN=CLOSE")]
        pairs: Vec<DelimiterPair>,

        /// Emit nested titles too.
        #[arg(long)]
        nested: bool,
    },

    /// Split a text file into sentence chunks.
    Split {
        /// Input file, or - for stdin.
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Flatten a JSON element tree into text nodes.
    #[command(
        long_about = "Read an element tree from JSON ({\"tag\", \"text\", \"tail\", \"children\"})\n\
and emit its text fragments in reading order with their byte ranges in the\n\
flattened content.\n"
    )]
    Flatten {
        /// Tree file, or - for stdin.
        #[arg(value_name = "TREE")]
        tree: PathBuf,

        /// Skip elements with this tag, including their subtree and tail.
        #[arg(long = "ignore-tag", value_name = "TAG")]
        ignore_tags: Vec<String>,
    },

    /// Find titles in a JSON element tree and attach them to its text nodes.
    #[command(
        long_about = "Flatten the tree, extract titles sentence by sentence and attach each\n\
title to the text node(s) it came from. Titles that cannot be attached are\n\
still listed and reported as ASSOCIATION_MISS diagnostics.\n"
    )]
    Enrich {
        /// Tree file, or - for stdin.
        #[arg(value_name = "TREE")]
        tree: PathBuf,

        /// Skip elements with this tag, including their subtree and tail.
        #[arg(long = "ignore-tag", value_name = "TAG")]
        ignore_tags: Vec<String>,

        /// Emit nested titles too.
        #[arg(long)]
        nested: bool,
    },
}

/// Filter directive from the logging flags
pub fn log_directive(log_level: Option<&str>, verbose: bool, quiet: bool) -> String {
    match log_level {
        Some(level) if !level.trim().is_empty() => level.trim().to_string(),
        _ if verbose => "debug".to_string(),
        _ if quiet => "error".to_string(),
        _ => "warn".to_string(),
    }
}

/// Install the stderr log subscriber
pub fn init_logging(cli: &Cli) {
    use tracing_subscriber::EnvFilter;

    let directive = log_directive(cli.log_level.as_deref(), cli.verbose, cli.quiet);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<EnrichConfig> {
    match path {
        Some(path) => EnrichConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EnrichConfig::default()),
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    init_logging(&cli);

    let format: OutputFormat = cli.format.parse().map_err(|e: String| anyhow!(e))?;
    let output = Output {
        render: RenderConfig::with_pretty(format, cli.pretty),
        max_bytes: cli.max_bytes,
    };
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract { input, pairs } => {
            if !pairs.is_empty() {
                config.pairs = pairs;
            }
            commands::run_extract(&input, &config, output)
        }

        Commands::Titles {
            input,
            pairs,
            nested,
        } => {
            if !pairs.is_empty() {
                config.pairs = pairs;
            }
            config.nested_titles |= nested;
            commands::run_titles(&input, &config, output)
        }

        Commands::Split { input } => commands::run_split(&input, &config, output),

        Commands::Flatten { tree, ignore_tags } => {
            config.ignore_tags.extend(ignore_tags);
            commands::run_flatten(&tree, &config, output)
        }

        Commands::Enrich {
            tree,
            ignore_tags,
            nested,
        } => {
            config.ignore_tags.extend(ignore_tags);
            config.nested_titles |= nested;
            commands::run_enrich(&tree, &config, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directive_priority() {
        assert_eq!(log_directive(None, false, false), "warn");
        assert_eq!(log_directive(None, true, false), "debug");
        assert_eq!(log_directive(None, false, true), "error");
        assert_eq!(log_directive(Some("trace"), false, true), "trace");
        assert_eq!(log_directive(Some("  "), true, false), "debug");
    }

    #[test]
    fn test_parse_pairs() {
        let cli = Cli::try_parse_from([
            "anchorlink",
            "extract",
            "in.txt",
            "--pair",
            "<=>",
            "--pair",
            "《=》",
        ])
        .unwrap();

        match cli.command {
            Commands::Extract { input, pairs } => {
                assert_eq!(input, PathBuf::from("in.txt"));
                assert_eq!(
                    pairs,
                    vec![DelimiterPair::new("<", ">"), DelimiterPair::new("《", "》")]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_pair_is_rejected() {
        assert!(Cli::try_parse_from(["anchorlink", "extract", "in.txt", "--pair", "<>"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["anchorlink", "titles", "-", "--format", "md", "--pretty", "-v"])
                .unwrap();
        assert_eq!(cli.format, "md");
        assert!(cli.pretty);
        assert!(cli.verbose);
    }
}
