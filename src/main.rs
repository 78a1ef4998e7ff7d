use annotext::output;
use annotext::segment::{SegmenterOptions, SentenceSegmenter};
use annotext::{AnnotatorConfig, FuzzySearchOptions, SearchMatch, TextAnnotator};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "annotext")]
#[command(version, about = "Locate phrases in text or HTML and wrap them in highlight markup")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level when ANNOTEXT_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and print the content with matches wrapped
    Highlight {
        /// Phrase to find
        target: String,

        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Highlight every exact occurrence
        #[arg(short, long)]
        all: bool,

        /// Wrapper element name
        #[arg(long)]
        tag: Option<String>,

        /// Wrapper class attribute
        #[arg(long)]
        class: Option<String>,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Report match locations in the search space
    Find {
        /// Phrase to find
        target: String,

        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Report every exact occurrence
        #[arg(short, long)]
        all: bool,

        /// Chars of context around each match
        #[arg(short = 'C', long, default_value_t = 20)]
        context: usize,

        /// Print JSON instead of colored lines
        #[arg(long)]
        json: bool,

        /// Disable colors
        #[arg(long)]
        no_color: bool,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Split the search space into sentences
    Sentences {
        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Treat the input as plain text
        #[arg(long)]
        plain: bool,

        /// Newline runs end a sentence
        #[arg(long)]
        newlines: bool,

        /// Keep original whitespace in sentence text
        #[arg(long)]
        preserve: bool,

        #[arg(long)]
        json: bool,

        #[arg(long)]
        no_color: bool,
    },
    /// Print the input with its tags removed
    Strip {
        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Print the tag table instead of the text
        #[arg(long)]
        tags: bool,

        #[arg(long)]
        json: bool,

        #[arg(long)]
        no_color: bool,
    },
}

/// Search flags shared by `highlight` and `find`
#[derive(Args)]
struct SearchArgs {
    /// Treat the input as plain text
    #[arg(long)]
    plain: bool,

    /// Text expected right before the target
    #[arg(long)]
    prefix: Option<String>,

    /// Text expected right after the target
    #[arg(long)]
    postfix: Option<String>,

    #[arg(short = 's', long)]
    case_sensitive: bool,

    /// Fall back to fuzzy matching
    #[arg(short, long)]
    fuzzy: bool,

    /// Use token-based fuzzy matching even without prefix or postfix
    #[arg(long, requires = "fuzzy")]
    token: bool,

    /// Retry with HTML entities encoded
    #[arg(long)]
    encode: bool,
}

#[derive(Serialize)]
struct FoundJson<'a> {
    start: usize,
    end: usize,
    strategy: String,
    similarity: f64,
    text: &'a str,
}

#[derive(Serialize)]
struct TagJson<'a> {
    position: usize,
    offset: usize,
    len: usize,
    markup: &'a str,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("ANNOTEXT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("annotext={}", cli.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => AnnotatorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnnotatorConfig::default(),
    };

    match cli.command {
        Commands::Highlight {
            target,
            input,
            all,
            tag,
            class,
            search,
        } => {
            let content = read_input(&input)?;
            let config = search.apply(config);
            let mut wrapper = config.wrapper.clone();
            if let Some(tag) = tag {
                wrapper.tag_name = tag;
            }
            if let Some(class) = class {
                wrapper.class = class;
            }

            let mut annotator = TextAnnotator::from_config(content, &config);
            let found = if all {
                annotator
                    .search_and_highlight_all(&target, &config.search, &wrapper)?
                    .map(|h| h.indices.len())
            } else {
                annotator
                    .search_and_highlight(&target, &config.search, &wrapper)?
                    .map(|_| 1)
            };
            debug!(highlights = found.unwrap_or(0), "highlight finished");

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(annotator.content().as_bytes())?;
            stdout.flush()?;
            Ok(exit_code(found.is_some()))
        }

        Commands::Find {
            target,
            input,
            all,
            context,
            json,
            no_color,
            search,
        } => {
            let content = read_input(&input)?;
            let config = search.apply(config);
            let mut annotator = TextAnnotator::from_config(content, &config);

            let matches: Vec<SearchMatch> = if all {
                annotator
                    .search_all(&target, &config.search)
                    .into_iter()
                    .map(|i| {
                        let h = &annotator.highlights()[i];
                        SearchMatch {
                            range: h.range(),
                            strategy: annotext::Strategy::Direct,
                            similarity: 1.0,
                        }
                    })
                    .collect()
            } else {
                annotator.locate(&target, &config.search).into_iter().collect()
            };

            let text = annotator.search_space();
            if json {
                let found: Vec<FoundJson<'_>> = matches
                    .iter()
                    .map(|m| FoundJson {
                        start: m.range.start,
                        end: m.range.end,
                        strategy: m.strategy.to_string(),
                        similarity: m.similarity,
                        text: &text[m.range.clone()],
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                let mut stdout = output::stdout(!no_color);
                output::write_matches(&mut stdout, text, &matches, context)?;
            }
            Ok(exit_code(!matches.is_empty()))
        }

        Commands::Sentences {
            input,
            plain,
            newlines,
            preserve,
            json,
            no_color,
        } => {
            let content = read_input(&input)?;
            let is_html = config.is_html && !plain;
            let annotator = TextAnnotator::new(content, is_html);
            let mut options = SegmenterOptions {
                newline_boundaries: newlines,
                preserve_whitespace: preserve,
                ..Default::default()
            };
            if let Some(abbreviations) = &config.abbreviations {
                options.abbreviations = abbreviations.clone();
            }
            let sentences = SentenceSegmenter::new(options).segment(annotator.search_space());

            if json {
                println!("{}", serde_json::to_string_pretty(&sentences)?);
            } else {
                let mut stdout = output::stdout(!no_color);
                output::write_sentences(&mut stdout, &sentences)?;
            }
            Ok(exit_code(!sentences.is_empty()))
        }

        Commands::Strip {
            input,
            tags,
            json,
            no_color,
        } => {
            let content = read_input(&input)?;
            let annotator = TextAnnotator::html(content);

            if tags && json {
                let table: Vec<TagJson<'_>> = annotator
                    .tags()
                    .iter()
                    .map(|t| TagJson {
                        position: t.position,
                        offset: t.original_offset(),
                        len: t.len,
                        markup: &annotator.original_content()[t.original_range()],
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else if tags {
                let mut stdout = output::stdout(!no_color);
                output::write_tags(&mut stdout, annotator.original_content(), annotator.tags())?;
            } else if json {
                println!("{}", serde_json::to_string(annotator.search_space())?);
            } else {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(annotator.search_space().as_bytes())?;
                stdout.flush()?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

impl SearchArgs {
    /// Fold the command line flags over the configuration file
    fn apply(self, mut config: AnnotatorConfig) -> AnnotatorConfig {
        if self.plain {
            config.is_html = false;
        }
        let search = &mut config.search;
        if let Some(prefix) = self.prefix {
            search.prefix = prefix;
        }
        if let Some(postfix) = self.postfix {
            search.postfix = postfix;
        }
        if self.case_sensitive {
            search.case_sensitive = true;
        }
        if self.encode {
            search.direct.encode_fallback = true;
        }
        if self.fuzzy {
            let fuzzy = search.fuzzy.get_or_insert_with(FuzzySearchOptions::default);
            fuzzy.token_based |= self.token;
        }
        config
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        Ok(content)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// grep convention: 1 when nothing matched
fn exit_code(matched: bool) -> ExitCode {
    if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
