//! # campus-corpus CLI
//!
//! Command-line front end for building and exploring a website corpus.
//!
//! ## Subcommands
//!
//! - `scrape`: Read a sitemap, fetch every page and write the corpus
//! - `analyze`: Word-count statistics, frequent words and a histogram
//! - `filter`: Keep notes within a word-count range or containing keywords
//! - `chat`: Stream answers from a Gemini model in the terminal
//!
//! Logs go to stderr (filtered by `RUST_LOG`) and optionally to `--log-file`.
//! The chat command logs to `.campus-corpus/chat.log` only.

mod telemetry;

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use campus_corpus::analysis::{
    DEFAULT_BINS, FilterOptions, Histogram, NoteRow, NoteTable, WordCountSummary, export_table,
};
use campus_corpus::chat::{
    ChatConfig, ChatSession, CompletionGenerator, DEFAULT_CONTEXT_LENGTH, DEFAULT_MAX_NEW_TOKENS,
};
use campus_corpus::corpus::{LoadMode, LoadOptions, load_corpus, write_corpus};
use campus_corpus::crawler::{
    DEFAULT_BASE_URL, DEFAULT_ERROR_LOG, DEFAULT_MIN_TEXT_LENGTH, DEFAULT_SITEMAP_URL,
    PageOutcome, ScrapeConfig, ScrapeProgress, Scraper,
};
use clap::{Args, CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rig::providers::gemini;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Build and explore a text corpus from a website sitemap", long_about = None)]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape every page listed in a sitemap into a corpus file
    Scrape(ScrapeArgs),

    /// Summarize a corpus file
    Analyze(AnalyzeArgs),

    /// Filter a corpus file and write the result
    Filter(FilterArgs),

    /// Chat about the university with a streamed model
    Chat(ChatArgs),
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// Sitemap to read
    #[arg(long, default_value = DEFAULT_SITEMAP_URL)]
    sitemap: String,

    /// Origin prefixed to every sitemap location
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base: String,

    /// Corpus file to write
    #[arg(short, long, default_value = "raw/notes.jsonl")]
    output: PathBuf,

    /// Append-only log of pages that could not be fetched
    #[arg(long, default_value = DEFAULT_ERROR_LOG)]
    error_log: PathBuf,

    /// Minimum text length in characters; 0 keeps every non-empty page
    #[arg(long, default_value_t = DEFAULT_MIN_TEXT_LENGTH)]
    min_length: usize,

    /// Only extract paragraphs, headings and list items
    #[arg(long)]
    no_containers: bool,

    /// URL to skip; replaces the default block-list when given
    #[arg(long = "block")]
    block: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value = "30")]
    timeout: u64,
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Split notes into sentences
    #[arg(long)]
    sentences: bool,

    /// Skip lines that are not valid records instead of failing
    #[arg(long)]
    skip_malformed: bool,
}

impl LoadArgs {
    fn options(&self) -> LoadOptions {
        let mode = if self.sentences {
            LoadMode::Sentences
        } else {
            LoadMode::WholeNote
        };
        LoadOptions::default()
            .mode(mode)
            .skip_malformed(self.skip_malformed)
    }
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Corpus file to read
    #[arg(required = true)]
    corpus: PathBuf,

    #[command(flatten)]
    load: LoadArgs,

    /// Number of frequent words to list
    #[arg(long, default_value = "25")]
    top: usize,

    /// Histogram bins
    #[arg(long, default_value_t = DEFAULT_BINS)]
    bins: usize,

    /// Scale histogram bars logarithmically
    #[arg(long)]
    log_scale: bool,

    /// Number of leading rows to show
    #[arg(long, default_value = "5")]
    head: usize,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Corpus file to read
    #[arg(required = true)]
    corpus: PathBuf,

    /// File to write the kept records to
    #[arg(required = true)]
    output: PathBuf,

    #[command(flatten)]
    load: LoadArgs,

    /// Drop notes with fewer words
    #[arg(long, default_value = "0")]
    min_words: usize,

    /// Drop notes with more words
    #[arg(long, default_value = "1000")]
    max_words: usize,

    /// Keep only notes containing one of these (case-sensitive)
    #[arg(short, long = "keyword")]
    keyword: Vec<String>,
}

#[derive(Args, Debug)]
struct ChatArgs {
    /// Gemini model to use
    #[arg(short, long, default_value = "gemini-2.0-flash")]
    model: String,

    /// Reply length in tokens (8-128)
    #[arg(long, default_value_t = DEFAULT_MAX_NEW_TOKENS)]
    max_new_tokens: usize,

    /// Context window used to detect oversized conversations
    #[arg(long, default_value_t = DEFAULT_CONTEXT_LENGTH)]
    context_length: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Chat(_))) {
        let log_file = cli
            .log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(".campus-corpus/chat.log"));
        telemetry::init_file_logging(&log_file)?;
    } else {
        telemetry::init_tracing_subscriber(cli.log_file.as_deref())?;
    }

    match cli.command {
        Some(Commands::Scrape(args)) => {
            scrape_command(args).await?;
        }
        Some(Commands::Analyze(args)) => {
            analyze_command(args).await?;
        }
        Some(Commands::Filter(args)) => {
            filter_command(args).await?;
        }
        Some(Commands::Chat(args)) => {
            chat_command(args).await?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

#[instrument]
async fn scrape_command(args: ScrapeArgs) -> anyhow::Result<()> {
    let mut builder = ScrapeConfig::builder()
        .sitemap_url(&args.sitemap)
        .base_url(&args.base)
        .error_log_path(&args.error_log)
        .min_text_length(args.min_length)
        .include_containers(!args.no_containers)
        .timeout_secs(args.timeout);
    if !args.block.is_empty() {
        builder = builder.block_list(args.block.iter());
    }
    let scraper = Scraper::new(builder.build()?)?;

    println!("Reading sitemap {}...", args.sitemap);

    let (progress_sender, mut progress_receiver) = mpsc::channel(100);

    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );

    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some(event) = progress_receiver.recv().await {
                match event {
                    ScrapeProgress::Started { total } => progress_bar.set_length(total as u64),
                    ScrapeProgress::Processed { url, outcome } => {
                        progress_bar.inc(1);
                        let label = match outcome {
                            PageOutcome::Extracted => "kept",
                            PageOutcome::Rejected => "too short",
                            PageOutcome::Skipped(_) => "skipped",
                            PageOutcome::Failed(_) => "failed",
                        };
                        progress_bar.set_message(format!("{} {}", label, url));
                    }
                }
            }
            progress_bar.finish_with_message("Scraping completed");
        }
    });

    let start_time = std::time::Instant::now();
    let report = scraper.run(Some(progress_sender)).await;
    let _ = progress_handle.await;
    let report = report?;

    write_corpus(&args.output, &report.records).await?;

    println!(
        "Scraped {} of {} pages in {:.2?} ({} skipped, {} failed, {} too short)",
        report.records.len(),
        report.candidates,
        start_time.elapsed(),
        report.skipped,
        report.failed,
        report.rejected
    );
    println!("Saved corpus to {}", args.output.display());
    if report.failed > 0 {
        println!("Failures logged to {}", args.error_log.display());
    }

    Ok(())
}

#[derive(Serialize)]
struct AnalysisReport<'a> {
    rows: usize,
    head: &'a [NoteRow],
    summary: Option<WordCountSummary>,
    top_words: Vec<(String, usize)>,
    histogram: Option<Histogram>,
}

#[instrument]
async fn analyze_command(args: AnalyzeArgs) -> anyhow::Result<()> {
    let records = load_corpus(&args.corpus, &args.load.options()).await?;
    let table = NoteTable::from_records(records);
    info!("Loaded {} rows from {}", table.len(), args.corpus.display());

    let report = AnalysisReport {
        rows: table.len(),
        head: table.head(args.head),
        summary: table.describe(),
        top_words: table.most_common(args.top),
        histogram: table.histogram(args.bins),
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("{} rows", report.rows);
            for row in report.head {
                println!("  [{:>4} words] {}", row.word_count, row.url);
                println!("    {}", row.note);
            }

            match &report.summary {
                Some(summary) => {
                    println!("\nWord count");
                    println!("  count {:>10}", summary.count);
                    println!("  mean  {:>10.2}", summary.mean);
                    match summary.std {
                        Some(std) => println!("  std   {:>10.2}", std),
                        None => println!("  std   {:>10}", "n/a"),
                    }
                    println!("  min   {:>10.2}", summary.min);
                    println!("  25%   {:>10.2}", summary.q1);
                    println!("  50%   {:>10.2}", summary.median);
                    println!("  75%   {:>10.2}", summary.q3);
                    println!("  max   {:>10.2}", summary.max);
                }
                None => println!("\nNo rows to summarize"),
            }

            if !report.top_words.is_empty() {
                println!("\nMost common words");
                for (i, (word, count)) in report.top_words.iter().enumerate() {
                    println!("  {:>3}. {:<20} {}", i + 1, word, count);
                }
            }

            if let Some(histogram) = &report.histogram {
                let scale = if args.log_scale { " (log scale)" } else { "" };
                println!("\nWord count histogram{}", scale);
                print!("{}", histogram.render(40, args.log_scale));
            }
        }
    }

    Ok(())
}

#[instrument]
async fn filter_command(args: FilterArgs) -> anyhow::Result<()> {
    if args.min_words > args.max_words {
        return Err(anyhow!(
            "--min-words ({}) is greater than --max-words ({})",
            args.min_words,
            args.max_words
        ));
    }

    let records = load_corpus(&args.corpus, &args.load.options()).await?;
    let table = NoteTable::from_records(records);
    let before = table.len();

    let options = FilterOptions::default()
        .min_word_count(args.min_words)
        .max_word_count(args.max_words)
        .keywords(args.keyword.iter().cloned());
    let filtered = table.filter(&options);

    export_table(&args.output, &filtered).await?;

    println!(
        "Kept {} of {} rows; saved to {}",
        filtered.len(),
        before,
        args.output.display()
    );

    Ok(())
}

const ASSISTANT_PREFIX: &str = "Assistant: ";

/// Terminal output that turns the shown reply `printed` into `partial`
///
/// Appends when `partial` extends what is shown. Otherwise clean-up rewrote
/// earlier text, so the line is cleared and redrawn.
fn terminal_update(printed: &str, partial: &str) -> String {
    match partial.strip_prefix(printed) {
        Some(delta) => delta.to_string(),
        None => format!("\r\x1b[2K{}{}", ASSISTANT_PREFIX, partial),
    }
}

async fn chat_command(args: ChatArgs) -> anyhow::Result<()> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .map_err(|_| anyhow!("GEMINI_API_KEY environment variable must be set"))?;

    let client = gemini::Client::new(&api_key);
    let generator = CompletionGenerator::new(client.completion_model(&args.model))
        .with_context_length(args.context_length);
    let config = ChatConfig::default().max_new_tokens(args.max_new_tokens);
    let mut session = ChatSession::new(Arc::new(generator), config);
    info!(model = %args.model, "Chat session started");

    println!("W&L chat. Type a question, /clear to reset the history, /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nUser: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        match message {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear_history();
                println!("History cleared.");
                continue;
            }
            _ => {}
        }

        let mut reply = match session.send(message) {
            Ok(reply) => reply,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        print!("{}", ASSISTANT_PREFIX);
        let mut printed = String::new();
        let mut failed = false;
        while let Some(partial) = reply.next().await {
            match partial {
                Ok(partial) => {
                    print!("{}", terminal_update(&printed, &partial));
                    std::io::stdout().flush()?;
                    printed = partial;
                }
                Err(e) => {
                    warn!("Reply failed: {}", e);
                    eprintln!("\n{}", e);
                    failed = true;
                    break;
                }
            }
        }
        println!();

        if !failed {
            session.record_turn(message, reply.response());
        }
    }

    Ok(())
}
