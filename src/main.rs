//! Command-line entry point for the Hindi learning content pipeline.
//!
//! # Startup sequence
//!
//! 1. Parse arguments.
//! 2. Initialise logging (`-v` raises the default filter to `debug`).
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Build the shared [`ResponseGenerator`]; it starts in mock mode when
//!    the LLM backend is disabled.
//! 5. Run the subcommand and print its result as JSON or plain text.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use hindi_learn::{
    config::{AppConfig, AppPaths},
    content::{
        FileTranscriptSource, StructuredContent, TranscriptProcessor, TranscriptSource,
        TranscriptStats,
    },
    knowledge::{KnowledgeStore, RecordType, RetrievalResult},
    llm::{PromptBuilder, ResponseGenerator},
    practice::{
        check_answer, hint, DialogueGenerator, Difficulty, ListeningGenerator, QuizGenerator,
        Resolved,
    },
};

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "hindi-learn", about = "Turn Hindi transcripts into learning material")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Structured content file (defaults to the platform data directory)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract phrase pairs, dialogues and vocabulary from a transcript
    Process {
        /// Transcript path, or a file name inside the transcripts directory
        transcript: String,
    },
    /// Check the structured content file: index it into a scratch in-memory
    /// store and print per-type record counts.  Nothing is persisted;
    /// `query` and `ask` index the file themselves.
    Index,
    /// Search the structured content
    Query {
        text: String,
        /// Only return records of this type (language_pair, dialogue, vocabulary)
        #[arg(long = "type")]
        record_type: Option<RecordType>,
        /// Number of results
        #[arg(short = 'n', long)]
        results: Option<usize>,
    },
    /// Answer a question grounded in the structured content
    Ask {
        question: String,
        #[arg(short = 'n', long)]
        results: Option<usize>,
    },
    /// Generate a dialogue practice scenario
    Dialogue {
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
    /// Generate a vocabulary quiz
    Quiz {
        #[arg(short, long)]
        questions: Option<usize>,
    },
    /// Generate a listening exercise
    Listening {
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
    /// Send a free-form message to the model
    Chat { message: String },
    /// Get a learning hint for a Hindi phrase
    Hint { phrase: String },
    /// Check an answer against the expected one
    Check { answer: String, expected: String },
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Logging
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    let paths = AppPaths::new();
    let data_file = cli.data.unwrap_or_else(|| paths.structured_data_file.clone());

    // 3. Text generation, shared by every subcommand
    let generator = Arc::new(ResponseGenerator::from_config(&config));

    match cli.command {
        Commands::Process { transcript } => {
            let source = FileTranscriptSource::new(&paths.transcripts_dir);
            let text = source.load(&transcript)?;
            let stats = TranscriptStats::of(&text);
            log::info!(
                "transcript: {} chars ({} Devanagari), {} lines",
                stats.total_chars,
                stats.hindi_chars,
                stats.lines
            );

            let processed = TranscriptProcessor::new(Arc::clone(&generator))
                .process_text(&transcript, &text)
                .await?;
            processed
                .content
                .save_to(&data_file)
                .with_context(|| format!("saving {}", data_file.display()))?;
            log::info!("saved structured content to {}", data_file.display());
            print_json(&processed.stats)
        }

        Commands::Index => {
            let mut store = KnowledgeStore::from_config(&config.store);
            let counts = store.load_from_json(&data_file)?;
            log::info!(
                "{} records indexable from {} (dry run)",
                counts.total(),
                data_file.display()
            );
            print_json(&counts)
        }

        Commands::Query {
            text,
            record_type,
            results,
        } => {
            let store = open_store(&config, &data_file);
            let n = results.unwrap_or(config.store.n_results);
            match store.query(&text, n, record_type) {
                RetrievalResult::Hits(docs) => print_json(&docs),
                RetrievalResult::Unavailable { error } => {
                    anyhow::bail!("knowledge store unavailable: {error}")
                }
            }
        }

        Commands::Ask { question, results } => {
            let store = open_store(&config, &data_file);
            let n = results.unwrap_or(config.store.n_results);
            let context = store.context_for_prompt(&question, n);
            let prompt = PromptBuilder::new().grounded_answer(&context, &question);
            print_reply(generator.generate(&prompt, None).await);
            Ok(())
        }

        Commands::Dialogue { difficulty } => {
            let content = StructuredContent::load_or_empty(&data_file);
            let difficulty = difficulty.unwrap_or(config.practice.default_difficulty);
            let practice = DialogueGenerator::new(generator, content.dialogues)
                .generate(difficulty)
                .await;
            print_resolved(&practice)
        }

        Commands::Quiz { questions } => {
            let content = StructuredContent::load_or_empty(&data_file);
            let quiz = QuizGenerator::new(generator, content.vocabulary)
                .with_policy(config.practice.distractor_policy)
                .generate(questions.unwrap_or(config.practice.quiz_questions))
                .await;
            print_resolved(&quiz)
        }

        Commands::Listening { difficulty } => {
            let content = StructuredContent::load_or_empty(&data_file);
            let difficulty = difficulty.unwrap_or(config.practice.default_difficulty);
            let exercise = ListeningGenerator::new(generator, content.language_pairs)
                .generate(difficulty)
                .await;
            print_resolved(&exercise)
        }

        Commands::Chat { message } => {
            print_reply(generator.generate(&message, None).await);
            Ok(())
        }

        Commands::Hint { phrase } => {
            println!("{}", hint(&generator, &phrase).await);
            Ok(())
        }

        Commands::Check { answer, expected } => print_json(&check_answer(&answer, &expected)),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// An in-memory store loaded from `data_file`; empty if the file is unusable.
fn open_store(config: &AppConfig, data_file: &std::path::Path) -> KnowledgeStore {
    let mut store = KnowledgeStore::from_config(&config.store);
    if let Err(e) = store.load_from_json(data_file) {
        log::warn!("no structured content indexed ({e})");
    }
    store
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_resolved<T: Serialize>(resolved: &Resolved<T>) -> Result<()> {
    log::info!("exercise source: {:?}", resolved.tier);
    print_json(&resolved.value)
}

fn print_reply(reply: Option<String>) {
    match reply {
        Some(text) => println!("{text}"),
        None => println!("Sorry, I couldn't generate a response. Please try again."),
    }
}
