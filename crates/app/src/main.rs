use std::fmt;
use std::io::Write as _;
use std::sync::Arc;

use quiz_core::model::CategoryName;
use services::{CatalogError, CatalogService, QuizService, Selection, SessionControls, SessionError};
use storage::json::JsonInitError;
use storage::repository::{Storage, StorageError};
use thiserror::Error;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt};

mod seed;

//
// ─── ARGUMENTS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDir { raw } => write!(f, "invalid --dir value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--dir <storage_dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --dir quiz_categories");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DIR    storage root (overridden by --dir)");
    eprintln!("  LOG_LEVEL   tracing filter, default 'info'");
}

#[derive(Debug)]
struct Args {
    dir: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut dir = std::env::var("QUIZ_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "quiz_categories".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dir" => {
                    let value = require_value(args, "--dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDir { raw: value });
                    }
                    dir = value;
                }
                other => return Err(ArgsError::UnknownArg(other.to_owned())),
            }
        }

        Ok(Self { dir })
    }
}

//
// ─── ERRORS / TRACING ──────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Init(#[from] JsonInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

fn init_tracing() {
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_default();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_fmt::layer().with_writer(std::io::stderr))
        .init();
}

//
// ─── CONSOLE ───────────────────────────────────────────────────────────────────
//

/// Line-oriented stdin, read by one background task for the whole process so
/// the same stream can drive both the menu and mid-quiz skip signals.
struct Console {
    lines: mpsc::Receiver<String>,
}

impl Console {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut lines = stdin.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });
        Self { lines: rx }
    }

    /// Next input line; `None` once stdin is closed.
    async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    async fn prompt(&mut self, text: &str) -> Option<String> {
        print!("{text}");
        let _ = std::io::stdout().flush();
        self.next_line().await
    }
}

//
// ─── MENU ──────────────────────────────────────────────────────────────────────
//

fn letter(index: usize) -> char {
    char::from(b'a' + u8::try_from(index % 26).unwrap_or(0))
}

fn choice_index(choice: &str) -> Option<usize> {
    let mut chars = choice.chars();
    let first = chars.next()?;
    if chars.next().is_some() || !first.is_ascii_lowercase() {
        return None;
    }
    Some(usize::from(first as u8 - b'a'))
}

async fn add_category(catalog: &CatalogService, console: &mut Console) -> Result<(), AppError> {
    let Some(name) = console.prompt("Enter the name of the new category: ").await else {
        return Ok(());
    };
    match catalog.create_category(&name).await {
        Ok(name) => println!("Category '{name}' created."),
        Err(CatalogError::Storage(StorageError::AlreadyExists)) => {
            println!("Category already exists.");
        }
        Err(CatalogError::Category(_)) => println!("Category name cannot be empty."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn add_question(catalog: &CatalogService, console: &mut Console) -> Result<(), AppError> {
    let Some(name) = console.prompt("Enter the category for the question: ").await else {
        return Ok(());
    };
    let Some(question) = console.prompt("Enter the question: ").await else {
        return Ok(());
    };
    let Some(answer) = console.prompt("Enter the answer: ").await else {
        return Ok(());
    };

    match catalog.add_question(&name, &question, &answer).await {
        Ok(()) => println!("Question added."),
        Err(CatalogError::Storage(StorageError::CategoryNotFound)) => {
            println!("Category '{}' does not exist. Please create it first.", name.trim());
        }
        Err(CatalogError::Category(_) | CatalogError::Question(_)) => {
            println!("Category, question and answer must all be non-empty.");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn choose_selection(
    categories: &[CategoryName],
    console: &mut Console,
) -> Option<Selection> {
    println!("Available categories:");
    for (index, category) in categories.iter().enumerate() {
        println!("{}. {}", letter(index), category.display_name());
    }
    let all_letter = letter(categories.len());
    println!("{all_letter}. All categories combined");

    let choice = console
        .prompt(&format!("Choose a category (a-{all_letter}): "))
        .await?
        .trim()
        .to_lowercase();

    if choice == all_letter.to_string() {
        return Some(Selection::All);
    }
    match choice_index(&choice).and_then(|index| categories.get(index)) {
        Some(name) => Some(Selection::Category(name.clone())),
        None => {
            println!("Invalid choice.");
            None
        }
    }
}

async fn start_quiz(quiz: &QuizService, console: &mut Console) -> Result<(), AppError> {
    let categories = quiz.available_categories().await?;
    if categories.is_empty() {
        println!("No categories available.");
        return Ok(());
    }

    let Some(selection) = choose_selection(&categories, console).await else {
        return Ok(());
    };

    let (controls, skip, cancel) = SessionControls::new();
    let mut session = match quiz.start_session(&selection, controls).await {
        Ok(session) => session,
        Err(SessionError::Empty) => {
            println!("No questions in the selected category.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "Starting the quiz. Press CTRL+C to quit. Press Enter to see the answer or skip to the next question."
    );

    // CTRL+C aborts the session, not the process; the menu resumes after.
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    while let Some(active) = session.next_question() {
        println!("Question: {}", active.prompt());

        let reveal = active.reveal();
        tokio::pin!(reveal);
        let event = loop {
            tokio::select! {
                event = &mut reveal => break event,
                line = console.next_line() => match line {
                    Some(_) => skip.skip(),
                    None => {
                        // stdin closed: treat it like an interrupt.
                        cancel.cancel();
                        break reveal.await;
                    }
                },
            }
        };

        let Some(event) = event else { break };
        println!("Answer: {}", event.answer);
        println!("-");
    }

    interrupt.abort();
    if cancel.is_cancelled() {
        println!("\nQuiz interrupted. Returning to the main menu.");
    }
    Ok(())
}

async fn run(args: Args) -> Result<(), AppError> {
    let storage = Storage::json(args.dir.as_str())?;
    let catalog = CatalogService::new(Arc::clone(&storage.categories));
    let quiz = QuizService::new(Arc::clone(&storage.categories));

    let seeded = catalog.seed_defaults(seed::DEFAULT_CATEGORIES).await?;
    if seeded > 0 {
        tracing::info!(seeded, "seeded default categories");
    }

    let mut console = Console::spawn();
    loop {
        println!();
        println!("Knowledge Quiz");
        println!("1. Add a new category");
        println!("2. Add a new question");
        println!("3. Start the quiz");
        println!("4. Quit");

        let Some(choice) = console.prompt("Choose an option: ").await else {
            break;
        };

        match choice.trim() {
            "1" => add_category(&catalog, &mut console).await?,
            "2" => add_question(&catalog, &mut console).await?,
            "3" => start_quiz(&quiz, &mut console).await?,
            "4" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();

    let mut raw_args = std::env::args().skip(1);
    let args = match Args::parse(&mut raw_args) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            print_usage();
            return std::process::ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}
