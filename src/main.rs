use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use question_bank::{
    AppError, DEFAULT_QUESTION_BANK_PATH, LessonPath, QuestionRepository, Quiz, child_options,
    load_repository_from_json,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the question bank from
    #[arg(short, long, env = "QUESTION_BANK_FILE", default_value = DEFAULT_QUESTION_BANK_PATH)]
    questions: PathBuf,

    /// Seed for question and option shuffling
    #[arg(long, env = "QUESTION_BANK_SEED")]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the quiz)
    #[arg(long, env = "QUESTION_BANK_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Validate the question bank, print its outline and exit
    #[arg(long)]
    check: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    init_tracing(args.verbose, args.log_file.as_deref(), args.check)?;

    let repository = load_repository_from_json(&args.questions)?;

    if args.check {
        print_outline(&repository);
        return Ok(());
    }

    let quiz = match args.seed {
        Some(seed) => Quiz::with_seed(repository, seed),
        None => Quiz::new(repository),
    };
    quiz.run()
}

/// Logs go to `log_file` if given. Without one, only `--check` logs (to
/// stderr); the interactive UI would be garbled by log lines.
fn init_tracing(verbose: bool, log_file: Option<&Path>, check: bool) -> Result<(), AppError> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("QUESTION_BANK_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None if check => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        None => return Ok(()),
    };

    result.map_err(|error| AppError::Logging(error.to_string()))
}

fn print_outline(repository: &QuestionRepository) {
    println!(
        "{} subjects, {} questions",
        repository.subjects.len(),
        repository.question_count()
    );
    print_level(repository, &[], 0);
}

fn print_level(repository: &QuestionRepository, prefix: &[&str], depth: usize) {
    let Ok(entries) = child_options(repository, prefix) else {
        return;
    };
    for entry in entries {
        let mut path = prefix.to_vec();
        path.push(entry.key.as_str());

        if path.len() == 4 {
            let count = repository
                .lesson(&LessonPath::new(path[0], path[1], path[2], path[3]))
                .map(|lesson| lesson.questions.len())
                .unwrap_or(0);
            println!("{}{} ({} questions)", "  ".repeat(depth), entry.name, count);
        } else {
            println!("{}{}", "  ".repeat(depth), entry.name);
            print_level(repository, &path, depth + 1);
        }
    }
}
