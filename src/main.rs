use std::path::PathBuf;

use clap::Parser;
use quiz_prep::quiz::DEFAULT_QUESTION_COUNT;
use quiz_prep::{DEFAULT_QUESTIONS_PATH, Quiz, Settings, logging};
use tracing::error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the question bank from
    #[arg(short, long, default_value = DEFAULT_QUESTIONS_PATH)]
    questions: PathBuf,

    /// Number of questions offered on the setup screen
    #[arg(short = 'n', long, default_value_t = DEFAULT_QUESTION_COUNT)]
    count: usize,

    /// Shuffle the options of every question when a quiz starts
    #[arg(short, long)]
    shuffle_options: bool,

    /// Write logs to this file (filter with QUIZ_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        if let Err(e) = logging::init(path) {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }

    let settings = Settings {
        question_count: args.count,
        shuffle_options: args.shuffle_options,
    };

    let quiz = match Quiz::from_json(&args.questions, settings) {
        Ok(quiz) => quiz,
        Err(e) => {
            error!(error = %e, "question bank unavailable");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = quiz.run() {
        error!(error = %e, "quiz aborted");
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
