use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use clap::{ArgAction, Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mutranier_core::Note;
use mutranier_core::model::QuizSettings;
use services::round::format_elapsed;
use services::{
    Clock, QuizLoopService, QuizSession, RoundError, RoundReview, SessionError, TokioTicker,
};

/// Interval trainer: name the note an interval above or below another.
#[derive(Parser)]
#[command(name = "mutranier", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiz options used when no subcommand is given
    #[command(flatten)]
    quiz: QuizArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play one round of interval questions (default)
    Quiz(QuizArgs),
    /// List the accepted note spellings
    Notes,
}

#[derive(Args, Debug)]
struct QuizArgs {
    /// Questions in the round
    #[arg(short = 'n', long, env = "MUTRANIER_QUESTION_COUNT", default_value_t = QuizSettings::DEFAULT_QUESTION_COUNT)]
    count: u32,

    /// Seed for a reproducible round
    #[arg(long, env = "MUTRANIER_SEED")]
    seed: Option<u64>,

    /// Do not show the running timer
    #[arg(long)]
    no_timer: bool,

    /// Print the review as JSON instead of text
    #[arg(long)]
    json: bool,
}

type Input = Lines<BufReader<Stdin>>;

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn print_notes() {
    println!("Accepted answers (case-insensitive):");
    for note in Note::ALL {
        println!("  {}", note.display_label());
    }
}

fn print_review(review: &RoundReview) {
    println!();
    println!("Review: {}  (time {})", review.score_line(), review.elapsed);
    for item in &review.items {
        let mark = if item.correct { "ok " } else { "xx " };
        let yours = item
            .your_answer
            .map_or_else(|| "—".to_string(), |note| note.to_string());
        println!(
            "{mark}{:>2}. {:<40} you: {:<3} answer: {}",
            item.number, item.prompt, yours, item.expected
        );
    }
}

async fn read_line(input: &mut Input) -> std::io::Result<Option<String>> {
    input.next_line().await
}

/// Asks the current question until a valid note is entered.
///
/// Returns `false` when stdin closes.
async fn ask(
    session: &mut QuizSession,
    input: &mut Input,
    shown_secs: &AtomicU64,
    show_timer: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        let state = session.state();
        let Some(question) = state.current_question() else {
            return Ok(true);
        };
        let clock = if show_timer {
            let secs = shown_secs.load(Ordering::Relaxed);
            format!(" [{}]", format_elapsed(i64::try_from(secs).unwrap_or(i64::MAX) * 1_000))
        } else {
            String::new()
        };
        println!(
            "\nQuestion {}/{}{clock}: {}",
            state.index() + 1,
            state.questions().len(),
            question.text()
        );

        let Some(line) = read_line(input).await? else {
            return Ok(false);
        };

        match session.submit_answer(&line) {
            Ok(feedback) if feedback.correct => {
                println!("Correct! {}", feedback.expected);
                return Ok(true);
            }
            Ok(feedback) => {
                println!(
                    "Not quite: you said {}, the answer is {}.",
                    feedback.given, feedback.expected
                );
                return Ok(true);
            }
            Err(SessionError::Round(err @ RoundError::InvalidNote { .. })) => {
                debug!(%err, "re-prompting");
                println!("{err}");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

async fn run_quiz(args: QuizArgs) -> Result<(), Box<dyn std::error::Error>> {
    let service = QuizLoopService::from_config(Clock::system(), args.count, !args.no_timer)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let shown_secs = Arc::new(AtomicU64::new(0));
    let mut session = match TokioTicker::current() {
        Some(ticker) => {
            let sink = Arc::clone(&shown_secs);
            service.start_round_with_display(&mut rng, ticker, move |secs| {
                sink.store(secs, Ordering::Relaxed);
            })?
        }
        None => service.start_round(&mut rng)?,
    };

    let show_timer = service.settings().show_timer();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    println!("Type a note (C, F#, Bb, ...) and press Enter.");

    while !session.is_complete() {
        if !ask(&mut session, &mut input, &shown_secs, show_timer).await? {
            warn!("stdin closed before the round finished");
            println!("\nRound abandoned.");
            print_review(&session.review());
            return Ok(());
        }

        let state = session.state();
        let is_last = state.index() + 1 == state.questions().len();
        if !is_last {
            println!("(press Enter for the next question)");
            if read_line(&mut input).await?.is_none() {
                println!("\nRound abandoned.");
                print_review(&session.review());
                return Ok(());
            }
        }
        session.next()?;
    }

    let review = session.review();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&review)?);
    } else {
        print_review(&review);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Command::Quiz(cli.quiz)) {
        Command::Quiz(args) => run_quiz(args).await,
        Command::Notes => {
            print_notes();
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
