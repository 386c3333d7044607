use std::fmt;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use interview_core::model::sample_questions;
use services::{Clock, SessionCommand, SessionRunner, SessionUpdate};
use speech::{LocalSpeech, SpeakOptions};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidRate { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidRate { raw } => write!(f, "invalid --rate value: {raw}"),
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

struct Args {
    language: String,
    rate: f32,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--language <tag>] [--rate <factor>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --language en-US");
    eprintln!("  --rate 0.5");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  INTERVIEW_LANGUAGE, INTERVIEW_RATE");
    eprintln!();
    eprintln!("During the session:");
    eprintln!("  1-4   lock in an answer");
    eprintln!("  n     next question (after answering)");
    eprintln!("  s     read the question aloud");
    eprintln!("  q     quit");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut language = std::env::var("INTERVIEW_LANGUAGE")
            .unwrap_or_else(|_| speech::service::DEFAULT_LANGUAGE.to_string());
        let mut rate = std::env::var("INTERVIEW_RATE")
            .ok()
            .and_then(|value| value.parse::<f32>().ok())
            .unwrap_or(speech::service::DEFAULT_RATE);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--language" => {
                    language = require_value(args, "--language")?;
                }
                "--rate" => {
                    let value = require_value(args, "--rate")?;
                    let parsed: f32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidRate { raw: value.clone() })?;
                    if !parsed.is_finite() || parsed <= 0.0 {
                        return Err(ArgsError::InvalidRate { raw: value });
                    }
                    rate = parsed;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { language, rate })
    }
}

fn parse_intent(input: &str) -> Option<SessionCommand> {
    match input {
        "1" | "2" | "3" | "4" => {
            let option = input.parse::<usize>().ok()?;
            Some(SessionCommand::SelectAnswer(option - 1))
        }
        "n" | "next" => Some(SessionCommand::Advance),
        "s" | "speak" => Some(SessionCommand::Speak),
        "q" | "quit" => Some(SessionCommand::Quit),
        _ => None,
    }
}

fn render(update: &SessionUpdate) {
    match update {
        SessionUpdate::Question(snapshot) => {
            let Some(question) = &snapshot.question else {
                return;
            };
            println!();
            println!(
                "Question {}/{}: {}",
                question.number, question.total, question.text
            );
            for option in &question.options {
                println!("  [{}] {}", option.index + 1, option.label);
            }
            println!("{} | {}", snapshot.score_label(), snapshot.timer_label());
        }
        SessionUpdate::Tick { remaining, low_time } => {
            // Only surface the countdown when it matters.
            if *low_time {
                println!("Time Left: {remaining}s !");
            } else if remaining % 10 == 0 {
                println!("Time Left: {remaining}s");
            }
        }
        SessionUpdate::AnswerLocked { option, correct } => {
            if *correct {
                println!("Locked option {} (correct)", option + 1);
            } else {
                println!("Locked option {} (not this one)", option + 1);
            }
            println!("Press n for the next question.");
        }
        SessionUpdate::Speaking { speaking } => {
            if *speaking {
                println!("[avatar] Speaking...");
            } else {
                println!("[avatar] idle");
            }
        }
        SessionUpdate::Completed(summary) => {
            println!();
            println!(
                "Interview Completed! Your Score: {}/{}",
                summary.score(),
                summary.total()
            );
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let voice = SpeakOptions::default()
        .with_language(args.language)
        .with_rate(args.rate);

    let (speech, speech_events) = LocalSpeech::new();
    let (runner, mut handle) = SessionRunner::new(
        sample_questions(),
        speech,
        speech_events,
        Clock::system(),
        voice,
    )?;
    let runner_task = tokio::spawn(runner.run());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            update = handle.updates.recv() => {
                let Some(update) = update else { break };
                let completed = matches!(update, SessionUpdate::Completed(_));
                render(&update);
                if completed {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(input) = line? else {
                    // stdin closed; abandon the session.
                    let _ = handle.commands.send(SessionCommand::Quit);
                    break;
                };
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }
                match parse_intent(input) {
                    Some(command) => {
                        debug!(?command, "forwarding intent");
                        let quit = command == SessionCommand::Quit;
                        let _ = handle.commands.send(command);
                        if quit {
                            break;
                        }
                    }
                    None => println!("Unrecognized input (1-4, n, s, q)."),
                }
            }
        }
    }

    match runner_task.await? {
        Ok(Some(_summary)) => {}
        Ok(None) => println!("Session abandoned."),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
