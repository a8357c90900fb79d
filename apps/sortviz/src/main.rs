use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::{reference_sort, RunController};
use rand::{rngs::SmallRng, SeedableRng};
use shared::{
    domain::{Algorithm, RunToken},
    input::{format_sequence, parse_sequence, parse_sequence_strict, random_sequence},
    protocol::ViewEvent,
    speed::speed_label,
};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{info, warn};

mod config;
mod render;

use config::{load_settings, Settings};
use render::{render_metrics, FrameTracker};

#[derive(Parser, Debug)]
#[command(name = "sortviz", about = "Step-by-step sorting algorithm playback")]
struct Cli {
    #[arg(long, global = true, default_value = "sortviz.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Default)]
struct InputArgs {
    /// Comma-separated integers, e.g. "5,3,8,1".
    #[arg(long, conflicts_with = "random")]
    input: Option<String>,
    /// Generate this many values in 100..=999 instead.
    #[arg(long)]
    random: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate one algorithm and print a frame per committed move.
    Run {
        /// Name (`quick`, `merge sort`, ...) or menu index.
        #[arg(long)]
        algorithm: Option<Algorithm>,
        #[command(flatten)]
        source: InputArgs,
        /// Slider value, 0..=4600.
        #[arg(long)]
        speed: Option<u32>,
        /// Reset the run after this many milliseconds.
        #[arg(long)]
        reset_after_ms: Option<u64>,
        /// Print raw view events as JSON lines instead of frames.
        #[arg(long)]
        json: bool,
    },
    /// Counts from the non-animated implementations.
    Reference {
        /// Every algorithm when omitted.
        #[arg(long)]
        algorithm: Option<Algorithm>,
        #[command(flatten)]
        source: InputArgs,
    },
    /// List the algorithms with their menu index.
    Algorithms,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config);
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run {
            algorithm,
            source,
            speed,
            reset_after_ms,
            json,
        } => {
            let mut settings = settings;
            if speed.is_some() {
                settings.speed = speed;
            }
            let algorithm = algorithm.unwrap_or(settings.algorithm);
            let values = resolve_input(&settings, &source)?;
            run(&settings, algorithm, values, reset_after_ms, json).await?;
        }
        Command::Reference { algorithm, source } => {
            let values = resolve_input(&settings, &source)?;
            println!("input: {}", format_sequence(&values));
            let algorithms = match algorithm {
                Some(algorithm) => vec![algorithm],
                None => Algorithm::ALL.to_vec(),
            };
            for algorithm in algorithms {
                let reference = reference_sort(algorithm, &values);
                println!(
                    "{algorithm:<10} comparisons: {:<6} swaps: {:<6} sorted: {}",
                    reference.comparisons,
                    reference.swaps,
                    format_sequence(&reference.sorted)
                );
            }
        }
        Command::Algorithms => {
            for algorithm in Algorithm::ALL {
                println!("{} {algorithm}", algorithm.index());
            }
        }
    }

    Ok(())
}

fn resolve_input(settings: &Settings, source: &InputArgs) -> Result<Vec<i64>> {
    if let Some(size) = source.random {
        let mut rng = match settings.random_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        return Ok(random_sequence(size, &mut rng));
    }

    let raw = source.input.as_deref().unwrap_or(&settings.input);
    parse_sequence_strict(raw).with_context(|| {
        let usable = parse_sequence(raw).sanitized;
        if usable.is_empty() {
            format!("failed to parse input '{raw}'")
        } else {
            format!("failed to parse input '{raw}', usable prefix is '{usable}'")
        }
    })
}

fn run_header(settings: &Settings, algorithm: Algorithm, values: &[i64]) -> String {
    let speed = match settings.speed {
        Some(slider) => speed_label(slider),
        None => format!("initial ({} ms)", settings.timing().animation.as_millis()),
    };
    format!(
        "{algorithm} | speed {speed} | input {}",
        format_sequence(values)
    )
}

async fn run(
    settings: &Settings,
    algorithm: Algorithm,
    values: Vec<i64>,
    reset_after_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    if !json {
        println!("{}", run_header(settings, algorithm, &values));
    }

    let controller = RunController::new(settings.timing());
    controller
        .load(values)
        .await
        .context("failed to load input")?;

    let events = controller.subscribe_events();
    let token = controller
        .start(algorithm)
        .await
        .context("failed to start run")?;
    let printer = spawn_printer(events, token, json);

    if let Some(ms) = reset_after_ms {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(ms)) => {
                info!(%token, after_ms = ms, "resetting run");
                controller.reset().await.context("reset failed")?;
            }
            idle = controller.wait_for_idle() => idle?,
        }
    }
    controller.wait_for_idle().await?;
    printer.await.context("event printer failed")?;

    if !json {
        summarize(&controller).await;
    }
    Ok(())
}

async fn summarize(controller: &Arc<RunController>) {
    println!("{}", render_metrics(&controller.metrics().await));
}

/// Prints events of `token` until its run finishes, is cancelled or fails.
fn spawn_printer(
    mut events: broadcast::Receiver<ViewEvent>,
    token: RunToken,
    json: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tracker = FrameTracker::default();
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "view events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            if json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(err) => warn!(error = %err, "failed to encode view event"),
                }
            } else if let Some(frame) = tracker.observe(&event) {
                println!("{frame}");
            }

            match &event {
                ViewEvent::RunFinished { token: done, .. }
                | ViewEvent::RunCancelled { token: done, .. }
                    if *done == token =>
                {
                    break
                }
                ViewEvent::Error(payload) => {
                    eprintln!("run failed: {}", payload.message);
                    break;
                }
                _ => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_arguments_parse_algorithm_names_and_indices() {
        let cli = Cli::try_parse_from([
            "sortviz",
            "run",
            "--algorithm",
            "Quick Sort",
            "--input",
            "4,2,4,1",
            "--speed",
            "4600",
        ])
        .expect("valid arguments");
        let Command::Run {
            algorithm,
            source,
            speed,
            ..
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(algorithm, Some(Algorithm::Quick));
        assert_eq!(source.input.as_deref(), Some("4,2,4,1"));
        assert_eq!(speed, Some(4600));
        assert_eq!(cli.config, PathBuf::from("sortviz.toml"));

        let cli = Cli::try_parse_from(["sortviz", "reference", "--algorithm", "4"])
            .expect("valid arguments");
        assert!(matches!(
            cli.command,
            Command::Reference {
                algorithm: Some(Algorithm::Merge),
                ..
            }
        ));
    }

    #[test]
    fn input_and_random_are_exclusive() {
        assert!(
            Cli::try_parse_from(["sortviz", "run", "--input", "1,2", "--random", "5"]).is_err()
        );
        assert!(Cli::try_parse_from(["sortviz", "run", "--algorithm", "bogo"]).is_err());
    }

    #[test]
    fn seeded_random_input_is_reproducible() {
        let settings = Settings {
            random_seed: Some(7),
            ..Settings::default()
        };
        let source = InputArgs {
            input: None,
            random: Some(12),
        };
        let first = resolve_input(&settings, &source).expect("random input");
        let second = resolve_input(&settings, &source).expect("random input");
        assert_eq!(first, second);
        assert_eq!(first.len(), 12);
        assert!(first.iter().all(|value| (100..=999).contains(value)));
    }

    #[test]
    fn malformed_input_is_rejected_before_a_run() {
        let source = InputArgs {
            input: Some("5,x,1".into()),
            random: None,
        };
        let err = resolve_input(&Settings::default(), &source).expect_err("non-numeric token");
        assert_eq!(
            err.to_string(),
            "failed to parse input '5,x,1', usable prefix is '5'"
        );

        let source = InputArgs {
            input: Some("x,1".into()),
            random: None,
        };
        let err = resolve_input(&Settings::default(), &source).expect_err("non-numeric token");
        assert_eq!(err.to_string(), "failed to parse input 'x,1'");
    }

    #[test]
    fn header_shows_the_speed_label() {
        let mut settings = Settings {
            speed: Some(3200),
            ..Settings::default()
        };
        assert_eq!(
            run_header(&settings, Algorithm::Quick, &[3, 1, 2]),
            format!("{} | speed 4x (1400 ms) | input 3,1,2", Algorithm::Quick)
        );

        settings.speed = None;
        assert!(run_header(&settings, Algorithm::Quick, &[1])
            .contains("speed initial (1600 ms)"));
    }

    #[tokio::test(start_paused = true)]
    async fn run_to_completion_leaves_the_controller_idle() {
        let settings = Settings {
            speed: Some(4600),
            ..Settings::default()
        };
        run(&settings, Algorithm::Merge, vec![3, 1, 2], None, true)
            .await
            .expect("run");
    }
}
