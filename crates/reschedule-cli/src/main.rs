//! `reschedule` CLI: run the rescheduling engine over JSON calendar snapshots.
//!
//! Input is always a JSON array of events in the engine's camelCase shape.
//! Output is pretty-printed JSON on stdout (or `-o FILE`); logs go to stderr.
//!
//! ## Usage
//!
//! ```sh
//! # List pairwise conflicts
//! reschedule conflicts -i calendar.json
//!
//! # Conflicts plus remediation suggestions
//! reschedule suggest -i calendar.json
//!
//! # Rank new slots for one event over the next 7 days
//! reschedule slots -i calendar.json --event standup --days 7 --now 2026-03-02T00:00:00Z
//!
//! # Move several events at once
//! reschedule bulk -i calendar.json --events a,b,c --strategy compact
//!
//! # Free windows, after expanding recurring series
//! reschedule free -i calendar.json --from 2026-03-02T08:00:00Z --to 2026-03-02T18:00:00Z
//!
//! # Just the first hour-long gap
//! reschedule free -i calendar.json --from 2026-03-02T08:00:00Z --to 2026-03-02T18:00:00Z --first --min-minutes 60
//!
//! # Engine policy from TOML, debug logging
//! reschedule --config engine.toml --verbose conflicts -i calendar.json
//! ```

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::{Args, Parser, Subcommand};
use reschedule_engine::{
    Conflict, EngineConfig, Event, RescheduleConstraints, RescheduleStrategy, Suggestion,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_DIRECTIVES: &str = "warn";
const VERBOSE_LOG_DIRECTIVES: &str = "debug";

#[derive(Parser)]
#[command(
    name = "reschedule",
    version,
    about = "Calendar conflict detection and smart rescheduling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration file (TOML); built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Current instant (RFC 3339); defaults to the system clock
    #[arg(long, global = true)]
    now: Option<String>,
}

#[derive(Args)]
struct IoArgs {
    /// Input events JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Expand recurring events over this many days from now before running
    #[arg(long)]
    expand_days: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect pairwise conflicts between events
    Conflicts {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Detect conflicts and propose remediations for each
    Suggest {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Rank candidate slots for one event
    Slots {
        #[command(flatten)]
        io: IoArgs,
        /// Id of the event to move
        #[arg(long)]
        event: String,
        /// Days to search (defaults to the configured search_days)
        #[arg(long)]
        days: Option<u32>,
        /// Constraints JSON file
        #[arg(long)]
        constraints: Option<String>,
    },
    /// Reschedule several events with one strategy
    Bulk {
        #[command(flatten)]
        io: IoArgs,
        /// Comma-separated ids of the events to move
        #[arg(long)]
        events: String,
        /// sequential, parallel, optimized, compact or spread
        #[arg(long, default_value = "sequential")]
        strategy: String,
        /// Constraints JSON file
        #[arg(long)]
        constraints: Option<String>,
    },
    /// List free windows between events
    Free {
        #[command(flatten)]
        io: IoArgs,
        /// Window start (RFC 3339)
        #[arg(long)]
        from: String,
        /// Window end (RFC 3339)
        #[arg(long)]
        to: String,
        /// Only report windows at least this long
        #[arg(long, default_value_t = 0)]
        min_minutes: i64,
        /// Report only the first qualifying window (`null` when none)
        #[arg(long)]
        first: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConflictReport {
    conflict: Conflict,
    suggestions: Vec<Suggestion>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = load_config(cli.config.as_deref())?;
    let now = match cli.now.as_deref() {
        Some(raw) => parse_datetime(raw)?,
        None => Utc::now(),
    };
    debug!(%now, timezone = %config.timezone, "engine ready");

    match cli.command {
        Commands::Conflicts { io } => {
            let events = load_events(&io, now, &config)?;
            let conflicts = reschedule_engine::detect_conflicts_with(&events, &config.severity);
            info!(events = events.len(), conflicts = conflicts.len(), "detected conflicts");
            write_json(io.output.as_deref(), &conflicts)?;
        }
        Commands::Suggest { io } => {
            let events = load_events(&io, now, &config)?;
            let reports: Vec<ConflictReport> =
                reschedule_engine::detect_conflicts_with(&events, &config.severity)
                    .into_iter()
                    .map(|conflict| ConflictReport {
                        suggestions: reschedule_engine::generate_suggestions(
                            &conflict, &events, &config,
                        ),
                        conflict,
                    })
                    .collect();
            write_json(io.output.as_deref(), &reports)?;
        }
        Commands::Slots {
            io,
            event,
            days,
            constraints,
        } => {
            let events = load_events(&io, now, &config)?;
            let target = find_event(&events, &event)?;
            let constraints = load_constraints(constraints.as_deref())?;
            let slots = reschedule_engine::find_time_slots(
                target,
                &constraints,
                &events,
                days.unwrap_or(config.search_days),
                now,
                &config,
            );
            write_json(io.output.as_deref(), &slots)?;
        }
        Commands::Bulk {
            io,
            events: ids,
            strategy,
            constraints,
        } => {
            let events = load_events(&io, now, &config)?;
            let strategy: RescheduleStrategy = strategy
                .parse()
                .context("Available strategies: sequential, parallel, optimized, compact, spread")?;
            let constraints = load_constraints(constraints.as_deref())?;
            let to_move = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| find_event(&events, id).cloned())
                .collect::<Result<Vec<Event>>>()?;
            if to_move.is_empty() {
                bail!("--events must name at least one event id");
            }

            let operation = reschedule_engine::bulk_reschedule(
                &to_move,
                strategy,
                &constraints,
                &events,
                now,
                &config,
            );
            info!(
                strategy = %strategy,
                success_rate = operation.success_rate(),
                "bulk reschedule finished"
            );
            write_json(io.output.as_deref(), &operation)?;
        }
        Commands::Free {
            io,
            from,
            to,
            min_minutes,
            first,
        } => {
            let events = load_events(&io, now, &config)?;
            let from = parse_datetime(&from)?;
            let to = parse_datetime(&to)?;
            if first {
                let window =
                    reschedule_engine::find_first_free_window(&events, from, to, min_minutes);
                write_json(io.output.as_deref(), &window)?;
            } else {
                let windows: Vec<_> = reschedule_engine::find_free_windows(&events, from, to)
                    .into_iter()
                    .filter(|w| w.duration_minutes >= min_minutes)
                    .collect();
                write_json(io.output.as_deref(), &windows)?;
            }
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins unless `--verbose` is given.
fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::try_new(VERBOSE_LOG_DIRECTIVES)
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES))
    }
    .context("Failed to parse log directives")?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .try_init()
        .context("Failed to install logger")?;
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path)),
        None => Ok(EngineConfig::default()),
    }
}

fn load_constraints(path: Option<&str>) -> Result<RescheduleConstraints> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            let constraints: RescheduleConstraints = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid constraints JSON in {}", path))?;
            constraints.validate()?;
            Ok(constraints)
        }
        None => Ok(RescheduleConstraints::default()),
    }
}

/// Read the snapshot and, when asked, expand recurring series around `now`.
fn load_events(io: &IoArgs, now: DateTime<Utc>, config: &EngineConfig) -> Result<Vec<Event>> {
    let raw = read_input(io.input.as_deref())?;
    let events: Vec<Event> = serde_json::from_str(&raw).context("Invalid events JSON")?;

    match io.expand_days {
        Some(days) => {
            let until = TimeDelta::try_days(days)
                .and_then(|span| now.checked_add_signed(span))
                .with_context(|| format!("--expand-days {} is out of range", days))?;
            let expanded = reschedule_engine::expand_all(&events, now, until, config.timezone)
                .context("Failed to expand recurring events")?;
            debug!(series = events.len(), occurrences = expanded.len(), "expanded recurrences");
            Ok(expanded)
        }
        None => Ok(events),
    }
}

fn find_event<'a>(events: &'a [Event], id: &str) -> Result<&'a Event> {
    events
        .iter()
        .find(|e| e.id == id)
        .with_context(|| format!("No event with id '{}' in input", id))
}

fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 datetime: '{}'", raw))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match path {
        Some(path) => {
            std::fs::write(path, content + "\n")
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
