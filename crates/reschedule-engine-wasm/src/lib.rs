//! WASM bindings for reschedule-engine.
//!
//! Exposes conflict detection, slot search, rescheduling, suggestions and
//! free/busy computation to JavaScript via `wasm-bindgen`. Complex values cross
//! the boundary as JSON strings using the engine's own camelCase serde shapes,
//! so a JS caller sends the same `Event` objects it receives back.
//!
//! Every function that depends on the current time takes `now` as an ISO 8601
//! string. The optional `config_json` argument is an `EngineConfig` object;
//! missing keys fall back to the engine defaults.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p reschedule-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/reschedule_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use reschedule_engine::{Conflict, EngineConfig, Event, RescheduleConstraints, RescheduleStrategy};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: JSON and datetime conversion at the boundary
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (e.g. "2026-03-02T14:00:00+01:00") and naive datetimes
/// (e.g. "2026-03-02T14:00:00"), which are interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn parse_config(config_json: Option<String>) -> Result<EngineConfig, JsValue> {
    match config_json {
        Some(json) if !json.trim().is_empty() => parse_json(&json, "config"),
        _ => Ok(EngineConfig::default()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Detect pairwise conflicts among a JSON array of events.
///
/// Returns a JSON array of conflicts ordered by overlap start.
#[wasm_bindgen(js_name = "detectConflicts")]
pub fn detect_conflicts(events_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let events: Vec<Event> = parse_json(events_json, "events")?;
    let config = parse_config(config_json)?;

    to_json(&reschedule_engine::detect_conflicts_with(&events, &config.severity))
}

/// Rank candidate placements for one event.
///
/// # Arguments
/// - `event_json` -- the event to move
/// - `constraints_json` -- a `RescheduleConstraints` object (`{}` for defaults)
/// - `all_events_json` -- the calendar snapshot
/// - `search_days` -- number of days to scan, starting at the day of `now`
/// - `now` -- current instant (ISO 8601)
#[wasm_bindgen(js_name = "findTimeSlots")]
pub fn find_time_slots(
    event_json: &str,
    constraints_json: &str,
    all_events_json: &str,
    search_days: u32,
    now: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let event: Event = parse_json(event_json, "event")?;
    let constraints: RescheduleConstraints = parse_json(constraints_json, "constraints")?;
    let all_events: Vec<Event> = parse_json(all_events_json, "events")?;
    let now = parse_datetime(now)?;
    let config = parse_config(config_json)?;

    to_json(&reschedule_engine::find_time_slots(
        &event,
        &constraints,
        &all_events,
        search_days,
        now,
        &config,
    ))
}

/// Move one event to its best slot. Returns a `RescheduleResult` object.
#[wasm_bindgen(js_name = "rescheduleEvent")]
pub fn reschedule_event(
    event_json: &str,
    constraints_json: &str,
    all_events_json: &str,
    now: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let event: Event = parse_json(event_json, "event")?;
    let constraints: RescheduleConstraints = parse_json(constraints_json, "constraints")?;
    let all_events: Vec<Event> = parse_json(all_events_json, "events")?;
    let now = parse_datetime(now)?;
    let config = parse_config(config_json)?;

    to_json(&reschedule_engine::reschedule_event(
        &event,
        &constraints,
        &all_events,
        now,
        &config,
    ))
}

/// Reschedule a set of events with the named strategy.
///
/// `strategy` is one of "sequential", "parallel", "optimized", "compact" or
/// "spread". Returns a `BulkRescheduleOperation` object.
#[wasm_bindgen(js_name = "bulkReschedule")]
pub fn bulk_reschedule(
    events_json: &str,
    strategy: &str,
    constraints_json: &str,
    all_events_json: &str,
    now: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let events: Vec<Event> = parse_json(events_json, "events")?;
    let strategy: RescheduleStrategy = strategy
        .parse()
        .map_err(|e: reschedule_engine::EngineError| JsValue::from_str(&e.to_string()))?;
    let constraints: RescheduleConstraints = parse_json(constraints_json, "constraints")?;
    let all_events: Vec<Event> = parse_json(all_events_json, "events")?;
    let now = parse_datetime(now)?;
    let config = parse_config(config_json)?;

    to_json(&reschedule_engine::bulk_reschedule(
        &events,
        strategy,
        &constraints,
        &all_events,
        now,
        &config,
    ))
}

/// Remediation suggestions for one conflict (as returned by `detectConflicts`).
#[wasm_bindgen(js_name = "generateSuggestions")]
pub fn generate_suggestions(
    conflict_json: &str,
    all_events_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let conflict: Conflict = parse_json(conflict_json, "conflict")?;
    let all_events: Vec<Event> = parse_json(all_events_json, "events")?;
    let config = parse_config(config_json)?;

    to_json(&reschedule_engine::generate_suggestions(
        &conflict,
        &all_events,
        &config,
    ))
}

/// Free windows between the events within `[window_start, window_end)`.
#[wasm_bindgen(js_name = "findFreeWindows")]
pub fn find_free_windows(
    events_json: &str,
    window_start: &str,
    window_end: &str,
) -> Result<String, JsValue> {
    let events: Vec<Event> = parse_json(events_json, "events")?;
    let window_start = parse_datetime(window_start)?;
    let window_end = parse_datetime(window_end)?;

    to_json(&reschedule_engine::find_free_windows(
        &events,
        window_start,
        window_end,
    ))
}

/// Expand recurring events into concrete occurrences within a window.
///
/// `timezone` is the IANA zone the rules are evaluated in (e.g.
/// "America/New_York").
#[wasm_bindgen(js_name = "expandOccurrences")]
pub fn expand_occurrences(
    events_json: &str,
    window_start: &str,
    window_end: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    let events: Vec<Event> = parse_json(events_json, "events")?;
    let window_start = parse_datetime(window_start)?;
    let window_end = parse_datetime(window_end)?;
    let tz: Tz = timezone
        .parse()
        .map_err(|e| JsValue::from_str(&format!("Invalid timezone '{}': {}", timezone, e)))?;

    let expanded = reschedule_engine::expand_all(&events, window_start, window_end, tz)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&expanded)
}
