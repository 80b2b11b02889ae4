//! Discrete remediation options for a single conflict.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::conflict::Conflict;
use crate::event::{overlapping_events, Event};

/// Kind of remediation offered for a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    /// Move the shorter event after the longer one.
    Reschedule,
    /// Trim the front of the later event so it starts when the earlier one ends.
    Shorten,
    /// Keep both events as they are.
    NoAction,
}

impl SuggestionKind {
    /// Static confidence attached to every suggestion of this kind.
    pub fn default_confidence(&self) -> f64 {
        match self {
            Self::Reschedule => 0.8,
            Self::Shorten => 0.7,
            Self::NoAction => 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    /// The event the suggestion acts on; `None` for `NoAction`.
    pub target_event: Option<Event>,
    /// New start for the target event.
    pub suggested_time: Option<DateTime<Utc>>,
    pub confidence: f64,
}

impl Suggestion {
    /// The replacement event this suggestion proposes, if any.
    ///
    /// `None` for `NoAction`, and for a `Shorten` whose new start would not be
    /// before the event's end (the earlier event fully covers the later one).
    pub fn proposed_event(&self) -> Option<Event> {
        let target = self.target_event.as_ref()?;
        let start = self.suggested_time?;
        match self.kind {
            SuggestionKind::Reschedule => Some(target.moved_to(start)),
            SuggestionKind::Shorten if start < target.end => {
                Some(target.with_times(start, target.end))
            }
            SuggestionKind::Shorten | SuggestionKind::NoAction => None,
        }
    }
}

/// Generate the remediation options for `conflict`.
///
/// Needs at least two events in the conflict and returns nothing otherwise.
/// From the first two events it derives the earlier/later starter and the
/// shorter/longer one (ties go to the first event), then emits, in order:
///
/// 1. `Reschedule` the shorter event to `longer.end + config.reschedule_gap_minutes`,
///    duration preserved;
/// 2. `Shorten` the later event to start at `earlier.end`, end unchanged;
/// 3. `NoAction`.
///
/// `all_events` is consulted only to warn, in the reschedule description, when
/// the proposed time overlaps other events.
pub fn generate_suggestions(
    conflict: &Conflict,
    all_events: &[Event],
    config: &EngineConfig,
) -> Vec<Suggestion> {
    let [a, b, ..] = conflict.events.as_slice() else {
        return Vec::new();
    };

    let (earlier, later) = if a.start <= b.start { (a, b) } else { (b, a) };
    let (shorter, longer) = if a.duration() <= b.duration() {
        (a, b)
    } else {
        (b, a)
    };

    vec![
        reschedule_suggestion(shorter, longer, all_events, config),
        shorten_suggestion(earlier, later, config.timezone),
        Suggestion {
            kind: SuggestionKind::NoAction,
            title: "Keep both".to_string(),
            description: "Leave both events as scheduled and decide which one to attend."
                .to_string(),
            target_event: None,
            suggested_time: None,
            confidence: SuggestionKind::NoAction.default_confidence(),
        },
    ]
}

fn reschedule_suggestion(
    shorter: &Event,
    longer: &Event,
    all_events: &[Event],
    config: &EngineConfig,
) -> Suggestion {
    let new_start = longer.end + Duration::minutes(config.reschedule_gap_minutes);
    let new_end = new_start + shorter.duration();

    let mut description = format!(
        "Move '{}' to {}, after '{}' ends.",
        shorter.title,
        local_time(new_start, config.timezone),
        longer.title
    );
    let clashes = overlapping_events(all_events, new_start, new_end, &shorter.id).len();
    if clashes > 0 {
        description.push_str(&format!(
            " The new time overlaps {} other event{}.",
            clashes,
            if clashes == 1 { "" } else { "s" }
        ));
    }

    Suggestion {
        kind: SuggestionKind::Reschedule,
        title: format!("Reschedule '{}'", shorter.title),
        description,
        target_event: Some(shorter.clone()),
        suggested_time: Some(new_start),
        confidence: SuggestionKind::Reschedule.default_confidence(),
    }
}

fn shorten_suggestion(earlier: &Event, later: &Event, tz: Tz) -> Suggestion {
    Suggestion {
        kind: SuggestionKind::Shorten,
        title: format!("Shorten '{}'", later.title),
        description: format!(
            "Start '{}' at {}, when '{}' ends.",
            later.title,
            local_time(earlier.end, tz),
            earlier.title
        ),
        target_event: Some(later.clone()),
        suggested_time: Some(earlier.end),
        confidence: SuggestionKind::Shorten.default_confidence(),
    }
}

fn local_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}
