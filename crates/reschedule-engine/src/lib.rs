//! # reschedule-engine
//!
//! Deterministic conflict detection and smart rescheduling for unified calendars.
//!
//! The engine is a set of pure functions over caller-supplied snapshots: it holds
//! no state, performs no I/O, and never reads the system clock. Every entry point
//! that depends on "now" takes it as an explicit argument. Calendar sync, storage,
//! and committing accepted proposals all belong to the caller.
//!
//! ## Modules
//!
//! - [`event`] - Canonical event shape and the overlap test
//! - [`conflict`] - Pairwise overlap detection with pluggable severity
//! - [`freebusy`] - Merged busy periods and free windows
//! - [`scoring`] - 0-100 desirability score for a candidate placement
//! - [`slots`] - Enumerate and rank candidate placements for one event
//! - [`bulk`] - Single-event and bulk rescheduling strategies
//! - [`suggestions`] - Remediation options for a single conflict
//! - [`recurrence`] - RRULE series → concrete occurrences
//! - [`constraints`] - Caller rules bounding placements
//! - [`config`] - TOML-loadable engine policy
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use reschedule_engine::{detect_conflicts, generate_suggestions, EngineConfig, Event, EventSource};
//!
//! let day = |h, m| Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap();
//! let a = Event::new("a", "Design review", day(10, 0), day(11, 0), EventSource::Google).unwrap();
//! let b = Event::new("b", "1:1", day(10, 30), day(11, 30), EventSource::Outlook).unwrap();
//! let events = vec![a, b];
//!
//! let conflicts = detect_conflicts(&events);
//! assert_eq!(conflicts.len(), 1);
//! assert_eq!(conflicts[0].overlap_minutes(), 30);
//!
//! let suggestions = generate_suggestions(&conflicts[0], &events, &EngineConfig::default());
//! assert_eq!(suggestions.len(), 3);
//! ```

pub mod bulk;
pub mod config;
pub mod conflict;
pub mod constraints;
pub mod error;
pub mod event;
pub mod freebusy;
pub mod recurrence;
pub mod scoring;
pub mod slots;
pub mod suggestions;

pub use bulk::{
    bulk_reschedule, reschedule_event, BulkRescheduleOperation, RescheduleResult,
    RescheduleStrategy,
};
pub use config::EngineConfig;
pub use conflict::{detect_conflicts, detect_conflicts_with, Conflict, Severity, SeverityPolicy};
pub use constraints::{RescheduleConstraints, TimeOfDayRange};
pub use error::EngineError;
pub use event::{Event, EventSource};
pub use freebusy::{find_first_free_window, find_free_windows, FreeWindow};
pub use recurrence::{expand_all, expand_occurrences};
pub use scoring::{score_slot, SlotScore};
pub use slots::{find_time_slots, TimeSlot};
pub use suggestions::{generate_suggestions, Suggestion, SuggestionKind};
