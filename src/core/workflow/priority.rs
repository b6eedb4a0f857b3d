//! Display priority derived from elapsed time since creation. Oldest
//! operations surface first; tones escalate at 5h and 24h.

use crate::core::types::Tone;
use crate::utils::format::parse_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const FIVE_HOURS_MS: i64 = 5 * 60 * 60 * 1000;
const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Priority projection for one pipeline row. Not persisted; recomputed
/// against a sampled "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityMeta {
    pub label: String,
    pub tone: Tone,
    /// Creation time in epoch millis; missing/invalid timestamps sort last.
    pub created_ms: i64,
}

/// Compute the priority for an operation created at `created_at` (wire
/// string form) as observed at `now`.
pub fn priority_meta(created_at: Option<&str>, now: DateTime<Utc>) -> PriorityMeta {
    let Some(created) = created_at.and_then(parse_datetime) else {
        return PriorityMeta {
            label: "-".to_string(),
            tone: Tone::Green,
            created_ms: i64::MAX,
        };
    };

    let created_ms = created.timestamp_millis();
    let elapsed_ms = (now.timestamp_millis() - created_ms).max(0);
    let elapsed_minutes = elapsed_ms / (60 * 1000);
    let elapsed_hours = elapsed_ms / (60 * 60 * 1000);

    let tone = if elapsed_ms >= ONE_DAY_MS {
        Tone::Red
    } else if elapsed_ms >= FIVE_HOURS_MS {
        Tone::Yellow
    } else {
        Tone::Green
    };

    let label = if elapsed_hours >= 24 {
        format!("{}d", elapsed_hours / 24)
    } else if elapsed_hours >= 1 {
        format!("{}h", elapsed_hours)
    } else {
        format!("{}m", elapsed_minutes.max(1))
    };

    PriorityMeta {
        label,
        tone,
        created_ms,
    }
}
