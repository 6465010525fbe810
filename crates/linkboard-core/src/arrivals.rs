//! Next-arrival selection.
//!
//! Pure logic, no clock access: callers pass `now_ms` so the policy is
//! testable without wall-clock waits.

use linkboard_types::ArrivalRecord;

/// Pick the soonest strictly-future arrival time for `route_id`.
///
/// Per matching record the candidate is the earlier of its predicted and
/// scheduled times, considering only values strictly greater than `now_ms`;
/// anything at or before `now_ms` is a vehicle that already left. The
/// answer is the smallest candidate across all matching records, or `None`
/// when nothing qualifies. Records carrying only one of the two times are
/// fine; when two records tie, either is acceptable since the result is a
/// bare timestamp.
#[must_use]
pub fn next_arrival(records: &[ArrivalRecord], route_id: &str, now_ms: i64) -> Option<i64> {
    records
        .iter()
        .filter(|record| record.route_id == route_id)
        .filter_map(|record| {
            let predicted = record.predicted_arrival_time.filter(|&t| t > now_ms);
            let scheduled = record.scheduled_arrival_time.filter(|&t| t > now_ms);
            match (predicted, scheduled) {
                (Some(p), Some(s)) => Some(p.min(s)),
                (p, s) => p.or(s),
            }
        })
        .min()
}
