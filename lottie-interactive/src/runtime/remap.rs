//! Mapping a playhead from one segment onto another.

use crate::{Segment, StartAt, TimeRemap};

/// Keeps the relative position: 40% through `from` lands 40% through `onto`.
pub fn proportional(time: f64, from: Segment, onto: Segment) -> f64 {
    let from_length = from.length();
    let progress = if from_length > 0.0 {
        (time - from.start) / from_length
    } else {
        0.0
    };
    onto.start + progress.max(0.0).min(1.0) * onto.length()
}

/// Keeps the offset from the segment start, wrapped by the length of `onto`.
pub fn wrap(time: f64, from: Segment, onto: Segment) -> f64 {
    let onto_length = onto.length();
    let offset = time - from.start;
    let value = onto.start
        + if onto_length > 0.0 {
            offset % onto_length
        } else {
            0.0
        };
    onto.clamp(value)
}

/// Keeps the offset from the segment start, clamped into `onto`.
pub fn clamp(time: f64, from: Segment, onto: Segment) -> f64 {
    onto.clamp(time - from.start + onto.start)
}

/// Starting time in `onto` for a state entered from `from` at `time`.
///
/// `None` for unknown policies.
pub fn start_time(policy: &StartAt, time: f64, from: Segment, onto: Segment) -> Option<f64> {
    match policy {
        StartAt::Start => Some(onto.start),
        StartAt::End => Some(onto.end),
        StartAt::Proportional => Some(proportional(time, from, onto)),
        StartAt::Wrap => Some(wrap(time, from, onto)),
        StartAt::Clamp => Some(clamp(time, from, onto)),
        StartAt::Unknown(_) => None,
    }
}

/// Time in `onto` matching `time` in `from`. Unknown policies leave the time as is.
pub fn remap_time(policy: &TimeRemap, time: f64, from: Segment, onto: Segment) -> f64 {
    match policy {
        TimeRemap::Proportional => proportional(time, from, onto),
        TimeRemap::Wrap => wrap(time, from, onto),
        TimeRemap::Clamp => clamp(time, from, onto),
        TimeRemap::Unknown(_) => time,
    }
}
