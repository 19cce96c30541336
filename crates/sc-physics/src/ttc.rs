//! Time-to-collision diagnostic.

use sc_core::{Duration, TrigTable};

use crate::collision::Body;

/// Time until `a` and `b` meet along their relative velocity, or `None` if
/// they are not closing on each other.
///
/// The relative velocity counts as pointing at `b` when its angle to the
/// centre line is within `atan(combined_span / distance)`, where
/// `combined_span` is the mean of the two bounding-box diagonals.  The
/// angle is compared through its cosine so no inverse trig is needed.
/// Coincident centres and zero relative speed have no answer.
pub fn time_to_collision(a: &Body, b: &Body, trig: &TrigTable) -> Option<Duration> {
    let offset = b.position - a.position;
    let distance = offset.length();
    let closing = a.velocity - b.velocity;
    let speed = closing.length();
    if !(distance > 0.0 && speed > 0.0) {
        return None;
    }

    let combined_span = 0.5 * (a.rect(trig).span() + b.rect(trig).span());
    let limit = 1.0 / ((combined_span / distance).powi(2) + 1.0).sqrt();
    let alignment = offset.dot(closing) / (distance * speed);
    if alignment < limit {
        return None;
    }
    Some(Duration::from_secs_f64(distance / (speed * alignment)))
}

/// Smallest time-to-collision of `bodies[index]` against every other body,
/// or [`Duration::MAX`] if none qualifies.
pub fn smallest_ttc(bodies: &[Body], index: usize, trig: &TrigTable) -> Duration {
    bodies
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .filter_map(|(_, other)| time_to_collision(&bodies[index], other, trig))
        .min()
        .unwrap_or(Duration::MAX)
}
