//! Star ratings.

use serde::Serialize;
use std::cmp::Ordering;

/// Maximum number of stars shown for a rating.
pub const MAX_STARS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Star {
    Full,
    Half,
    Empty,
}

/// Render a rating as five stars. A fractional part of at least `.5` adds a half star;
/// `None` renders five empty stars.
pub fn stars(rating: Option<f64>) -> [Star; MAX_STARS] {
    let mut out = [Star::Empty; MAX_STARS];
    let Some(rating) = rating.filter(|r| r.is_finite()) else {
        return out;
    };
    let rating = rating.clamp(0.0, MAX_STARS as f64);
    let full = rating.floor() as usize;
    for star in out.iter_mut().take(full) {
        *star = Star::Full;
    }
    if full < MAX_STARS && rating.fract() >= 0.5 {
        out[full] = Star::Half;
    }
    out
}

/// Ordering for "highest rated first": higher ratings sort first, a missing rating sorts after
/// every present one (including `0.0`), and ties compare equal so a stable sort keeps input order.
pub fn compare_ratings(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
