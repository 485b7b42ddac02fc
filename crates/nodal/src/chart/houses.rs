use crate::ephemeris::normalize_degrees;

/// Find the house (1..=12) containing `point`.
///
/// House `i + 1` spans `[cusps[i], cusps[(i + 1) % 12])`. A span whose start
/// is greater than its end crosses 0 degrees Aries and contains everything
/// from the start up to 360 plus everything below the end. Houses are
/// scanned in order and the first match wins.
///
/// Returns `None` unless there are exactly twelve finite cusps, and also
/// when no span contains the point (all cusps equal, as happens with
/// degenerate polar charts).
pub fn assign_house(point: f64, cusps: &[f64]) -> Option<u8> {
    if cusps.len() != 12 || cusps.iter().any(|c| !c.is_finite()) {
        return None;
    }

    let mut ring = [0.0f64; 12];
    for (slot, cusp) in ring.iter_mut().zip(cusps) {
        *slot = normalize_degrees(*cusp);
    }
    let p = normalize_degrees(point);

    for i in 0..12 {
        let start = ring[i];
        let end = ring[(i + 1) % 12];
        let inside = if start <= end {
            start <= p && p < end
        } else {
            p >= start || p < end
        };
        if inside {
            return Some(i as u8 + 1);
        }
    }
    None
}
