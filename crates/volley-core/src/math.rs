use std::f64::consts::PI;

use crate::{Vector2, Vector3};

/// Sweeps closer than this to a full turn are treated as no turn at all.
const FULL_TURN_SNAP: f64 = 1e-6;

/// Project a point or direction onto the arena floor.
pub fn flatten(v: &Vector3) -> Vector2 {
    Vector2::new(v.x, v.y)
}

/// Lift a floor point to 3D at the given height.
pub fn lift(v: &Vector2, z: f64) -> Vector3 {
    Vector3::new(v.x, v.y, z)
}

/// Counter-clockwise perpendicular (rotated +90 degrees).
pub fn left_of(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Normalize a vector, returning `None` when it is too short to carry a direction.
pub fn try_unit(v: &Vector2) -> Option<Vector2> {
    v.try_normalize(1e-9)
}

/// 2D cross product (z component of the 3D cross product).
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Angle swept when travelling around `center` from `from` to `to`, in the
/// given turn direction. Always in [0, 2pi).
///
/// Results within a hair of a full turn are snapped to zero so that numerical
/// noise on an already-aligned pair never becomes a wraparound.
pub fn sweep_radians(center: &Vector2, from: &Vector2, to: &Vector2, clockwise: bool) -> f64 {
    let a = from - center;
    let b = to - center;
    let signed = cross(&a, &b).atan2(a.dot(&b));
    let directed = if clockwise { -signed } else { signed };
    let sweep = directed.rem_euclid(2.0 * PI);
    if sweep > 2.0 * PI - FULL_TURN_SNAP {
        0.0
    } else {
        sweep
    }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Smallest non-negative root of `a*t^2 + b*t + c = 0`, if any.
pub fn smallest_positive_root(a: f64, b: f64, c: f64) -> Option<f64> {
    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return None;
        }
        let t = -c / b;
        return (t >= 0.0).then_some(t);
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let t1 = (-b - sqrt) / (2.0 * a);
    let t2 = (-b + sqrt) / (2.0 * a);
    let (lo, hi) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
    if lo >= 0.0 {
        Some(lo)
    } else if hi >= 0.0 {
        Some(hi)
    } else {
        None
    }
}
