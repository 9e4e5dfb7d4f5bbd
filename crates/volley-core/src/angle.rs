use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::Vector2;

/// A planar heading in radians, always in (-pi, pi]. Headings are measured
/// counter-clockwise from the positive x axis of the arena floor.
///
/// ```ignore
/// # use volley_core::Angle;
/// let a = Angle::from_degrees(90.0);
/// let b = Angle::from_degrees(45.0);
/// assert_eq!((a - b).degrees(), 45.0);
/// ```
#[derive(Debug, Clone, Copy, PartialOrd, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const PI_2: Angle = Angle(PI / 2.0);

    /// Create a new angle from radians.
    pub fn from_radians(radians: f64) -> Self {
        Angle(wrap_angle(radians))
    }

    /// Create a new angle from degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// Heading of a vector. Returns `None` for a (near) zero vector, which has
    /// no direction.
    pub fn of_vector(v: &Vector2) -> Option<Self> {
        if v.norm_squared() < 1e-18 {
            return None;
        }
        Some(Self::from_radians(v.y.atan2(v.x)))
    }

    /// The smallest signed rotation that turns `from` onto `to`. Positive is
    /// counter-clockwise. Zero vectors yield a zero correction.
    pub fn correction(from: &Vector2, to: &Vector2) -> Self {
        match (Self::of_vector(from), Self::of_vector(to)) {
            (Some(a), Some(b)) => b - a,
            _ => Self::default(),
        }
    }

    /// Get the angle in radians.
    pub fn radians(&self) -> f64 {
        self.0
    }

    /// Get the angle in degrees.
    pub fn degrees(&self) -> f64 {
        self.0.to_degrees()
    }

    /// Unit vector pointing along this heading.
    pub fn to_vector(&self) -> Vector2 {
        Vector2::new(self.0.cos(), self.0.sin())
    }

    /// Rotate a vector by this angle.
    pub fn rotate_vector(&self, v: &Vector2) -> Vector2 {
        let rot = nalgebra::Rotation2::new(self.0);
        rot * v
    }

    /// Get the absolute value of the angle
    pub fn abs(&self) -> f64 {
        self.0.abs()
    }
}

impl std::ops::Sub for Angle {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Angle::from_radians(self.0 - other.0)
    }
}

impl std::ops::Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self {
        Angle::from_radians(-self.0)
    }
}

impl Default for Angle {
    fn default() -> Self {
        Self::from_radians(0.0)
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        let diff: f64 = (self.radians() - other.radians()).abs();
        const TOLERANCE: f64 = 1e-5;
        !(TOLERANCE..=(2.0 * PI - TOLERANCE)).contains(&diff)
    }
}

fn wrap_angle(angle: f64) -> f64 {
    let mut angle = angle % (2.0 * PI);
    if angle <= -PI {
        angle += 2.0 * PI;
    } else if angle > PI {
        angle -= 2.0 * PI;
    }
    angle
}
