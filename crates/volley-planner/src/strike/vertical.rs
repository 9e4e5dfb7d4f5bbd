use volley_core::{math::smallest_positive_root, VerticalReachSettings};

/// Answers how long the car needs to get its origin up to a given height.
///
/// Both functions must be monotonic increasing in `height`.
pub trait VerticalReach {
    /// Seconds from pressing jump (and holding it) until the car reaches
    /// `height`, or `None` above the apex of the jump.
    fn jump_time(&self, height: f64) -> Option<f64>;

    /// Seconds from takeoff until a boosted aerial climb reaches `height`.
    /// Unreachable heights yield infinity.
    fn ascent_time(&self, height: f64) -> f64;
}

/// Closed-form jump and aerial ballistics.
#[derive(Clone, Debug, Default)]
pub struct BallisticTable {
    settings: VerticalReachSettings,
}

impl BallisticTable {
    pub fn new(settings: VerticalReachSettings) -> Self {
        Self { settings }
    }

    /// Height and vertical velocity at the moment the jump hold runs out.
    fn end_of_hold(&self) -> (f64, f64) {
        let s = &self.settings;
        let net = s.jump_hold_accel - s.gravity;
        let t = s.jump_hold_time;
        let z = s.base_height + s.jump_velocity * t + 0.5 * net * t * t;
        let v = s.jump_velocity + net * t;
        (z, v)
    }

    /// Highest point a held jump reaches.
    pub fn jump_apex(&self) -> f64 {
        let (z, v) = self.end_of_hold();
        z + v * v / (2.0 * self.settings.gravity)
    }
}

impl VerticalReach for BallisticTable {
    fn jump_time(&self, height: f64) -> Option<f64> {
        let s = &self.settings;
        let rise = height - s.base_height;
        if rise <= 0.0 {
            return Some(0.0);
        }
        let (hold_z, hold_v) = self.end_of_hold();
        if height <= hold_z {
            let net = s.jump_hold_accel - s.gravity;
            return smallest_positive_root(0.5 * net, s.jump_velocity, -rise);
        }
        if height > self.jump_apex() {
            return None;
        }
        // Coasting phase: hold_z + hold_v*t - g/2*t^2 = height, rising branch.
        smallest_positive_root(-0.5 * s.gravity, hold_v, hold_z - height)
            .map(|t| s.jump_hold_time + t)
    }

    fn ascent_time(&self, height: f64) -> f64 {
        let s = &self.settings;
        let rise = height - s.base_height;
        if rise <= 0.0 {
            return 0.0;
        }
        let net = s.aerial_boost_accel * s.aerial_climb_factor - s.gravity;
        smallest_positive_root(0.5 * net, s.jump_velocity, -rise).unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_time_is_monotonic() {
        let table = BallisticTable::default();
        let mut last = 0.0;
        let apex = table.jump_apex();
        let mut h = 0.5;
        while h < apex {
            let t = table.jump_time(h).unwrap();
            assert!(t >= last, "jump time dropped at height {h}");
            last = t;
            h += 0.1;
        }
    }

    #[test]
    fn above_apex_is_unreachable() {
        let table = BallisticTable::default();
        assert!(table.jump_time(table.jump_apex() + 0.1).is_none());
        assert_eq!(table.jump_time(0.0), Some(0.0));
    }

    #[test]
    fn apex_clears_jump_hit_band() {
        // The default jump hit ceiling must sit under the apex of a held jump.
        let table = BallisticTable::default();
        assert!(table.jump_apex() > 4.8);
    }

    #[test]
    fn ascent_time_is_monotonic() {
        let table = BallisticTable::default();
        let mut last = 0.0;
        for i in 1..40 {
            let t = table.ascent_time(i as f64);
            assert!(t.is_finite());
            assert!(t >= last);
            last = t;
        }
    }
}
