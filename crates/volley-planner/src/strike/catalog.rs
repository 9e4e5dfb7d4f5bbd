use volley_core::{ArenaGeometry, CarData, CatalogSettings, TimedPosition, Vector3, BALL_RADIUS, CAR_BASE_HEIGHT};

use super::{
    profile::{StrikeProfile, StrikeTechnique},
    vertical::{BallisticTable, VerticalReach},
};

/// Maps a candidate contact to the technique (and its timing) that can reach it.
///
/// Height bands, lowest first: chip below `chip_max`, flip hit up to
/// `flip_hit_max`, jump hit below `jump_hit_max`, aerial above. The catalog
/// composes the injected [`VerticalReach`] table and never integrates
/// ballistics itself.
#[derive(Clone, Debug)]
pub struct StrikeCatalog<V = BallisticTable> {
    settings: CatalogSettings,
    arena: ArenaGeometry,
    vertical: V,
}

impl Default for StrikeCatalog<BallisticTable> {
    fn default() -> Self {
        Self::new(
            CatalogSettings::default(),
            ArenaGeometry::default(),
            BallisticTable::default(),
        )
    }
}

impl<V: VerticalReach> StrikeCatalog<V> {
    pub fn new(settings: CatalogSettings, arena: ArenaGeometry, vertical: V) -> Self {
        Self {
            settings,
            arena,
            vertical,
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn vertical(&self) -> &V {
        &self.vertical
    }

    /// Choose the strike profile for a contact at `contact`, approached with
    /// `approach_angle` radians between the car's approach direction and the
    /// desired outgoing ball direction.
    ///
    /// Returns `None` when only an aerial could reach the contact and the car
    /// cannot afford one.
    pub fn profile_for(&self, contact: &Vector3, approach_angle: f64, boost: f64) -> Option<StrikeProfile> {
        let s = &self.settings;
        let angle = approach_angle.abs();
        let height = contact.z;

        if angle < s.straight_on_angle {
            return self.straight_on(height, boost);
        }

        if angle < s.chip_angle && height < s.chip_max {
            return Some(self.chip());
        }

        if height < s.jump_hit_max {
            let nearest_goal = self.arena.nearest_goal(contact);
            let near_goal = (contact - nearest_goal.center).norm() < s.near_goal_radius;
            if angle > s.side_hit_angle && near_goal {
                return Some(self.side_hit(height));
            }
            return Some(self.diagonal_hit(height));
        }

        self.aerial(height, boost)
    }

    /// Profile for a contact approached head on.
    pub fn straight_on(&self, height: f64, boost: f64) -> Option<StrikeProfile> {
        let s = &self.settings;
        if height < s.chip_max {
            return Some(self.chip());
        }
        if height <= s.flip_hit_max {
            return Some(self.flip_hit());
        }
        if height < s.jump_hit_max {
            return Some(self.jump_hit(height));
        }
        self.aerial(height, boost)
    }

    pub fn chip(&self) -> StrikeProfile {
        StrikeProfile::chip(self.settings.contact_offset)
    }

    pub fn flip_hit(&self) -> StrikeProfile {
        self.grounded_profile(StrikeTechnique::FlipHit, self.settings.flip_hit_duration)
    }

    pub fn jump_hit(&self, height: f64) -> StrikeProfile {
        // The nose tilts up during the jump, so the car needs less height.
        let required = height * self.settings.jump_hit_height_factor;
        self.grounded_profile(StrikeTechnique::JumpHit, self.jump_time_or_default(required))
    }

    pub fn diagonal_hit(&self, height: f64) -> StrikeProfile {
        let jump = self.jump_time_or_default(height - BALL_RADIUS + CAR_BASE_HEIGHT);
        self.grounded_profile(
            StrikeTechnique::DiagonalHit,
            jump + self.settings.diagonal_extra_time,
        )
    }

    pub fn side_hit(&self, height: f64) -> StrikeProfile {
        let jump = self.jump_time_or_default(height - BALL_RADIUS + CAR_BASE_HEIGHT);
        self.grounded_profile(StrikeTechnique::SideHit, jump)
    }

    /// Aerial profile, or `None` if the boost tank cannot pay for the climb
    /// plus its correction window.
    pub fn aerial(&self, height: f64, boost: f64) -> Option<StrikeProfile> {
        let s = &self.settings;
        if boost <= s.aerial_min_boost {
            return None;
        }
        let hang_time = self.vertical.ascent_time(height);
        if !hang_time.is_finite() {
            return None;
        }
        let can_dodge = hang_time < s.air_dodge_ceiling;
        let correction_budget = if can_dodge {
            s.aerial_correction_window
        } else {
            0.0
        };
        let boost_needed = (hang_time + correction_budget) * s.aerial_boost_per_second;
        if boost_needed > boost {
            log::trace!(
                "Aerial to {height:.1} needs {boost_needed:.0} boost, have {boost:.0}"
            );
            return None;
        }

        let mut risk_cost = StrikeTechnique::Aerial.base_risk();
        if !can_dodge {
            risk_cost += 0.3;
        }
        Some(StrikeProfile {
            technique: StrikeTechnique::Aerial,
            pre_strike_duration: hang_time,
            approach_backoff: self.backoff(hang_time),
            dodge_speed_boost: if can_dodge { s.dodge_speed_boost } else { 0.0 },
            correction_budget,
            risk_cost,
        })
    }

    /// Whether the car can get up to the contact in the time left.
    ///
    /// Below the jump ceiling a jump up to the contact height must fit,
    /// whatever the technique; above it the car needs boost and enough time
    /// for the aerial climb.
    pub fn vertically_accessible(&self, car: &CarData, contact: &TimedPosition, _profile: &StrikeProfile) -> bool {
        let s = &self.settings;
        let seconds_till_contact = contact.time - car.time;
        let height = contact.position.z;

        if height < s.jump_hit_max {
            let t_minus = seconds_till_contact - self.jump_time_or_default(height);
            return t_minus >= -s.vertical_slack;
        }

        if car.boost > s.aerial_min_boost {
            let t_minus = seconds_till_contact - self.vertical.ascent_time(height);
            return t_minus >= -s.vertical_slack;
        }
        false
    }

    fn jump_time_or_default(&self, height: f64) -> f64 {
        self.vertical
            .jump_time(height)
            .unwrap_or(self.settings.unreachable_jump_time)
    }

    fn backoff(&self, pre_strike_duration: f64) -> f64 {
        self.settings.contact_offset + pre_strike_duration * self.settings.launch_carry_speed
    }

    fn grounded_profile(&self, technique: StrikeTechnique, pre_strike_duration: f64) -> StrikeProfile {
        StrikeProfile {
            technique,
            pre_strike_duration,
            approach_backoff: self.backoff(pre_strike_duration),
            dodge_speed_boost: self.settings.dodge_speed_boost,
            correction_budget: 0.0,
            risk_cost: technique.base_risk(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use volley_core::{Angle, Vector2};

    fn at_height(h: f64) -> Vector3 {
        Vector3::new(0.0, 0.0, h)
    }

    #[test]
    fn low_ball_straight_on_is_a_chip() {
        let catalog = StrikeCatalog::default();
        for h in [0.0, 0.5, 1.0, 1.5, 1.99] {
            let profile = catalog.profile_for(&at_height(h), 0.0, 0.0).unwrap();
            assert_eq!(profile.technique, StrikeTechnique::Chip, "height {h}");
        }
        let profile = catalog.profile_for(&at_height(1.0), 0.0, 0.0).unwrap();
        assert_eq!(profile.pre_strike_duration, 0.0);
        assert_eq!(profile.risk_cost, 0.0);
    }

    #[test]
    fn middle_band_straight_on() {
        let catalog = StrikeCatalog::default();
        let mut h = 2.0;
        while h < 4.8 {
            let technique = catalog.profile_for(&at_height(h), 0.0, 0.0).unwrap().technique;
            if h <= 3.2 {
                assert_eq!(technique, StrikeTechnique::FlipHit, "height {h}");
            } else {
                assert_eq!(technique, StrikeTechnique::JumpHit, "height {h}");
            }
            h += 0.05;
        }
    }

    #[test]
    fn chip_is_the_cheapest() {
        let catalog = StrikeCatalog::default();
        let chip = catalog.chip();
        for other in [catalog.flip_hit(), catalog.jump_hit(4.0), catalog.diagonal_hit(3.0), catalog.side_hit(3.0)] {
            assert!(chip.pre_strike_duration < other.pre_strike_duration);
            assert!(chip.risk_cost < other.risk_cost);
        }
    }

    #[test]
    fn duration_never_drops_within_a_band() {
        let catalog = StrikeCatalog::default();
        let mut last: Option<StrikeProfile> = None;
        let mut h = 0.0;
        while h < 12.0 {
            let profile = catalog.profile_for(&at_height(h), 0.0, 100.0).unwrap();
            if let Some(prev) = last {
                if prev.technique == profile.technique {
                    assert!(profile.pre_strike_duration >= prev.pre_strike_duration, "height {h}");
                }
            }
            last = Some(profile);
            h += 0.05;
        }
    }

    #[test]
    fn angled_durations_never_drop_with_height() {
        let catalog = StrikeCatalog::default();
        for (x, y, technique) in [
            (0.0, 0.0, StrikeTechnique::DiagonalHit),
            (5.0, 90.0, StrikeTechnique::SideHit),
        ] {
            let mut last = 0.0;
            let mut h = 0.0;
            while h < 4.8 {
                let profile = catalog.profile_for(&Vector3::new(x, y, h), PI / 3.0, 100.0).unwrap();
                assert_eq!(profile.technique, technique, "height {h}");
                assert!(profile.pre_strike_duration >= last, "{technique} at height {h}");
                last = profile.pre_strike_duration;
                h += 0.05;
            }
        }
    }

    #[test]
    fn high_ball_without_boost_has_no_profile() {
        let catalog = StrikeCatalog::default();
        assert!(catalog.profile_for(&at_height(5.0), 0.0, 10.0).is_none());
        let aerial = catalog.profile_for(&at_height(5.0), 0.0, 100.0).unwrap();
        assert_eq!(aerial.technique, StrikeTechnique::Aerial);
    }

    #[test]
    fn long_aerial_loses_its_dodge() {
        let catalog = StrikeCatalog::default();
        let short = catalog.aerial(6.0, 100.0).unwrap();
        assert!(short.correction_budget > 0.0);
        assert!(short.dodge_speed_boost > 0.0);

        let long = catalog.aerial(30.0, 100.0).unwrap();
        assert!(long.pre_strike_duration > 1.4);
        assert_eq!(long.correction_budget, 0.0);
        assert_eq!(long.dodge_speed_boost, 0.0);
        assert!(long.risk_cost > short.risk_cost);
    }

    #[test]
    fn aerial_must_fit_the_tank() {
        let catalog = StrikeCatalog::default();
        // Plenty of height for a long climb, barely above the minimum tank.
        assert!(catalog.aerial(30.0, 21.0).is_none());
    }

    #[test]
    fn angled_approach_selection() {
        let catalog = StrikeCatalog::default();
        let midfield = Vector3::new(0.0, 0.0, 1.0);
        let slightly = catalog.profile_for(&midfield, PI / 10.0, 0.0).unwrap();
        assert_eq!(slightly.technique, StrikeTechnique::Chip);

        let wide = catalog.profile_for(&midfield, PI / 3.0, 0.0).unwrap();
        assert_eq!(wide.technique, StrikeTechnique::DiagonalHit);

        let near_goal = Vector3::new(5.0, 90.0, 1.0);
        let side = catalog.profile_for(&near_goal, PI / 3.0, 0.0).unwrap();
        assert_eq!(side.technique, StrikeTechnique::SideHit);

        let modest_near_goal = catalog.profile_for(&near_goal, PI / 5.0, 0.0).unwrap();
        assert_eq!(modest_near_goal.technique, StrikeTechnique::DiagonalHit);
    }

    #[test]
    fn vertical_access_needs_time() {
        let catalog = StrikeCatalog::default();
        let car = CarData::grounded(10.0, Vector2::zeros(), Angle::default(), 0.0, 0.0);
        let profile = catalog.jump_hit(4.0);
        let jump = catalog.vertical().jump_time(4.0).unwrap();
        let soon = TimedPosition::new(at_height(4.0), 10.0 + jump - 0.5);
        let later = TimedPosition::new(at_height(4.0), 10.0 + jump + 0.5);
        assert!(!catalog.vertically_accessible(&car, &soon, &profile));
        assert!(catalog.vertically_accessible(&car, &later, &profile));
    }

    #[test]
    fn chip_access_waits_for_the_jump() {
        // A chip has no pre-strike time, but the ball still has to be within
        // a jump of the car.
        let catalog = StrikeCatalog::default();
        let car = CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 0.0, 0.0);
        let profile = catalog.chip();
        let jump = catalog.vertical().jump_time(1.9).unwrap();
        assert!(jump > 0.15);

        let rushed = TimedPosition::new(at_height(1.9), 0.05);
        assert!(!catalog.vertically_accessible(&car, &rushed, &profile));
        let in_time = TimedPosition::new(at_height(1.9), jump);
        assert!(catalog.vertically_accessible(&car, &in_time, &profile));
    }

    #[test]
    fn aerial_access_needs_boost() {
        let catalog = StrikeCatalog::default();
        let broke = CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 0.0, 10.0);
        let rich = CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 0.0, 100.0);
        let contact = TimedPosition::new(at_height(8.0), 3.0);
        let profile = catalog.aerial(8.0, 100.0).unwrap();
        assert!(!catalog.vertically_accessible(&broke, &contact, &profile));
        assert!(catalog.vertically_accessible(&rich, &contact, &profile));
    }
}
