use serde::Serialize;
use volley_core::{math::flatten, Angle, CarData, ReadinessSettings, TimedPosition};

use super::{
    catalog::StrikeCatalog,
    profile::{StrikeProfile, StrikeTechnique},
    vertical::VerticalReach,
};

/// Instantaneous launch preconditions for one technique and contact.
///
/// Only [`ReadinessChecklist::ready`] may gate a launch; individual flags are
/// for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReadinessChecklist {
    pub aligned: bool,
    pub upright: bool,
    pub grounded: bool,
    pub timing_ok: bool,
    pub resources_ok: bool,
    pub not_skidding: bool,
    pub close_enough: bool,
}

impl ReadinessChecklist {
    /// Every precondition holds.
    pub fn ready(&self) -> bool {
        self.aligned
            && self.upright
            && self.grounded
            && self.timing_ok
            && self.resources_ok
            && self.not_skidding
            && self.close_enough
    }

    /// Names of the unmet preconditions, for logging.
    pub fn unmet(&self) -> Vec<&'static str> {
        [
            (self.aligned, "aligned"),
            (self.upright, "upright"),
            (self.grounded, "grounded"),
            (self.timing_ok, "timing_ok"),
            (self.resources_ok, "resources_ok"),
            (self.not_skidding, "not_skidding"),
            (self.close_enough, "close_enough"),
        ]
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, name)| name)
        .collect()
    }
}

/// Evaluates launch readiness. Pure: nothing is remembered between calls.
pub struct ReadinessEvaluator<'a, V> {
    settings: ReadinessSettings,
    catalog: &'a StrikeCatalog<V>,
}

impl<'a, V: VerticalReach> ReadinessEvaluator<'a, V> {
    pub fn new(settings: ReadinessSettings, catalog: &'a StrikeCatalog<V>) -> Self {
        Self { settings, catalog }
    }

    /// The checklist for launching `profile` toward `contact` right now.
    pub fn checklist_for(&self, profile: &StrikeProfile, car: &CarData, contact: &TimedPosition) -> ReadinessChecklist {
        let s = &self.settings;
        let seconds_till_contact = contact.time - car.time;
        let technique = profile.technique;

        let to_contact = flatten(&contact.position) - car.flat_position();
        let correction = car
            .heading()
            .map(|heading| Angle::correction(&heading, &to_contact).abs())
            .unwrap_or(std::f64::consts::PI);
        // Side and diagonal strikes launch off the contact line on purpose.
        let aligned = !technique.is_straight_on() || correction < s.alignment_tolerance;

        let is_aerial = technique == StrikeTechnique::Aerial;
        let min_boost = self.catalog.settings().aerial_min_boost;

        ReadinessChecklist {
            aligned,
            upright: car.roof.z > s.upright_threshold,
            grounded: car.has_wheel_contact,
            timing_ok: self.timing_ok(profile, seconds_till_contact, contact.position.z),
            resources_ok: !is_aerial || car.boost >= min_boost,
            not_skidding: !is_aerial || !car.is_skidding(s.skid_min_speed, s.skid_tolerance),
            close_enough: seconds_till_contact < s.close_enough_seconds,
        }
    }

    fn timing_ok(&self, profile: &StrikeProfile, seconds_till_contact: f64, height: f64) -> bool {
        let s = &self.settings;
        // Time left once an input issued now actually takes effect.
        let lagged = seconds_till_contact - s.input_lag;
        match profile.technique {
            StrikeTechnique::Chip => seconds_till_contact >= 0.0,
            StrikeTechnique::FlipHit => lagged >= 0.0 && lagged <= profile.pre_strike_duration,
            StrikeTechnique::JumpHit | StrikeTechnique::SideHit | StrikeTechnique::DiagonalHit => {
                lagged >= 0.0 && lagged < profile.pre_strike_duration
            }
            StrikeTechnique::Aerial => {
                // Launch at the last feasible instant, never early.
                let countdown = seconds_till_contact - self.catalog.vertical().ascent_time(height);
                countdown < s.aerial_ignition_window
            }
        }
    }
}
