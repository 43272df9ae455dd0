//! Click judgement: maps a click's distance and timing offset against a
//! target into a score tier.

use crate::hit_target::{HitTarget, Point, TargetState};
use clap::ValueEnum;

pub const CIRCLE_RADIUS: f64 = 50.0;
pub const MAX_POINTS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Tier {
    Perfect,
    Great,
    Good,
    Miss,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Perfect, Tier::Great, Tier::Good, Tier::Miss];

    pub fn points(&self) -> u32 {
        match self {
            Tier::Perfect => 300,
            Tier::Great => 100,
            Tier::Good => 50,
            Tier::Miss => 0,
        }
    }

    pub fn health_delta(&self) -> i32 {
        match self {
            Tier::Perfect => 5,
            Tier::Great => 2,
            Tier::Good => 1,
            Tier::Miss => -20,
        }
    }

    pub fn is_hit(&self) -> bool {
        !matches!(self, Tier::Miss)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Perfect => "Perfect!",
            Tier::Great => "Great!",
            Tier::Good => "Good!",
            Tier::Miss => "Miss!",
        }
    }
}

/// Outcome of judging one click against one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgement {
    pub tier: Tier,
    pub points: u32,
    pub health_delta: i32,
    /// click time minus target time; negative when early
    pub offset_ms: i64,
}

impl Judgement {
    pub fn from_tier(tier: Tier, offset_ms: i64) -> Self {
        Self {
            tier,
            points: tier.points(),
            health_delta: tier.health_delta(),
            offset_ms,
        }
    }
}

/// Tier thresholds. The outer window belongs to the target
/// (`TargetTiming::hit_window_ms`) and is passed in per judgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgeWindows {
    pub perfect_ms: i64,
    pub great_ms: i64,
    pub good_ms: i64,
}

impl Default for JudgeWindows {
    fn default() -> Self {
        Self {
            perfect_ms: 50,
            great_ms: 100,
            good_ms: 200,
        }
    }
}

impl JudgeWindows {
    pub fn tier_for(&self, time_diff_ms: i64, hit_window_ms: i64) -> Option<Tier> {
        let abs_diff = time_diff_ms.abs();

        if abs_diff > hit_window_ms {
            None
        } else if abs_diff <= self.perfect_ms {
            Some(Tier::Perfect)
        } else if abs_diff <= self.great_ms {
            Some(Tier::Great)
        } else if abs_diff <= self.good_ms {
            Some(Tier::Good)
        } else {
            // inside the hit window but too far off to count
            Some(Tier::Miss)
        }
    }
}

/// Classifies a single click against a single candidate target.
///
/// Judges are pure; applying the result to the target is the session's job.
pub trait TimingJudge: std::fmt::Debug {
    fn judge(&self, click: Point, click_time: i64, target: &HitTarget) -> Option<Judgement>;
}

fn within_radius(click: Point, target: &HitTarget, radius: f64) -> bool {
    click.distance_sq(target.position) <= radius * radius
}

/// Discrete Perfect/Great/Good/Miss judging.
#[derive(Debug, Clone, Copy)]
pub struct TieredJudge {
    pub radius: f64,
    pub windows: JudgeWindows,
}

impl Default for TieredJudge {
    fn default() -> Self {
        Self {
            radius: CIRCLE_RADIUS,
            windows: JudgeWindows::default(),
        }
    }
}

impl TimingJudge for TieredJudge {
    fn judge(&self, click: Point, click_time: i64, target: &HitTarget) -> Option<Judgement> {
        if target.state() != TargetState::Active || !within_radius(click, target, self.radius) {
            return None;
        }

        let offset = click_time - target.target_time;
        self.windows
            .tier_for(offset, target.timing.hit_window_ms)
            .map(|tier| Judgement::from_tier(tier, offset))
    }
}

/// Single-window judging with points interpolated linearly between
/// `max_points` (dead on) and `min_points` (edge of the target's window).
#[derive(Debug, Clone, Copy)]
pub struct LinearJudge {
    pub radius: f64,
    pub max_points: u32,
    pub min_points: u32,
    pub health_gain: i32,
}

impl Default for LinearJudge {
    fn default() -> Self {
        Self {
            radius: CIRCLE_RADIUS,
            max_points: MAX_POINTS,
            min_points: 50,
            health_gain: 10,
        }
    }
}

impl LinearJudge {
    /// A `min_points` above `max_points` is treated as `max_points`.
    pub fn points_for(&self, time_diff_ms: i64, hit_window_ms: i64) -> u32 {
        let floor = self.min_points.min(self.max_points);
        let span = (self.max_points - floor) as i64;
        let lost = span * time_diff_ms.abs() / hit_window_ms.max(1);
        (self.max_points as i64 - lost).clamp(floor as i64, self.max_points as i64) as u32
    }

    fn display_tier(points: u32) -> Tier {
        if points >= 250 {
            Tier::Perfect
        } else if points >= 150 {
            Tier::Great
        } else {
            Tier::Good
        }
    }
}

impl TimingJudge for LinearJudge {
    fn judge(&self, click: Point, click_time: i64, target: &HitTarget) -> Option<Judgement> {
        if target.state() != TargetState::Active || !within_radius(click, target, self.radius) {
            return None;
        }

        let offset = click_time - target.target_time;
        let hit_window_ms = target.timing.hit_window_ms;
        if offset.abs() > hit_window_ms {
            return None;
        }

        let points = self.points_for(offset, hit_window_ms);
        Some(Judgement {
            tier: Self::display_tier(points),
            points,
            health_delta: self.health_gain,
            offset_ms: offset,
        })
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum ScoringModel {
    #[default]
    Tiered,
    Linear,
}

impl ScoringModel {
    pub fn judge(&self) -> Box<dyn TimingJudge> {
        match self {
            ScoringModel::Tiered => Box::new(TieredJudge::default()),
            ScoringModel::Linear => Box::new(LinearJudge::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit_target::TargetTiming;
    use assert_matches::assert_matches;

    const CENTER: Point = Point { x: 400.0, y: 300.0 };

    fn active_target() -> HitTarget {
        let mut t = HitTarget::new(CENTER, 1000, 1, TargetTiming::default());
        t.activate(0);
        t
    }

    #[test]
    fn test_tier_table() {
        assert_eq!(Tier::Perfect.points(), 300);
        assert_eq!(Tier::Great.points(), 100);
        assert_eq!(Tier::Good.points(), 50);
        assert_eq!(Tier::Miss.points(), 0);
        assert_eq!(Tier::Miss.health_delta(), -20);
        assert!(Tier::Good.is_hit());
        assert!(!Tier::Miss.is_hit());
        assert_eq!(Tier::Great.to_string(), "Great");
        assert_eq!(Tier::Great.label(), "Great!");
    }

    #[test]
    fn test_windows_boundaries() {
        let w = JudgeWindows::default();
        assert_eq!(w.tier_for(0, 300), Some(Tier::Perfect));
        assert_eq!(w.tier_for(-50, 300), Some(Tier::Perfect));
        assert_eq!(w.tier_for(51, 300), Some(Tier::Great));
        assert_eq!(w.tier_for(100, 300), Some(Tier::Great));
        assert_eq!(w.tier_for(-101, 300), Some(Tier::Good));
        assert_eq!(w.tier_for(200, 300), Some(Tier::Good));
        assert_eq!(w.tier_for(201, 300), Some(Tier::Miss));
        assert_eq!(w.tier_for(-300, 300), Some(Tier::Miss));
        assert_eq!(w.tier_for(301, 300), None);
        // the outer window comes from the caller
        assert_eq!(w.tier_for(450, 500), Some(Tier::Miss));
        assert_eq!(w.tier_for(150, 120), None);
    }

    #[test]
    fn test_tiered_perfect_click() {
        let judge = TieredJudge::default();
        let j = judge.judge(CENTER, 1020, &active_target()).unwrap();
        assert_eq!(j.tier, Tier::Perfect);
        assert_eq!(j.points, 300);
        assert_eq!(j.health_delta, 5);
        assert_eq!(j.offset_ms, 20);
    }

    #[test]
    fn test_tiered_good_click() {
        let judge = TieredJudge::default();
        let j = judge.judge(CENTER, 1150, &active_target()).unwrap();
        assert_eq!(j.tier, Tier::Good);
        assert_eq!(j.points, 50);
        assert_eq!(j.health_delta, 1);
    }

    #[test]
    fn test_tiered_rejects_outside_radius() {
        let judge = TieredJudge::default();
        let target = active_target();
        // exactly on the rim still counts
        assert!(judge.judge(Point::new(450.0, 300.0), 1000, &target).is_some());
        assert_eq!(judge.judge(Point::new(450.5, 300.0), 1000, &target), None);
        assert_eq!(judge.judge(Point::new(440.0, 340.0), 1000, &target), None);
    }

    #[test]
    fn test_tiered_rejects_inactive_targets() {
        let judge = TieredJudge::default();
        let pending = HitTarget::new(CENTER, 1000, 1, TargetTiming::default());
        assert_eq!(judge.judge(CENTER, 1000, &pending), None);

        let mut hit = active_target();
        hit.resolve(Tier::Perfect);
        assert_eq!(judge.judge(CENTER, 1000, &hit), None);

        let mut expired = active_target();
        expired.try_resolve_expiry(2000);
        assert_eq!(judge.judge(CENTER, 1000, &expired), None);
    }

    #[test]
    fn test_tiered_early_click_outside_window() {
        let judge = TieredJudge::default();
        assert_eq!(judge.judge(CENTER, 500, &active_target()), None);
        assert_matches!(
            judge.judge(CENTER, 750, &active_target()),
            Some(Judgement {
                tier: Tier::Miss,
                offset_ms: -250,
                ..
            })
        );
    }

    #[test]
    fn test_points_non_increasing_with_offset() {
        let target = active_target();
        for model in [ScoringModel::Tiered, ScoringModel::Linear] {
            let judge = model.judge();
            let mut last = u32::MAX;
            for diff in 0..=400 {
                let points = judge
                    .judge(CENTER, 1000 + diff, &target)
                    .map(|j| j.points)
                    .unwrap_or(0);
                assert!(points <= last, "{model}: points rose at +{diff}ms");
                last = points;
            }
            assert_eq!(judge.judge(CENTER, 1301, &target), None);
            assert_eq!(judge.judge(CENTER, 699, &target), None);
        }
    }

    #[test]
    fn test_linear_points() {
        let judge = LinearJudge::default();
        assert_eq!(judge.points_for(0, 300), 300);
        assert_eq!(judge.points_for(150, 300), 175);
        assert_eq!(judge.points_for(-150, 300), 175);
        assert_eq!(judge.points_for(300, 300), 50);
        assert_eq!(judge.points_for(1000, 300), 50);
        assert_eq!(judge.points_for(250, 500), 175);
    }

    #[test]
    fn test_linear_points_with_inverted_bounds() {
        let judge = LinearJudge {
            min_points: 400,
            ..LinearJudge::default()
        };
        assert_eq!(judge.points_for(0, 300), 300);
        assert_eq!(judge.points_for(200, 300), 300);
    }

    #[test]
    fn test_judges_use_the_target_window() {
        let timing = TargetTiming {
            hit_window_ms: 500,
            ..TargetTiming::default()
        };
        let mut target = HitTarget::new(CENTER, 1000, 1, timing);
        target.activate(0);

        let tiered = TieredJudge::default().judge(CENTER, 1400, &target).unwrap();
        assert_eq!(tiered.tier, Tier::Miss);
        assert_eq!(tiered.offset_ms, 400);

        let linear = LinearJudge::default().judge(CENTER, 1400, &target).unwrap();
        assert_eq!(linear.points, 100);
        assert_eq!(linear.tier, Tier::Good);

        assert_eq!(TieredJudge::default().judge(CENTER, 1501, &target), None);
        assert_eq!(LinearJudge::default().judge(CENTER, 1501, &target), None);
    }

    #[test]
    fn test_linear_never_misses_in_window() {
        let judge = LinearJudge::default();
        let target = active_target();
        let j = judge.judge(CENTER, 1299, &target).unwrap();
        assert_eq!(j.tier, Tier::Good);
        assert!(j.points >= 50);
        assert_eq!(j.health_delta, 10);

        let j = judge.judge(CENTER, 1010, &target).unwrap();
        assert_eq!(j.tier, Tier::Perfect);
        assert_eq!(j.points, 292);
    }

    #[test]
    fn test_scoring_model_display() {
        assert_eq!(ScoringModel::default(), ScoringModel::Tiered);
        assert_eq!(ScoringModel::Linear.to_string(), "Linear");
    }
}
