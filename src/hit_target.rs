use crate::judge::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(i32, i32)> for Point {
    fn from(v: (i32, i32)) -> Self {
        Point::new(v.0 as f64, v.1 as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Pending,
    Active,
    Hit,
    Expired,
}

/// Per-target timing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTiming {
    pub approach_ms: i64,
    pub hit_window_ms: i64,
}

impl Default for TargetTiming {
    fn default() -> Self {
        Self {
            approach_ms: 1200,
            hit_window_ms: 300,
        }
    }
}

pub const MIN_APPROACH_RATIO: f64 = 1.0;
pub const MAX_APPROACH_RATIO: f64 = 2.5;

/// A single timed click target.
///
/// `Hit` and `Expired` are terminal: nothing moves a target out of them
/// except `reset`, which is only used when a map is replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTarget {
    pub position: Point,
    pub target_time: i64,
    pub sequence_number: usize,
    pub timing: TargetTiming,
    state: TargetState,
    resolved_tier: Option<Tier>,
}

impl HitTarget {
    pub fn new(
        position: Point,
        target_time: i64,
        sequence_number: usize,
        timing: TargetTiming,
    ) -> Self {
        Self {
            position,
            target_time,
            sequence_number,
            timing,
            state: TargetState::Pending,
            resolved_tier: None,
        }
    }

    pub fn state(&self) -> TargetState {
        self.state
    }

    pub fn resolved_tier(&self) -> Option<Tier> {
        self.resolved_tier
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, TargetState::Hit | TargetState::Expired)
    }

    /// Scale of the approach ring, 2.5 when it first appears down to 1.0 at
    /// the target time. Render-only.
    pub fn approach_ratio(&self, now: i64) -> f64 {
        let remaining = (self.target_time - now) as f64;
        (remaining / self.timing.approach_ms as f64 + 1.0)
            .clamp(MIN_APPROACH_RATIO, MAX_APPROACH_RATIO)
    }

    pub fn is_visible(&self, now: i64) -> bool {
        matches!(self.state, TargetState::Pending | TargetState::Active)
            && self.target_time - now < self.timing.approach_ms
    }

    /// Moves a pending target to `Active` once its approach ring starts
    /// closing. Returns true on transition.
    pub fn activate(&mut self, now: i64) -> bool {
        if self.state == TargetState::Pending && self.is_visible(now) {
            self.state = TargetState::Active;
            true
        } else {
            false
        }
    }

    /// Expires an active target whose hit window has fully elapsed.
    /// Returns true only on the call that performed the transition.
    pub fn try_resolve_expiry(&mut self, now: i64) -> bool {
        if self.state == TargetState::Active && now > self.target_time + self.timing.hit_window_ms
        {
            self.state = TargetState::Expired;
            self.resolved_tier = Some(Tier::Miss);
            true
        } else {
            false
        }
    }

    /// Applies a judged tier. No-op unless the target is `Active`.
    pub fn resolve(&mut self, tier: Tier) -> bool {
        if self.state != TargetState::Active {
            return false;
        }
        self.state = if tier.is_hit() {
            TargetState::Hit
        } else {
            TargetState::Expired
        };
        self.resolved_tier = Some(tier);
        true
    }

    pub fn reset(&mut self) {
        self.state = TargetState::Pending;
        self.resolved_tier = None;
    }
}
