use crate::hit_target::{Point, TargetState};
use crate::judge::{Judgement, Tier};
use crate::session::SessionOutcome;

/// Per-tier counters for one play-through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
}

impl TierCounts {
    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Perfect => self.perfect += 1,
            Tier::Great => self.great += 1,
            Tier::Good => self.good += 1,
            Tier::Miss => self.miss += 1,
        }
    }

    pub fn get(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Perfect => self.perfect,
            Tier::Great => self.great,
            Tier::Good => self.good,
            Tier::Miss => self.miss,
        }
    }

    pub fn total(&self) -> u32 {
        self.perfect + self.great + self.good + self.miss
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCause {
    Click,
    Expired,
}

/// Something the host may want to react to (feedback text, hitsound).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub sequence_number: usize,
    pub position: Point,
    pub judgement: Judgement,
    pub cause: HitCause,
}

/// Render-facing view of a single target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetView {
    pub sequence_number: usize,
    pub position: Point,
    pub approach_ratio: f64,
    pub visible: bool,
    pub state: TargetState,
    pub tier: Option<Tier>,
}

/// Read-only copy of session state handed back from every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub now: i64,
    pub score: u64,
    pub health: i32,
    pub max_health: i32,
    pub combo: u32,
    pub max_combo: u32,
    pub outcome: SessionOutcome,
    pub targets: Vec<TargetView>,
    pub events: Vec<HitEvent>,
    pub counts: TierCounts,
    pub accuracy: f64,
}

impl SessionSnapshot {
    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f64 / self.max_health as f64).clamp(0.0, 1.0)
    }

    pub fn visible_targets(&self) -> impl DoubleEndedIterator<Item = &TargetView> {
        self.targets.iter().filter(|t| t.visible)
    }
}
