use crate::beatmap::Beatmap;
use crate::hit_target::{HitTarget, Point, TargetState};
use crate::judge::{Judgement, ScoringModel, Tier, TimingJudge, MAX_POINTS};
use crate::snapshot::{HitCause, HitEvent, SessionSnapshot, TargetView, TierCounts};
use clap::ValueEnum;
use log::{debug, info};

/// Which targets may receive a click.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum ClickPolicy {
    /// only the earliest unresolved target
    #[default]
    Strict,
    /// any active target, earliest first
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionOutcome {
    InProgress,
    Cleared,
    Failed,
    Aborted,
}

impl SessionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionOutcome::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub max_health: i32,
    pub initial_health: i32,
    pub miss_penalty: i32,
    pub click_policy: ClickPolicy,
    pub scoring: ScoringModel,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            initial_health: 100,
            miss_penalty: 20,
            click_policy: ClickPolicy::Strict,
            scoring: ScoringModel::Tiered,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub position: Point,
    pub time: i64,
}

impl ClickEvent {
    pub fn new(x: f64, y: f64, time: i64) -> Self {
        Self {
            position: Point::new(x, y),
            time,
        }
    }
}

/// One play-through of a beatmap.
///
/// Driven by the host with `tick`; `now` is expected to be non-decreasing
/// for the lifetime of the session. Retrying means building a new session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    judge: Box<dyn TimingJudge>,
    targets: Vec<HitTarget>,
    now: i64,
    score: u64,
    health: i32,
    combo: u32,
    max_combo: u32,
    cursor_index: usize,
    outcome: SessionOutcome,
    counts: TierCounts,
    hit_offsets: Vec<i64>,
}

impl Session {
    pub fn new(beatmap: &Beatmap, config: SessionConfig) -> Self {
        let judge = config.scoring.judge();
        Self::with_judge(beatmap, config, judge)
    }

    pub fn with_judge(
        beatmap: &Beatmap,
        config: SessionConfig,
        judge: Box<dyn TimingJudge>,
    ) -> Self {
        let mut targets = beatmap.targets().to_vec();
        targets.iter_mut().for_each(HitTarget::reset);

        info!(
            "Starting session on '{}' ({} targets, {} order, {} scoring)",
            beatmap.name,
            targets.len(),
            config.click_policy,
            config.scoring
        );

        Self {
            judge,
            targets,
            now: 0,
            score: 0,
            health: config.initial_health.clamp(0, config.max_health),
            combo: 0,
            max_combo: 0,
            cursor_index: 0,
            outcome: SessionOutcome::InProgress,
            counts: TierCounts::default(),
            hit_offsets: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn targets(&self) -> &[HitTarget] {
        &self.targets
    }

    pub fn counts(&self) -> TierCounts {
        self.counts
    }

    /// Signed timing offsets of every successful hit, in judgement order.
    pub fn hit_offsets(&self) -> &[i64] {
        &self.hit_offsets
    }

    /// Points earned as a percentage of the maximum for everything resolved
    /// so far.
    pub fn accuracy(&self) -> f64 {
        let resolved = self.counts.total();
        if resolved == 0 {
            return 100.0;
        }
        self.score as f64 / (resolved as f64 * MAX_POINTS as f64) * 100.0
    }

    /// Ends the session early. Only valid while in progress.
    pub fn abort(&mut self) -> bool {
        if self.outcome.is_terminal() {
            return false;
        }
        info!("Session aborted at {}ms with score {}", self.now, self.score);
        self.outcome = SessionOutcome::Aborted;
        true
    }

    /// Advances the session to `now` and applies the clicks received since
    /// the previous tick, in order.
    pub fn tick(&mut self, now: i64, clicks: &[ClickEvent]) -> SessionSnapshot {
        let mut events = Vec::new();

        if self.outcome.is_terminal() {
            return self.build_snapshot(events);
        }

        if now < self.now {
            debug!("Clock went backwards ({} < {}), holding", now, self.now);
        }
        self.now = self.now.max(now);
        let now = self.now;

        for target in self.targets[self.cursor_index..].iter_mut() {
            target.activate(now);
        }

        self.expiry_sweep(&mut events);

        for click in clicks {
            if self.health <= 0 {
                break;
            }
            self.dispatch_click(click, &mut events);
        }

        self.check_terminal();
        self.build_snapshot(events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.build_snapshot(Vec::new())
    }

    fn expiry_sweep(&mut self, events: &mut Vec<HitEvent>) {
        let now = self.now;
        for idx in self.cursor_index..self.targets.len() {
            if self.targets[idx].try_resolve_expiry(now) {
                let offset = now - self.targets[idx].target_time;
                let judgement = Judgement::from_tier(Tier::Miss, offset);
                self.apply(idx, judgement, HitCause::Expired, events);
            }
        }
        self.advance_cursor();
    }

    fn dispatch_click(&mut self, click: &ClickEvent, events: &mut Vec<HitEvent>) {
        let candidate = match self.config.click_policy {
            ClickPolicy::Strict => self.targets.get(self.cursor_index).and_then(|target| {
                self.judge
                    .judge(click.position, click.time, target)
                    .map(|j| (self.cursor_index, j))
            }),
            ClickPolicy::Free => self.targets[self.cursor_index..]
                .iter()
                .enumerate()
                .take_while(|(_, t)| t.state() != TargetState::Pending)
                .find_map(|(offset, target)| {
                    self.judge
                        .judge(click.position, click.time, target)
                        .map(|j| (self.cursor_index + offset, j))
                }),
        };

        match candidate {
            Some((idx, judgement)) => {
                if self.targets[idx].resolve(judgement.tier) {
                    self.apply(idx, judgement, HitCause::Click, events);
                    self.advance_cursor();
                }
            }
            None => debug!(
                "Stray click at ({:.0}, {:.0}) t={}",
                click.position.x, click.position.y, click.time
            ),
        }
    }

    fn apply(
        &mut self,
        idx: usize,
        mut judgement: Judgement,
        cause: HitCause,
        events: &mut Vec<HitEvent>,
    ) {
        if !judgement.tier.is_hit() {
            judgement.health_delta = -self.config.miss_penalty;
        }

        self.score += judgement.points as u64;
        self.health = (self.health + judgement.health_delta).clamp(0, self.config.max_health);

        if judgement.tier.is_hit() {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
            self.hit_offsets.push(judgement.offset_ms);
        } else {
            self.combo = 0;
        }
        self.counts.record(judgement.tier);

        let target = &self.targets[idx];
        debug!(
            "Target #{} {:?} ({:+}ms, {} pts) -> score {}, health {}",
            target.sequence_number,
            judgement.tier,
            judgement.offset_ms,
            judgement.points,
            self.score,
            self.health
        );

        events.push(HitEvent {
            sequence_number: target.sequence_number,
            position: target.position,
            judgement,
            cause,
        });
    }

    fn advance_cursor(&mut self) {
        while self
            .targets
            .get(self.cursor_index)
            .is_some_and(HitTarget::is_resolved)
        {
            self.cursor_index += 1;
        }
    }

    fn check_terminal(&mut self) {
        if self.health <= 0 {
            self.outcome = SessionOutcome::Failed;
        } else if !self.targets.is_empty() && self.targets.iter().all(HitTarget::is_resolved) {
            self.outcome = SessionOutcome::Cleared;
        }

        if self.outcome.is_terminal() {
            info!(
                "Session {} at {}ms: score {}, max combo {}, accuracy {:.2}%",
                self.outcome,
                self.now,
                self.score,
                self.max_combo,
                self.accuracy()
            );
        }
    }

    fn build_snapshot(&self, events: Vec<HitEvent>) -> SessionSnapshot {
        let now = self.now;
        SessionSnapshot {
            now,
            score: self.score,
            health: self.health,
            max_health: self.config.max_health,
            combo: self.combo,
            max_combo: self.max_combo,
            outcome: self.outcome,
            targets: self
                .targets
                .iter()
                .map(|t| TargetView {
                    sequence_number: t.sequence_number,
                    position: t.position,
                    approach_ratio: t.approach_ratio(now),
                    visible: t.is_visible(now),
                    state: t.state(),
                    tier: t.resolved_tier(),
                })
                .collect(),
            events,
            counts: self.counts,
            accuracy: self.accuracy(),
        }
    }
}
