//! Hit feedback: floating tier labels and a particle burst on `Perfect`.
//!
//! Everything here lives in playfield coordinates and play-clock time, so
//! pausing the clock freezes the animation too.

use crate::hit_target::Point;
use crate::judge::Tier;
use crate::snapshot::HitEvent;
use rand::Rng;

pub const POPUP_LIFETIME_MS: i64 = 1000;
/// How far a label floats up over its lifetime, in playfield units.
pub const POPUP_RISE: f64 = 40.0;
pub const BURST_SIZE: usize = 12;

const GRAVITY: f64 = 600.0;
const PARTICLE_SYMBOLS: [char; 4] = ['*', '+', '·', '✦'];

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPopup {
    pub tier: Tier,
    pub position: Point,
    pub born_ms: i64,
}

impl FeedbackPopup {
    pub fn text(&self) -> &'static str {
        self.tier.label()
    }

    fn age(&self, now: i64) -> i64 {
        (now - self.born_ms).max(0)
    }

    /// 1.0 when spawned, 0.0 once the lifetime is over.
    pub fn alpha(&self, now: i64) -> f64 {
        (1.0 - self.age(now) as f64 / POPUP_LIFETIME_MS as f64).clamp(0.0, 1.0)
    }

    pub fn rise(&self, now: i64) -> f64 {
        POPUP_RISE * (1.0 - self.alpha(now))
    }

    pub fn is_alive(&self, now: i64) -> bool {
        self.age(now) < POPUP_LIFETIME_MS
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Particle {
    fn burst_from(origin: Point, rng: &mut impl Rng) -> Self {
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let speed = rng.gen_range(120.0..260.0);
        Self {
            x: origin.x,
            y: origin.y,
            vel_x: angle.cos() * speed,
            // playfield y grows downwards; bias the burst upwards
            vel_y: angle.sin() * speed - 150.0,
            symbol: PARTICLE_SYMBOLS[rng.gen_range(0..PARTICLE_SYMBOLS.len())],
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: rng.gen_range(0.4..0.8),
        }
    }

    /// Advances by `dt` seconds. Returns false once the particle has died.
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }

    pub fn alpha(&self) -> f64 {
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default)]
pub struct Feedback {
    pub popups: Vec<FeedbackPopup>,
    pub particles: Vec<Particle>,
    last_update_ms: Option<i64>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.popups.clear();
        self.particles.clear();
        self.last_update_ms = None;
    }

    pub fn is_active(&self) -> bool {
        !self.popups.is_empty() || !self.particles.is_empty()
    }

    pub fn on_event(&mut self, event: &HitEvent, now: i64) {
        let tier = event.judgement.tier;
        self.popups.push(FeedbackPopup {
            tier,
            position: event.position,
            born_ms: now,
        });

        if tier == Tier::Perfect {
            let mut rng = rand::thread_rng();
            self.particles
                .extend((0..BURST_SIZE).map(|_| Particle::burst_from(event.position, &mut rng)));
        }
    }

    /// Ages everything to `now`, dropping what has faded out.
    pub fn update(&mut self, now: i64) {
        let dt = match self.last_update_ms {
            Some(last) => (now - last).max(0) as f64 / 1000.0,
            None => 0.0,
        };
        self.last_update_ms = Some(now);

        self.popups.retain(|p| p.is_alive(now));
        self.particles.retain_mut(|p| p.update(dt));
    }
}
