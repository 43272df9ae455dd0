// Library surface: the game core plus the host plumbing the binary and the
// integration tests share.
pub mod app;
pub mod app_dirs;
pub mod beatmap;
pub mod clock;
pub mod config;
pub mod feedback;
pub mod hit_target;
pub mod judge;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod ui;
pub mod util;

pub use beatmap::{Beatmap, BeatmapError};
pub use hit_target::{HitTarget, Point, TargetState, TargetTiming};
pub use judge::{Judgement, ScoringModel, Tier, TimingJudge};
pub use session::{ClickEvent, ClickPolicy, Session, SessionConfig, SessionOutcome};
pub use snapshot::SessionSnapshot;
