//! Exercise evaluation engine
//!
//! Pure per-frame core: geometry → form checks → rep state machine →
//! set/rest scheduling. All state is explicit in `SessionState` and the
//! engine is a total state-transition function over
//! (previous state, pose frame, config, now) with no hidden state, no
//! clock reads and no I/O, so it runs identically under wasm and in
//! host-side tests.

pub mod config;
pub mod counter;
pub mod form;
pub mod geometry;
pub mod pose;
pub mod scheduler;
pub mod session;

pub use config::{Exercise, ExerciseConfig, WorkoutTargets};
pub use counter::{MotionState, MotionTracker};
pub use form::{FormQuality, FrameAssessment};
pub use pose::{Joint, Keypoint, PoseFrame};
pub use session::{evaluate, SessionState};
