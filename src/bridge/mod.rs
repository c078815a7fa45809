//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod keypoints;
mod workout;

pub use keypoints::{clear_pose, update_pose};
pub use workout::{
    evaluate_frame, exercise_guide, select_exercise, session_state, set_workout_targets,
    take_rep_cue,
};
