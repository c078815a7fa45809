//! FormFit Web - WASM exercise evaluation engine
//!
//! Turns per-frame pose keypoints into rep counts, set/rest scheduling
//! and form-correctness feedback for five exercise types. The host page
//! runs camera capture, MoveNet inference and rendering; this module
//! owns only the evaluation.
//!
//! Entry points that delegate to submodules:
//! - `bridge::update_pose` / `clear_pose`: per-frame keypoint transfer
//! - `bridge::select_exercise` / `set_workout_targets`: configuration
//! - `bridge::evaluate_frame` / `session_state` / `take_rep_cue`: the
//!   evaluation tick and its outputs

mod bridge;
pub mod engine;

use wasm_bindgen::prelude::*;

pub use bridge::{
    clear_pose, evaluate_frame, exercise_guide, select_exercise, session_state,
    set_workout_targets, take_rep_cue, update_pose,
};

/// Called automatically when the WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
