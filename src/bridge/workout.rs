//! Workout session bridge
//!
//! Holds the active session in thread-local storage (WASM is
//! single-threaded) and exposes the small JS-polled surface: exercise
//! selection, user workout targets, the per-frame evaluation tick, the
//! serialized session state, and the one-shot rep cue the host drains
//! to play its audio feedback.

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::engine::config::{Exercise, WorkoutTargets};
use crate::engine::session::{evaluate, SessionState};

use super::keypoints;

struct WorkoutSession {
    state: SessionState,
    targets: WorkoutTargets,
    /// Set when a rep is counted, cleared when the host polls it
    rep_cue: bool,
}

impl Default for WorkoutSession {
    fn default() -> Self {
        Self {
            state: SessionState::new(None, 0.0),
            targets: WorkoutTargets::default(),
            rep_cue: false,
        }
    }
}

thread_local! {
    static SESSION: RefCell<WorkoutSession> = RefCell::new(WorkoutSession::default());
}

/// Select the active exercise (or `"none"` to idle) and start a fresh
/// session for it. `now_ms` is the host clock (`performance.now()`).
#[wasm_bindgen]
pub fn select_exercise(id: &str, now_ms: f64) -> Result<(), JsValue> {
    let exercise = match id {
        "none" => None,
        _ => Some(
            Exercise::from_id(id)
                .ok_or_else(|| JsValue::from_str(&format!("Unknown exercise: {}", id)))?,
        ),
    };

    SESSION.with(|cell| {
        let mut session = cell.borrow_mut();
        session.state = SessionState::new(exercise, now_ms / 1000.0);
        session.rep_cue = false;
    });
    web_sys::console::log_1(&format!("Exercise selected: {}", id).into());
    Ok(())
}

/// Apply user-adjustable workout targets (reps / sets / rest). Form
/// thresholds are not adjustable and stay with the rule table.
#[wasm_bindgen]
pub fn set_workout_targets(targets: JsValue) -> Result<(), JsValue> {
    let targets: WorkoutTargets =
        serde_wasm_bindgen::from_value(targets).map_err(|e| JsValue::from_str(&e.to_string()))?;
    SESSION.with(|cell| cell.borrow_mut().targets = targets);
    Ok(())
}

/// Run one evaluation tick against the most recent pose frame.
/// Called from the host's frame loop, after `update_pose`.
#[wasm_bindgen]
pub fn evaluate_frame(now_ms: f64) {
    let frame = keypoints::current_frame();

    SESSION.with(|cell| {
        let mut session = cell.borrow_mut();
        let Some(exercise) = session.state.exercise else {
            return;
        };

        let cfg = exercise.config().with_targets(&session.targets);
        let next = evaluate(&session.state, frame.as_ref(), &cfg, now_ms / 1000.0);

        if next.total_reps > session.state.total_reps {
            session.rep_cue = true;
        }
        session.state = next;
    });
}

/// Serialized `SessionState` for the dashboard and overlay
#[wasm_bindgen]
pub fn session_state() -> Result<JsValue, JsValue> {
    SESSION.with(|cell| {
        serde_wasm_bindgen::to_value(&cell.borrow().state)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

/// One-shot rep event for the host's audio cue: true at most once per
/// counted repetition
#[wasm_bindgen]
pub fn take_rep_cue() -> bool {
    SESSION.with(|cell| {
        let mut session = cell.borrow_mut();
        std::mem::take(&mut session.rep_cue)
    })
}

/// Static guide data for the form panel
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseGuide {
    name: &'static str,
    target_reps: u32,
    target_sets: u32,
    rest_secs: f64,
    instructions: &'static [&'static str],
    muscles: &'static [&'static str],
}

/// Display name, defaults, instructions and targeted muscles for an
/// exercise, for the host's guide panel
#[wasm_bindgen]
pub fn exercise_guide(id: &str) -> Result<JsValue, JsValue> {
    let exercise = Exercise::from_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown exercise: {}", id)))?;
    let cfg = exercise.config();
    let guide = ExerciseGuide {
        name: cfg.name,
        target_reps: cfg.target_reps,
        target_sets: cfg.target_sets,
        rest_secs: cfg.rest_secs,
        instructions: cfg.instructions,
        muscles: cfg.muscles,
    };
    serde_wasm_bindgen::to_value(&guide).map_err(|e| JsValue::from_str(&e.to_string()))
}
