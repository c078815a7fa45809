//! Session state and the per-frame evaluation entry point
//!
//! `evaluate` is the engine's single operation: a total function from
//! (previous state, pose frame, config, now) to the next state. The
//! caller owns the state and re-supplies it each frame; nothing is
//! retained between calls.

use std::collections::BTreeSet;

use serde::Serialize;

use super::config::{Exercise, ExerciseConfig};
use super::counter::{MotionState, MotionTracker, StepOutcome};
use super::form::{self, FormQuality};
use super::pose::{Joint, PoseFrame};
use super::scheduler;

/// The aggregate workout record threaded through every evaluation call
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Active exercise, or `None` when tracking is idle
    pub exercise: Option<Exercise>,
    pub motion: MotionTracker,
    /// Reps completed in the current set; always below the target -
    /// reaching it immediately rolls into the set boundary
    pub rep_count: u32,
    /// Completed sets, saturating at the target
    pub set_count: u32,
    pub total_reps: u32,
    /// Reps whose counting transition happened with valid form
    pub correct_form_reps: u32,
    /// Time of the last counted rep or rest-period start (caller clock,
    /// seconds); drives both the cooldown and the rest countdown
    pub last_rep_at: f64,
    /// Form status of the current frame
    pub form_valid: bool,
    pub form_quality: FormQuality,
    /// Joints currently failing a form check
    pub flagged: BTreeSet<Joint>,
    /// Feedback produced this evaluation; rebuilt every call
    pub feedback: Vec<String>,
}

impl SessionState {
    /// Fresh state for a newly selected exercise (or idle for `None`)
    pub fn new(exercise: Option<Exercise>, now: f64) -> Self {
        Self {
            exercise,
            motion: MotionTracker::new(),
            rep_count: 0,
            set_count: 0,
            total_reps: 0,
            correct_form_reps: 0,
            last_rep_at: now,
            form_valid: true,
            form_quality: FormQuality::Excellent,
            flagged: BTreeSet::new(),
            feedback: Vec::new(),
        }
    }
}

/// Evaluate one pose frame against the previous session state.
///
/// Total over well-formed input: an idle session is a no-op, a frame
/// with unusable pose data degrades to feedback with `form_valid =
/// false` and no state-machine progress. `now` is the caller's clock
/// in seconds; `frame` is `None` when no pose was detected at all.
pub fn evaluate(
    prev: &SessionState,
    frame: Option<&PoseFrame>,
    cfg: &ExerciseConfig,
    now: f64,
) -> SessionState {
    let Some(exercise) = prev.exercise else {
        return prev.clone();
    };

    let mut next = prev.clone();
    next.feedback.clear();
    next.flagged.clear();
    next.form_valid = true;

    // Resting is pure wall-clock: no form, no motion metrics
    if next.motion.state == MotionState::Resting {
        scheduler::tick_rest(&mut next, cfg, now);
        return next;
    }

    let Some(frame) = frame else {
        next.feedback
            .push("Cannot detect required landmarks".to_string());
        next.form_valid = false;
        next.form_quality = FormQuality::Poor;
        return next;
    };

    let assessment = match form::assess(exercise, frame, cfg, next.motion.state) {
        Ok(a) => a,
        Err(gap) => {
            // Missing or low-confidence joints: stall in place rather
            // than guess - never claim correct form on incomplete data
            next.feedback.push(gap.message.to_string());
            next.form_valid = false;
            next.form_quality = FormQuality::Poor;
            return next;
        }
    };

    next.form_valid = assessment.form_valid();
    next.form_quality = assessment.quality();
    next.flagged = assessment.flagged.clone();
    next.feedback.extend(assessment.feedback.iter().cloned());

    if !next.form_valid {
        // Mid-rep the machine pauses; from Starting it simply holds
        if next.motion.pause_for_form() {
            next.feedback
                .push("Fix your form to continue counting reps".to_string());
        }
        return next;
    }

    if next.motion.state == MotionState::IncorrectForm {
        next.motion.resume(assessment.metric, &cfg.band);
        next.feedback
            .push("Good form, continue your exercise".to_string());
    }

    match next
        .motion
        .advance(assessment.metric, &cfg.band, now - next.last_rep_at)
    {
        StepOutcome::RepCounted => {
            next.rep_count += 1;
            next.total_reps += 1;
            if next.form_valid {
                next.correct_form_reps += 1;
            }
            next.last_rep_at = now;

            if next.rep_count >= cfg.target_reps {
                scheduler::complete_set(&mut next, cfg, now);
            }
        }
        // A crossing inside the cooldown window is measurement noise;
        // the transition stands, the rep is dropped without feedback
        StepOutcome::CooldownDropped | StepOutcome::Hold => {}
    }

    next
}
