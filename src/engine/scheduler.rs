//! Set completion and rest scheduling
//!
//! Invoked by the session layer when `rep_count` reaches the target and
//! on every frame spent in `Resting`. The set counter saturates at the
//! target; completions past the cap only repeat the workout-complete
//! message so an over-achiever cannot overflow the dashboard.

use super::config::ExerciseConfig;
use super::session::SessionState;

/// Close out the current set: bump the set counter, reset the rep
/// counter and enter the rest period. `last_rep_at` doubles as the
/// rest-period start marker.
pub fn complete_set(state: &mut SessionState, cfg: &ExerciseConfig, now: f64) {
    state.rep_count = 0;
    state.motion.begin_rest();
    state.last_rep_at = now;

    if state.set_count < cfg.target_sets {
        state.set_count += 1;
        if state.set_count == cfg.target_sets {
            state
                .feedback
                .push("Workout complete! Great job!".to_string());
        } else {
            state.feedback.push(format!(
                "Set {} complete! Rest for {} seconds.",
                state.set_count, cfg.rest_secs
            ));
        }
    } else {
        state
            .feedback
            .push("Workout complete! Great job!".to_string());
    }
}

/// One frame of rest: either count down or re-arm for the next set.
/// Form and motion are not evaluated while resting. Past the final set
/// the machine still re-arms (the user may keep going) but no further
/// set is announced.
pub fn tick_rest(state: &mut SessionState, cfg: &ExerciseConfig, now: f64) {
    let elapsed = now - state.last_rep_at;
    if elapsed >= cfg.rest_secs {
        state.motion.rearm();
        if state.set_count < cfg.target_sets {
            state
                .feedback
                .push(format!("Starting set {}", state.set_count + 1));
        } else {
            state
                .feedback
                .push("Workout complete! Great job!".to_string());
        }
    } else {
        let remaining = (cfg.rest_secs - elapsed).ceil() as u64;
        state.feedback.push(format!("Rest: {}s remaining", remaining));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{Exercise, WorkoutTargets, SQUAT};
    use crate::engine::counter::MotionState;
    use crate::engine::session::SessionState;

    fn state_at(reps_done: u32, sets_done: u32, now: f64) -> SessionState {
        let mut s = SessionState::new(Some(Exercise::Squat), now);
        s.rep_count = reps_done;
        s.set_count = sets_done;
        s
    }

    #[test]
    fn set_completion_resets_reps_and_starts_rest() {
        let mut s = state_at(15, 0, 100.0);
        complete_set(&mut s, &SQUAT, 100.0);
        assert_eq!(s.rep_count, 0);
        assert_eq!(s.set_count, 1);
        assert_eq!(s.motion.state, MotionState::Resting);
        assert_eq!(s.last_rep_at, 100.0);
        assert!(s.feedback[0].starts_with("Set 1 complete!"));
    }

    #[test]
    fn set_counter_saturates_at_target() {
        let cfg = SQUAT.with_targets(&WorkoutTargets {
            target_sets: Some(2),
            ..Default::default()
        });

        let mut s = state_at(15, 1, 0.0);
        complete_set(&mut s, &cfg, 0.0);
        assert_eq!(s.set_count, 2);
        assert!(s.feedback[0].starts_with("Workout complete!"));

        s.feedback.clear();
        complete_set(&mut s, &cfg, 1.0);
        assert_eq!(s.set_count, 2); // no further increments
        assert!(s.feedback[0].starts_with("Workout complete!"));
    }

    #[test]
    fn rest_counts_down_then_rearms() {
        let mut s = state_at(0, 1, 100.0);
        s.motion.begin_rest();
        s.last_rep_at = 100.0;

        tick_rest(&mut s, &SQUAT, 104.0);
        assert_eq!(s.motion.state, MotionState::Resting);
        assert_eq!(s.feedback[0], "Rest: 6s remaining");

        s.feedback.clear();
        tick_rest(&mut s, &SQUAT, 110.0);
        assert_eq!(s.motion.state, MotionState::Starting);
        assert_eq!(s.feedback[0], "Starting set 2");
    }

    #[test]
    fn rest_after_final_set_announces_no_further_set() {
        let cfg = SQUAT.with_targets(&WorkoutTargets {
            target_sets: Some(2),
            ..Default::default()
        });

        let mut s = state_at(0, 2, 100.0); // all sets done
        s.motion.begin_rest();
        s.last_rep_at = 100.0;

        tick_rest(&mut s, &cfg, 111.0);
        assert_eq!(s.motion.state, MotionState::Starting);
        assert_eq!(s.feedback[0], "Workout complete! Great job!");
        assert!(!s.feedback.iter().any(|f| f.starts_with("Starting set")));
    }
}
