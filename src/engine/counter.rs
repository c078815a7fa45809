//! Repetition state machine
//!
//! One generic hysteresis-band machine drives all five exercises: the
//! per-exercise part is only the counting metric and the threshold set.
//! A rep fires exactly once, on the armed crossing of `entry_up` out of
//! `Down`, and the cooldown guard drops crossings that arrive too soon
//! after the previous counted rep.

use serde::Serialize;

use super::config::{Hysteresis, REP_COOLDOWN_SECS};

/// Motion state of the active exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MotionState {
    /// Armed, no reps yet this set
    Starting,
    /// Extended / unloaded position
    Up,
    /// Flexed / loaded position
    Down,
    /// Between sets, counting down the rest period
    Resting,
    /// Form broke mid-rep; motion tracking is paused, not reset
    IncorrectForm,
}

/// What a single machine step produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// No qualifying crossing this frame
    Hold,
    /// Qualifying `Down → Up` crossing: count the rep
    RepCounted,
    /// Crossing inside the cooldown window of the previous counted rep:
    /// the transition happens, the rep is dropped as sensor noise
    CooldownDropped,
}

/// The hysteresis machine state carried inside `SessionState`.
///
/// The arm flags record whether the metric has crossed back through the
/// matching `ready_*` threshold since the last opposite transition;
/// an `entry_*` crossing only fires while its flag is set. Arming and
/// firing may happen in the same frame (arm checks run first).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionTracker {
    pub state: MotionState,
    down_armed: bool,
    up_armed: bool,
}

impl MotionTracker {
    pub fn new() -> Self {
        Self {
            state: MotionState::Starting,
            down_armed: false,
            up_armed: false,
        }
    }

    /// Advance one frame on a form-valid metric reading.
    ///
    /// `since_last_rep` is the elapsed time in seconds since the last
    /// counted rep (or rest start). `Resting` and `IncorrectForm` are
    /// handled by the session layer and hold here.
    pub fn advance(&mut self, metric: f32, band: &Hysteresis, since_last_rep: f64) -> StepOutcome {
        match self.state {
            MotionState::Starting | MotionState::Up => {
                if metric <= band.ready_down {
                    self.down_armed = true;
                }
                if self.down_armed && metric <= band.entry_down {
                    self.state = MotionState::Down;
                    self.up_armed = false;
                }
                StepOutcome::Hold
            }
            MotionState::Down => {
                if metric >= band.ready_up {
                    self.up_armed = true;
                }
                if self.up_armed && metric >= band.entry_up {
                    self.state = MotionState::Up;
                    self.down_armed = false;
                    if since_last_rep >= REP_COOLDOWN_SECS {
                        StepOutcome::RepCounted
                    } else {
                        StepOutcome::CooldownDropped
                    }
                } else {
                    StepOutcome::Hold
                }
            }
            MotionState::Resting | MotionState::IncorrectForm => StepOutcome::Hold,
        }
    }

    /// Pause when form goes invalid. Only `Up`/`Down` pause; `Starting`
    /// simply holds and `Resting` never sees form results.
    /// Returns whether the pause happened.
    pub fn pause_for_form(&mut self) -> bool {
        if matches!(self.state, MotionState::Up | MotionState::Down) {
            self.state = MotionState::IncorrectForm;
            true
        } else {
            false
        }
    }

    /// Leave `IncorrectForm` once form is valid again, resuming in the
    /// state the current metric indicates. No rep is granted or lost
    /// for the time spent correcting form.
    pub fn resume(&mut self, metric: f32, band: &Hysteresis) {
        if metric <= band.entry_down {
            self.state = MotionState::Down;
            self.up_armed = false;
        } else {
            self.state = MotionState::Up;
            self.down_armed = metric <= band.ready_down;
        }
    }

    /// Enter the rest period at a set boundary
    pub fn begin_rest(&mut self) {
        self.state = MotionState::Resting;
        self.down_armed = false;
        self.up_armed = false;
    }

    /// Re-arm for the next set once the rest period elapses
    pub fn rearm(&mut self) {
        self.state = MotionState::Starting;
        self.down_armed = false;
        self.up_armed = false;
    }
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SQUAT;

    const LATE: f64 = 60.0; // comfortably past the cooldown

    #[test]
    fn full_cycle_counts_one_rep() {
        let band = &SQUAT.band;
        let mut m = MotionTracker::new();

        assert_eq!(m.advance(170.0, band, LATE), StepOutcome::Hold);
        assert_eq!(m.state, MotionState::Starting);

        assert_eq!(m.advance(95.0, band, LATE), StepOutcome::Hold);
        assert_eq!(m.state, MotionState::Down);

        assert_eq!(m.advance(170.0, band, LATE), StepOutcome::RepCounted);
        assert_eq!(m.state, MotionState::Up);
    }

    #[test]
    fn down_entry_needs_the_entry_threshold() {
        let band = &SQUAT.band; // entry_down 95
        let mut m = MotionTracker::new();
        m.advance(120.0, band, LATE); // arms down (<= ready_down 140)
        assert_eq!(m.state, MotionState::Starting);
        m.advance(96.0, band, LATE);
        assert_eq!(m.state, MotionState::Starting);
        m.advance(95.0, band, LATE);
        assert_eq!(m.state, MotionState::Down);
    }

    #[test]
    fn up_crossing_without_arming_does_not_count() {
        // Hand-built band with a gap between ready_up and entry_up so an
        // un-armed crossing is expressible
        let band = Hysteresis {
            entry_down: 90.0,
            ready_up: 120.0,
            ready_down: 130.0,
            entry_up: 150.0,
        };
        let mut m = MotionTracker {
            state: MotionState::Down,
            down_armed: false,
            up_armed: false,
        };
        // Metric jumps straight past entry_up: arming happens the same
        // frame, so it fires
        assert_eq!(m.advance(155.0, &band, LATE), StepOutcome::RepCounted);

        // But while still below ready_up nothing arms and nothing fires
        let mut m = MotionTracker {
            state: MotionState::Down,
            down_armed: false,
            up_armed: false,
        };
        assert_eq!(m.advance(110.0, &band, LATE), StepOutcome::Hold);
        assert_eq!(m.state, MotionState::Down);
    }

    #[test]
    fn cooldown_drops_the_crossing_but_still_transitions() {
        let band = &SQUAT.band;
        let mut m = MotionTracker::new();
        m.advance(95.0, band, LATE);
        assert_eq!(m.state, MotionState::Down);
        assert_eq!(m.advance(170.0, band, 0.2), StepOutcome::CooldownDropped);
        assert_eq!(m.state, MotionState::Up);
    }

    #[test]
    fn pause_only_from_up_or_down() {
        let mut m = MotionTracker::new();
        assert!(!m.pause_for_form());
        assert_eq!(m.state, MotionState::Starting);

        m.advance(95.0, &SQUAT.band, LATE);
        assert!(m.pause_for_form());
        assert_eq!(m.state, MotionState::IncorrectForm);
    }

    #[test]
    fn resume_follows_the_metric() {
        let band = &SQUAT.band;
        let mut m = MotionTracker::new();
        m.advance(95.0, band, LATE);
        m.pause_for_form();

        let mut deep = m;
        deep.resume(90.0, band);
        assert_eq!(deep.state, MotionState::Down);

        let mut risen = m;
        risen.resume(160.0, band);
        assert_eq!(risen.state, MotionState::Up);
    }

    #[test]
    fn machine_holds_while_resting() {
        let mut m = MotionTracker::new();
        m.begin_rest();
        assert_eq!(m.advance(95.0, &SQUAT.band, LATE), StepOutcome::Hold);
        assert_eq!(m.state, MotionState::Resting);
        m.rearm();
        assert_eq!(m.state, MotionState::Starting);
    }
}
