//! Per-exercise form evaluation
//!
//! Derives the counting metric and the secondary form measures (trunk
//! lean, upper-arm sway, knee valgus, body-line straightness, chin
//! height) from the frame's keypoints and classifies each against the
//! rule table. Runs every frame, independently of the rep machine.
//!
//! Fail-safe rule: any required joint missing or below the confidence
//! floor aborts the whole assessment with a `FormGap` - correct form is
//! never claimed on incomplete data.

use std::collections::BTreeSet;

use serde::Serialize;

use super::config::{Exercise, ExerciseConfig};
use super::counter::MotionState;
use super::geometry::{angle_at, lean_from_vertical, span};
use super::pose::{Joint, PoseFrame};

/// A frame that cannot be evaluated: required joints are missing or
/// below the confidence floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormGap {
    pub message: &'static str,
}

/// Qualitative grade derived from the number of failed checks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Outcome of evaluating one frame
#[derive(Clone, Debug)]
pub struct FrameAssessment {
    /// Counting metric for the rep machine, degrees
    pub metric: f32,
    /// Joints currently failing a check, for overlay highlighting
    pub flagged: BTreeSet<Joint>,
    /// One corrective line per failed check
    pub feedback: Vec<String>,
}

impl FrameAssessment {
    fn new(metric: f32) -> Self {
        Self {
            metric,
            flagged: BTreeSet::new(),
            feedback: Vec::new(),
        }
    }

    fn fail(&mut self, message: String, joints: &[Joint]) {
        self.feedback.push(message);
        self.flagged.extend(joints.iter().copied());
    }

    /// All configured checks passed this frame
    pub fn form_valid(&self) -> bool {
        self.feedback.is_empty()
    }

    pub fn quality(&self) -> FormQuality {
        match self.feedback.len() {
            0 => FormQuality::Excellent,
            1 => FormQuality::Good,
            2 => FormQuality::Fair,
            _ => FormQuality::Poor,
        }
    }
}

/// Evaluate one frame for the active exercise.
///
/// `state` is the motion state going into this frame; the squat chest
/// check only applies in the loaded position.
pub fn assess(
    exercise: Exercise,
    frame: &PoseFrame,
    cfg: &ExerciseConfig,
    state: MotionState,
) -> Result<FrameAssessment, FormGap> {
    match exercise {
        Exercise::Squat => assess_squat(frame, cfg, state),
        Exercise::BicepCurl => assess_bicep_curl(frame, cfg),
        Exercise::PushUp => assess_push_up(frame, cfg),
        Exercise::PullUp => assess_pull_up(frame, cfg),
        Exercise::ForwardLunge => assess_forward_lunge(frame, cfg),
    }
}

fn assess_squat(
    frame: &PoseFrame,
    cfg: &ExerciseConfig,
    state: MotionState,
) -> Result<FrameAssessment, FormGap> {
    const GAP: FormGap = FormGap {
        message: "Cannot detect legs and torso clearly",
    };
    let need = |j: Joint| frame.point(j).ok_or(GAP);

    let l_hip = need(Joint::LeftHip)?;
    let l_knee = need(Joint::LeftKnee)?;
    let l_ankle = need(Joint::LeftAnkle)?;
    let l_shoulder = need(Joint::LeftShoulder)?;
    let r_hip = need(Joint::RightHip)?;
    let r_knee = need(Joint::RightKnee)?;
    let r_ankle = need(Joint::RightAnkle)?;
    let r_shoulder = need(Joint::RightShoulder)?;

    let knee_angle =
        (angle_at(l_hip, l_knee, l_ankle) + angle_at(r_hip, r_knee, r_ankle)) / 2.0;
    let mut out = FrameAssessment::new(knee_angle);

    let trunk_lean =
        (lean_from_vertical(l_shoulder, l_hip) + lean_from_vertical(r_shoulder, r_hip)) / 2.0;
    if let Some(max) = cfg.form.max_trunk_lean {
        if trunk_lean > max {
            out.fail(
                format!(
                    "Keep your back straighter. Lean: {:.0}° (max {:.0}°)",
                    trunk_lean, max
                ),
                &[
                    Joint::LeftHip,
                    Joint::RightHip,
                    Joint::LeftShoulder,
                    Joint::RightShoulder,
                ],
            );
        }
    }

    // Valgus: knee drifting inside (left) / outside (right) the ankle
    // line by more than a fraction of the hip-to-ankle drop
    if let Some(ratio) = cfg.form.valgus_ratio {
        if l_knee.x < l_ankle.x - ratio * (l_hip.y - l_ankle.y).abs() {
            out.fail(
                "Left knee caving in. Push it outwards.".to_string(),
                &[Joint::LeftKnee],
            );
        }
        if r_knee.x > r_ankle.x + ratio * (r_hip.y - r_ankle.y).abs() {
            out.fail(
                "Right knee moving outwards too much.".to_string(),
                &[Joint::RightKnee],
            );
        }
    }

    // Chest lean only matters in the bottom position
    if let Some(ratio) = cfg.form.chest_lean_ratio {
        if state == MotionState::Down {
            let l_lean = l_shoulder.x < l_knee.x - ratio * (l_shoulder.y - l_knee.y).abs();
            let r_lean = r_shoulder.x < r_knee.x - ratio * (r_shoulder.y - r_knee.y).abs();
            if l_lean || r_lean {
                out.fail(
                    "Keep chest up, avoid excessive forward lean.".to_string(),
                    &[Joint::LeftShoulder, Joint::RightShoulder],
                );
            }
        }
    }

    Ok(out)
}

fn assess_bicep_curl(frame: &PoseFrame, cfg: &ExerciseConfig) -> Result<FrameAssessment, FormGap> {
    const GAP: FormGap = FormGap {
        message: "Cannot detect arms and torso clearly",
    };
    let need = |j: Joint| frame.point(j).ok_or(GAP);

    let l_shoulder = need(Joint::LeftShoulder)?;
    let l_elbow = need(Joint::LeftElbow)?;
    let l_wrist = need(Joint::LeftWrist)?;
    let l_hip = need(Joint::LeftHip)?;
    let r_shoulder = need(Joint::RightShoulder)?;
    let r_elbow = need(Joint::RightElbow)?;
    let r_wrist = need(Joint::RightWrist)?;
    let r_hip = need(Joint::RightHip)?;

    let elbow_angle =
        (angle_at(l_shoulder, l_elbow, l_wrist) + angle_at(r_shoulder, r_elbow, r_wrist)) / 2.0;
    let mut out = FrameAssessment::new(elbow_angle);

    let trunk_lean =
        (lean_from_vertical(l_shoulder, l_hip) + lean_from_vertical(r_shoulder, r_hip)) / 2.0;
    if let Some(max) = cfg.form.max_trunk_lean {
        if trunk_lean > max {
            out.fail(
                format!(
                    "Keep your back straight. Lean: {:.0}° (max {:.0}°)",
                    trunk_lean, max
                ),
                &[Joint::LeftHip, Joint::RightHip],
            );
        }
    }

    // Upper arm should hang still: shoulder→elbow deviation from vertical
    let arm_sway =
        (lean_from_vertical(l_shoulder, l_elbow) + lean_from_vertical(r_shoulder, r_elbow)) / 2.0;
    if let Some(max) = cfg.form.max_upper_arm_sway {
        if arm_sway > max {
            out.fail(
                format!(
                    "Keep upper arms still. Sway: {:.0}° (max {:.0}°)",
                    arm_sway, max
                ),
                &[
                    Joint::LeftShoulder,
                    Joint::RightShoulder,
                    Joint::LeftElbow,
                    Joint::RightElbow,
                ],
            );
        }
    }

    Ok(out)
}

fn assess_push_up(frame: &PoseFrame, cfg: &ExerciseConfig) -> Result<FrameAssessment, FormGap> {
    const GAP: FormGap = FormGap {
        message: "Cannot detect all required landmarks",
    };
    let need = |j: Joint| frame.point(j).ok_or(GAP);

    let l_shoulder = need(Joint::LeftShoulder)?;
    let l_elbow = need(Joint::LeftElbow)?;
    let l_wrist = need(Joint::LeftWrist)?;
    let l_hip = need(Joint::LeftHip)?;
    let l_knee = need(Joint::LeftKnee)?;
    let r_shoulder = need(Joint::RightShoulder)?;
    let r_elbow = need(Joint::RightElbow)?;
    let r_wrist = need(Joint::RightWrist)?;
    let r_hip = need(Joint::RightHip)?;
    let r_knee = need(Joint::RightKnee)?;

    let elbow_angle =
        (angle_at(l_shoulder, l_elbow, l_wrist) + angle_at(r_shoulder, r_elbow, r_wrist)) / 2.0;
    let mut out = FrameAssessment::new(elbow_angle);

    // Shoulder–hip–knee should stay close to a straight line
    let body_line =
        (angle_at(l_shoulder, l_hip, l_knee) + angle_at(r_shoulder, r_hip, r_knee)) / 2.0;
    if let Some((min, max)) = cfg.form.body_line_range {
        if body_line < min || body_line > max {
            out.fail(
                format!(
                    "Body alignment off - keep shoulders, hips and knees in line ({:.0}°)",
                    body_line
                ),
                &[Joint::LeftHip, Joint::RightHip],
            );
        }
    }

    Ok(out)
}

fn assess_pull_up(frame: &PoseFrame, cfg: &ExerciseConfig) -> Result<FrameAssessment, FormGap> {
    const GAP: FormGap = FormGap {
        message: "Cannot detect arms and head clearly",
    };
    let need = |j: Joint| frame.point(j).ok_or(GAP);

    let l_shoulder = need(Joint::LeftShoulder)?;
    let l_elbow = need(Joint::LeftElbow)?;
    let l_wrist = need(Joint::LeftWrist)?;
    let r_shoulder = need(Joint::RightShoulder)?;
    let r_elbow = need(Joint::RightElbow)?;
    let r_wrist = need(Joint::RightWrist)?;
    let nose = need(Joint::Nose)?;

    let elbow_angle =
        (angle_at(l_shoulder, l_elbow, l_wrist) + angle_at(r_shoulder, r_elbow, r_wrist)) / 2.0;
    let mut out = FrameAssessment::new(elbow_angle);

    // Chin check: at the top position the nose must sit above the mean
    // wrist height (smaller y is higher on screen). Gated on the metric,
    // not the state: the check covers entering and holding the flexed
    // top, and releases as soon as the arms open past entry_down so the
    // descent back to the hang is never flagged.
    if cfg.form.chin_above_wrist {
        let at_top = elbow_angle <= cfg.band.entry_down;
        let wrist_y = (l_wrist.y + r_wrist.y) / 2.0;
        if at_top && nose.y >= wrist_y {
            out.fail(
                "Pull higher - chin needs to clear your hands".to_string(),
                &[Joint::Nose, Joint::LeftWrist, Joint::RightWrist],
            );
        }
    }

    Ok(out)
}

fn assess_forward_lunge(
    frame: &PoseFrame,
    cfg: &ExerciseConfig,
) -> Result<FrameAssessment, FormGap> {
    const GAP: FormGap = FormGap {
        message: "Cannot detect legs and torso clearly",
    };
    let need = |j: Joint| frame.point(j).ok_or(GAP);

    let l_hip = need(Joint::LeftHip)?;
    let l_knee = need(Joint::LeftKnee)?;
    let l_ankle = need(Joint::LeftAnkle)?;
    let l_shoulder = need(Joint::LeftShoulder)?;
    let r_hip = need(Joint::RightHip)?;
    let r_knee = need(Joint::RightKnee)?;
    let r_ankle = need(Joint::RightAnkle)?;
    let r_shoulder = need(Joint::RightShoulder)?;

    // Front leg = the one further forward in x. Counting uses the mean
    // of both knee angles, so a mid-set leg swap cannot double count;
    // the split only matters for the alignment check.
    let left_is_front = l_knee.x < r_knee.x;
    let (front_hip, front_knee, front_ankle, front_joint) = if left_is_front {
        (l_hip, l_knee, l_ankle, Joint::LeftKnee)
    } else {
        (r_hip, r_knee, r_ankle, Joint::RightKnee)
    };

    let knee_angle =
        (angle_at(l_hip, l_knee, l_ankle) + angle_at(r_hip, r_knee, r_ankle)) / 2.0;
    let mut out = FrameAssessment::new(knee_angle);

    // Front knee should track over the front ankle
    if let Some(ratio) = cfg.form.knee_align_ratio {
        let tolerance = ratio * span(front_hip, front_ankle);
        if (front_knee.x - front_ankle.x).abs() > tolerance {
            out.fail(
                "Keep front knee aligned with ankle".to_string(),
                &[front_joint],
            );
        }
    }

    let trunk_lean =
        (lean_from_vertical(l_shoulder, l_hip) + lean_from_vertical(r_shoulder, r_hip)) / 2.0;
    if let Some(max) = cfg.form.max_trunk_lean {
        if trunk_lean > max {
            out.fail(
                "Keep torso upright".to_string(),
                &[Joint::LeftShoulder, Joint::RightShoulder],
            );
        }
    }

    Ok(out)
}
