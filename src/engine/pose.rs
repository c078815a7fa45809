//! Pose frame model
//!
//! One frame of MoveNet single-pose output: 17 named 2D keypoints in
//! image-space pixel coordinates (y increasing downward) with a
//! per-keypoint detection score. The engine never mutates or retains a
//! frame; lookups below the confidence floor report the joint as absent
//! so callers cannot silently evaluate on bad data.

use nalgebra::Point2;

/// Keypoints below this score are treated as not detected
pub const MIN_KEYPOINT_SCORE: f32 = 0.3;

/// Number of keypoints in a MoveNet single-pose frame
pub const JOINT_COUNT: usize = 17;

/// MoveNet keypoint names, in model output order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::Nose,
        Joint::LeftEye,
        Joint::RightEye,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// Index into a MoveNet output frame
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name, matching the pose-estimation service
    pub fn name(self) -> &'static str {
        match self {
            Joint::Nose => "nose",
            Joint::LeftEye => "left_eye",
            Joint::RightEye => "right_eye",
            Joint::LeftEar => "left_ear",
            Joint::RightEar => "right_ear",
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
        }
    }
}

/// A single detected keypoint
#[derive(Clone, Copy, Debug)]
pub struct Keypoint {
    pub pos: Point2<f32>,
    pub score: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, score: f32) -> Self {
        Self {
            pos: Point2::new(x, y),
            score,
        }
    }
}

/// One frame of pose estimation output
#[derive(Clone, Debug)]
pub struct PoseFrame {
    keypoints: [Keypoint; JOINT_COUNT],
}

impl PoseFrame {
    /// Build from a flat array of 51 values (17 keypoints × x, y, score),
    /// the layout the JS pose service ships across the bridge.
    /// Returns `None` on a malformed buffer.
    pub fn from_flat(data: &[f32]) -> Option<Self> {
        if data.len() != JOINT_COUNT * 3 {
            return None;
        }
        let mut keypoints = [Keypoint::new(0.0, 0.0, 0.0); JOINT_COUNT];
        for (i, kp) in keypoints.iter_mut().enumerate() {
            *kp = Keypoint::new(data[i * 3], data[i * 3 + 1], data[i * 3 + 2]);
        }
        Some(Self { keypoints })
    }

    /// Build directly from keypoints (test and host-side use)
    pub fn from_keypoints(keypoints: [Keypoint; JOINT_COUNT]) -> Self {
        Self { keypoints }
    }

    /// Look up a joint, treating low-confidence detections as absent.
    /// A `None` here means "cannot evaluate this frame for this joint" -
    /// callers must not substitute a default position.
    pub fn keypoint(&self, joint: Joint) -> Option<&Keypoint> {
        let kp = &self.keypoints[joint.index()];
        if kp.score >= MIN_KEYPOINT_SCORE {
            Some(kp)
        } else {
            None
        }
    }

    /// Position of a joint if reliably detected
    pub fn point(&self, joint: Joint) -> Option<Point2<f32>> {
        self.keypoint(joint).map(|kp| kp.pos)
    }
}
