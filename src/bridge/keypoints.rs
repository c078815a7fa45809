//! Pose frame transfer from JS
//!
//! Receives MoveNet keypoints from the JavaScript pose service once per
//! video frame and stores them for the evaluation tick to read. Data
//! crosses as a flat Float32Array: 17 keypoints × (x, y, score) in
//! image-space pixels, y increasing downward.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::engine::pose::{PoseFrame, JOINT_COUNT};

thread_local! {
    static CURRENT_FRAME: RefCell<Option<PoseFrame>> = RefCell::new(None);
}

/// Called from JavaScript with 51 values (17 keypoints × x, y, score).
/// An empty array means the detector lost the pose this frame.
#[wasm_bindgen]
pub fn update_pose(data: &[f32]) {
    if data.is_empty() {
        CURRENT_FRAME.with(|cell| *cell.borrow_mut() = None);
        return;
    }

    match PoseFrame::from_flat(data) {
        Some(frame) => CURRENT_FRAME.with(|cell| *cell.borrow_mut() = Some(frame)),
        None => {
            web_sys::console::warn_1(
                &format!(
                    "Invalid pose data length: {} (expected {})",
                    data.len(),
                    JOINT_COUNT * 3
                )
                .into(),
            );
        }
    }
}

/// Drop the stored frame (tracking paused or camera stopped)
#[wasm_bindgen]
pub fn clear_pose() {
    CURRENT_FRAME.with(|cell| *cell.borrow_mut() = None);
}

/// Current frame for the evaluation tick
pub fn current_frame() -> Option<PoseFrame> {
    CURRENT_FRAME.with(|cell| cell.borrow().clone())
}
