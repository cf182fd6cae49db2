//! Seam between the tracker and an external detector.

use crate::integration::DetectionBuilder;
use crate::tracker::Detection;

/// An object detector that turns a frame into detections.
///
/// Implement this for the inference backend (an NPU runtime, ONNX, ...). The
/// tracker never sees pixels; only the returned detections.
///
/// # Example
///
/// ```
/// use rknn_bytetrack::{Detection, DetectionSource};
///
/// struct FixedDetector(Vec<Detection>);
///
/// impl DetectionSource for FixedDetector {
///     type Error = std::convert::Infallible;
///
///     fn detect(&mut self, _frame: &[u8], _width: u32, _height: u32) -> Result<Vec<Detection>, Self::Error> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait DetectionSource {
    type Error;

    /// Run inference on one frame of raw pixel data.
    fn detect(&mut self, frame: &[u8], width: u32, height: u32)
    -> Result<Vec<Detection>, Self::Error>;
}

/// Conversion from a model-specific output format into detections.
pub trait IntoDetections {
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// Post-processed box as produced by a YOLO-style NPU model: integer corner
/// coordinates, a class id and a probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NpuDetection {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub class_id: i32,
    pub prob: f32,
}

impl IntoDetections for Vec<NpuDetection> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter()
            .map(|d| {
                DetectionBuilder::new()
                    .tlbr(d.left as f32, d.top as f32, d.right as f32, d.bottom as f32)
                    .label(d.class_id)
                    .score(d.prob)
                    .build()
            })
            .collect()
    }
}
