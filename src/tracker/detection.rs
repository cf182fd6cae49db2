use serde::{Deserialize, Serialize};

use crate::tracker::rect::Rect;

/// One detector output for a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in pixel space
    pub bbox: Rect,
    /// Class id reported by the detector
    pub label: i32,
    /// Optional human-readable class name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Confidence in [0, 1]
    pub score: f32,
}

impl Detection {
    /// Create a detection from TLBR corners with class 0.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, score: f32) -> Self {
        Self::from_rect(Rect::from_tlbr(x1, y1, x2, y2), score)
    }

    pub fn from_rect(bbox: Rect, score: f32) -> Self {
        Self {
            bbox,
            label: 0,
            name: None,
            score,
        }
    }

    pub fn with_label(mut self, label: i32) -> Self {
        self.label = label;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether the detection can be fed to the tracker: a finite box of positive
    /// size and a finite score.
    pub fn is_valid(&self) -> bool {
        self.bbox.is_finite() && !self.bbox.is_empty() && self.score.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(Detection::new(0.0, 0.0, 10.0, 10.0, 0.9).is_valid());
        assert!(!Detection::new(0.0, 0.0, 0.0, 10.0, 0.9).is_valid());
        assert!(!Detection::new(10.0, 0.0, 0.0, 10.0, 0.9).is_valid());
        assert!(!Detection::new(0.0, 0.0, 10.0, 10.0, f32::NAN).is_valid());
        assert!(!Detection::from_rect(Rect::new(0.0, 0.0, f32::INFINITY, 1.0), 0.5).is_valid());
    }

    #[test]
    fn test_label_and_name() {
        let det = Detection::new(0.0, 0.0, 1.0, 1.0, 0.5)
            .with_label(2)
            .with_name("car");
        assert_eq!(det.label, 2);
        assert_eq!(det.name.as_deref(), Some("car"));
    }
}
