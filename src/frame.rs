use crate::detection::Detection;

/// All detections found in a single video frame.
#[derive(Debug, Clone)]
pub struct FrameDetections {
    pub frame: usize,
    pub timestamp: f32, // in seconds
    pub detections: Vec<Detection>,
}

impl FrameDetections {
    pub fn new(frame: usize, frame_rate: f32, detections: Vec<Detection>) -> Self {
        Self {
            frame,
            timestamp: frame as f32 / frame_rate,
            detections,
        }
    }

    /// A frame that produced no detections, e.g. after a recovered
    /// per-frame inference failure upstream.
    pub fn empty(frame: usize, frame_rate: f32) -> Self {
        Self::new(frame, frame_rate, Vec::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
