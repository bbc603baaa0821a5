use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Lifecycle of a track. A track is born `Active` with its first sample,
/// drops to `Lost` on a frame with no matching detection, returns to `Active`
/// when matched again, and never leaves `Terminated`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Active,
    Lost,
    Terminated,
}

/// A single cell's trajectory across consecutive frames.
///
/// `points`, `timestamps` and `confidences` are parallel sequences of equal
/// length, append-only, with strictly increasing timestamps.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Track {
    pub id: u32,
    pub start_frame: usize,
    pub end_frame: Option<usize>,
    pub points: Vec<na::Point2<f32>>,
    pub timestamps: Vec<f32>,
    pub confidences: Vec<f32>,
    pub state: TrackState,
    /// Consecutive frames without a matching detection.
    pub misses: u32,
}

impl Track {
    pub fn new(id: u32, frame: usize, timestamp: f32, point: na::Point2<f32>, confidence: f32) -> Self {
        Self {
            id,
            start_frame: frame,
            end_frame: None,
            points: vec![point],
            timestamps: vec![timestamp],
            confidences: vec![confidence],
            state: TrackState::Active,
            misses: 0,
        }
    }

    pub fn push(&mut self, timestamp: f32, point: na::Point2<f32>, confidence: f32) {
        debug_assert!(
            timestamp > *self.timestamps.last().unwrap_or(&f32::NEG_INFINITY),
            "track samples must have strictly increasing timestamps"
        );

        self.points.push(point);
        self.timestamps.push(timestamp);
        self.confidences.push(confidence);
        self.state = TrackState::Active;
        self.misses = 0;
    }

    pub fn terminate(&mut self, frame: usize) {
        self.state = TrackState::Terminated;
        self.end_frame = Some(frame);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn last_point(&self) -> na::Point2<f32> {
        self.points[self.points.len() - 1]
    }

    /// Sum of consecutive-sample distances, in pixels.
    pub fn path_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| na::distance(&w[0], &w[1]))
            .sum()
    }

    /// First-to-last sample distance, in pixels.
    pub fn straight_length(&self) -> f32 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => na::distance(first, last),
            _ => 0.0,
        }
    }

    /// Seconds between the first and last sample.
    pub fn elapsed(&self) -> f32 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}
