//! Detect, associate, measure: the numerical core of a computer-assisted
//! sperm analysis (CASA) pipeline. Raw detector output is de-duplicated per
//! frame, associated into trajectories across frames, and reduced to the
//! standard kinematic metric set plus population-level motility statistics.
//!
//! Frame decoding and model inference live behind the [`Detector`] seam and
//! are otherwise out of scope; each [`Analyzer`] owns its run's state
//! exclusively, so independent videos can be analyzed concurrently without
//! any sharing.

pub mod config;
pub mod detection;
pub mod detector;
pub mod error;
pub mod frame;
pub mod kinematics;
pub mod population;
pub mod smooth;
pub mod track;
pub mod tracker;

pub use config::AnalyzerConfig;
pub use detection::Detection;
pub use detector::{Detector, PostProcessor};
pub use error::Error;
pub use frame::FrameDetections;
pub use kinematics::KinematicMetrics;
pub use population::PopulationMetrics;
pub use track::{Track, TrackState};
pub use tracker::Tracker;

use ndarray::prelude::*;

/// Everything a run produces: the valid tracks with their kinematics, and
/// the aggregate statistics. Handed to the out-of-scope persistence layer.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub tracks: Vec<(Track, KinematicMetrics)>,
    pub population: PopulationMetrics,
}

/// One analysis run over one video: feeds frames through post-processing and
/// tracking, then derives per-track and population metrics.
///
/// Frames must be supplied in increasing frame order. Per-frame inference
/// failures should be downgraded by the caller to an empty frame via
/// [`FrameDetections::empty`]; the tracker then just ages its tracks.
pub struct Analyzer {
    config: AnalyzerConfig,
    post: PostProcessor,
    tracker: Tracker,
    frames_seen: usize,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let post = PostProcessor::new(
            config.confidence_threshold,
            config.nms_threshold,
            config.input_size,
            config.frame_rate,
        );
        let tracker = Tracker::new(config.max_association_distance, config.max_missed_frames);

        Self {
            config,
            post,
            tracker,
            frames_seen: 0,
        }
    }

    /// Run the detector on a preprocessed frame tensor and track the result.
    /// Returns the number of detections that survived post-processing.
    pub fn process_tensor<D: Detector>(
        &mut self,
        detector: &D,
        tensor: ArrayView3<'_, f32>,
        frame: usize,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<usize, Error> {
        let raw = detector.infer(tensor)?;
        self.process_raw(raw.view(), frame, frame_width, frame_height)
    }

    /// Post-process one frame's raw detector output and track the result.
    pub fn process_raw(
        &mut self,
        raw: ArrayView2<'_, f32>,
        frame: usize,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<usize, Error> {
        let detections = self.post.process(raw, frame, frame_width, frame_height)?;
        let count = detections.len();
        self.process_detections(detections)?;
        Ok(count)
    }

    /// Track one frame's worth of already post-processed detections.
    pub fn process_detections(&mut self, detections: FrameDetections) -> Result<(), Error> {
        self.tracker.update(&detections)?;
        self.frames_seen += 1;
        Ok(())
    }

    /// End of the run: terminate the remaining tracks, discard noise,
    /// smooth and measure each valid track, and aggregate the population.
    ///
    /// A run that never saw a frame has nothing to report and fails with
    /// [`Error::NoFrames`].
    pub fn finish(self) -> Result<AnalysisResult, Error> {
        if self.frames_seen == 0 {
            return Err(Error::NoFrames);
        }

        let config = self.config;
        let all = self.tracker.finish();
        let total = all.len();

        let tracks: Vec<(Track, KinematicMetrics)> = all
            .into_iter()
            .filter(|t| smooth::is_valid(t, config.min_track_samples, config.min_track_movement))
            .map(|t| {
                let smoothed = smooth::moving_average(&t.points);
                let metrics = KinematicMetrics::compute(&t, &smoothed, config.pixel_to_micron);
                (t, metrics)
            })
            .collect();

        log::debug!(
            "analysis finished: {} tracks, {} valid",
            total,
            tracks.len()
        );

        let population = PopulationMetrics::aggregate(&tracks, &config);

        Ok(AnalysisResult { tracks, population })
    }
}
