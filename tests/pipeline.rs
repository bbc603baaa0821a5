use approx::assert_relative_eq;
use casatrack::{
    Analyzer, AnalyzerConfig, Detection, Detector, Error, FrameDetections, TrackState,
};
use ndarray::prelude::*;

/// One raw detector row: center box in input-tensor space, objectness, two
/// class scores.
fn raw_rows(boxes: &[(f32, f32)]) -> Array2<f32> {
    let flat: Vec<f32> = boxes
        .iter()
        .flat_map(|&(cx, cy)| [cx, cy, 12.0, 12.0, 0.9, 0.95, 0.05])
        .collect();
    Array2::from_shape_vec((boxes.len(), 7), flat).unwrap()
}

fn config() -> AnalyzerConfig {
    // unit calibration, 1 fps: pixel distances read directly as um/s
    AnalyzerConfig::new(1.0, 1.0)
}

#[test]
fn straight_swimmer_end_to_end() {
    let mut analyzer = Analyzer::new(config());

    for i in 0..3 {
        let raw = raw_rows(&[(i as f32 * 10.0, 100.0)]);
        let n = analyzer.process_raw(raw.view(), i, 640, 640).unwrap();
        assert_eq!(n, 1);
    }

    let result = analyzer.finish().unwrap();
    assert_eq!(result.tracks.len(), 1);

    let (track, metrics) = &result.tracks[0];
    assert_eq!(track.state, TrackState::Terminated);
    assert_eq!(track.len(), 3);
    assert_relative_eq!(metrics.vcl, 10.0);
    assert_relative_eq!(metrics.vsl, 10.0);
    assert_relative_eq!(metrics.vap, 10.0);
    assert_relative_eq!(metrics.lin, 1.0);
    assert_relative_eq!(metrics.alh, 0.0);
    assert_relative_eq!(metrics.bcf, 0.0);

    assert_eq!(result.population.total_count, 1);
    assert_relative_eq!(result.population.total_motility, 100.0);
    assert_relative_eq!(result.population.avg_vcl, 10.0);
}

#[test]
fn barely_moving_track_is_excluded() {
    let mut analyzer = Analyzer::new(config());

    // 5 px of total movement over two samples: below both the sample and
    // the movement threshold, so it never reaches the population.
    for i in 0..2 {
        let raw = raw_rows(&[(100.0 + i as f32 * 5.0, 100.0)]);
        analyzer.process_raw(raw.view(), i, 640, 640).unwrap();
    }

    let result = analyzer.finish().unwrap();
    assert!(result.tracks.is_empty());
    assert_eq!(result.population.total_count, 0);
    assert_eq!(result.population.total_motility, 0.0);
}

#[test]
fn two_cells_stay_separate_tracks() {
    let mut analyzer = Analyzer::new(config());

    for i in 0..6 {
        let x = i as f32 * 8.0;
        let raw = raw_rows(&[(50.0 + x, 50.0), (400.0, 300.0 + x)]);
        analyzer.process_raw(raw.view(), i, 640, 640).unwrap();
    }

    let result = analyzer.finish().unwrap();
    assert_eq!(result.tracks.len(), 2);
    assert_eq!(result.population.total_count, 2);
    assert_eq!(result.population.tracked_count, 2);

    let ids: Vec<u32> = result.tracks.iter().map(|(t, _)| t.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn failed_frames_age_tracks_without_killing_the_run() {
    let mut analyzer = Analyzer::new(config());

    for i in 0..4 {
        let raw = raw_rows(&[(i as f32 * 10.0, 100.0)]);
        analyzer.process_raw(raw.view(), i, 640, 640).unwrap();
    }

    // inference failed upstream: recovered as zero detections
    analyzer
        .process_detections(FrameDetections::empty(4, 1.0))
        .unwrap();

    let raw = raw_rows(&[(50.0, 100.0)]);
    analyzer.process_raw(raw.view(), 5, 640, 640).unwrap();

    let result = analyzer.finish().unwrap();
    assert_eq!(result.tracks.len(), 1);
    assert_eq!(result.tracks[0].0.len(), 5);
}

#[test]
fn run_with_no_frames_is_an_error() {
    let analyzer = Analyzer::new(config());
    assert!(matches!(analyzer.finish(), Err(Error::NoFrames)));
}

#[test]
fn truncated_sequence_terminates_at_last_frame_seen() {
    let mut analyzer = Analyzer::new(config());

    for i in 0..4 {
        let raw = raw_rows(&[(i as f32 * 10.0, 100.0)]);
        analyzer.process_raw(raw.view(), i, 640, 640).unwrap();
    }

    let result = analyzer.finish().unwrap();
    assert_eq!(result.tracks[0].0.end_frame, Some(3));
}

/// Inference backend stub: reads the box center out of the first two tensor
/// values, in input-tensor coordinates.
struct StubDetector;

impl Detector for StubDetector {
    fn infer(&self, tensor: ArrayView3<'_, f32>) -> Result<Array2<f32>, Error> {
        let cx = tensor[[0, 0, 0]];
        let cy = tensor[[0, 0, 1]];
        Ok(raw_rows(&[(cx, cy)]))
    }
}

#[test]
fn detector_seam_feeds_the_pipeline() {
    let mut analyzer = Analyzer::new(config());

    for i in 0..3 {
        let mut tensor = Array3::zeros((3, 2, 2));
        tensor[[0, 0, 0]] = 100.0 + i as f32 * 12.0;
        tensor[[0, 0, 1]] = 200.0;
        analyzer
            .process_tensor(&StubDetector, tensor.view(), i, 640, 640)
            .unwrap();
    }

    let result = analyzer.finish().unwrap();
    assert_eq!(result.tracks.len(), 1);
    assert_relative_eq!(result.tracks[0].1.vcl, 12.0);

    // detection positions came through the rescale path unchanged (640/640)
    let first = result.tracks[0].0.points[0];
    assert_relative_eq!(first.x, 100.0);
    assert_relative_eq!(first.y, 200.0);
}

#[test]
fn detections_round_trip_through_serde() {
    let det = Detection {
        frame: 3,
        x: 10.0,
        y: 20.0,
        w: 5.0,
        h: 6.0,
        confidence: 0.9,
        class: 0,
    };
    let json = serde_json::to_string(&det).unwrap();
    let back: Detection = serde_json::from_str(&json).unwrap();
    assert_eq!(back.frame, 3);
    assert_relative_eq!(back.confidence, 0.9);
}
