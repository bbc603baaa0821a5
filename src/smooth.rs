use crate::track::Track;

use nalgebra as na;

/// A track counts as a real cell only if it has enough samples and actually
/// went somewhere; anything else is debris or a stationary artifact.
pub fn is_valid(track: &Track, min_samples: usize, min_movement: f32) -> bool {
    track.len() >= min_samples && track.path_length() > min_movement
}

/// 3-point moving average over the interior samples; endpoints are copied.
/// Removes detector jitter while keeping the gross path shape. Output has
/// the same length as the input.
pub fn moving_average(points: &[na::Point2<f32>]) -> Vec<na::Point2<f32>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut smoothed = Vec::with_capacity(points.len());
    smoothed.push(points[0]);

    for w in points.windows(3) {
        smoothed.push(na::Point2::from(
            (w[0].coords + w[1].coords + w[2].coords) / 3.0,
        ));
    }

    smoothed.push(points[points.len() - 1]);
    smoothed
}
