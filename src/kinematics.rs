use crate::track::Track;

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Side of the smoothed path a raw point falls on. Cross products within
/// one pixel-unit of zero count as on-path; the dead-zone is expressed in
/// unscaled pixel coordinates, matching the reference behavior.
const CROSS_DEAD_ZONE: f32 = 1.0;

/// Standard CASA kinematics of one track. Velocities in microns per second,
/// ALH in microns, BCF in Hz, ratios unitless. Computed once from a
/// finalized track, never mutated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct KinematicMetrics {
    /// Curvilinear velocity: speed along the raw path.
    pub vcl: f32,
    /// Straight-line velocity: first-to-last displacement over time.
    pub vsl: f32,
    /// Average-path velocity: speed along the smoothed path.
    pub vap: f32,
    /// Linearity, VSL / VCL.
    pub lin: f32,
    /// Straightness, VSL / VAP.
    #[serde(rename = "str")]
    pub str_: f32,
    /// Wobble, VAP / VCL.
    pub wob: f32,
    /// Amplitude of lateral head displacement around the smoothed path.
    pub alh: f32,
    /// Beat-cross frequency: rate the raw path crosses the smoothed one.
    pub bcf: f32,
}

impl KinematicMetrics {
    /// Compute all metrics from a track's raw path and its smoothed
    /// counterpart, with `pixel_to_micron` microns per pixel.
    ///
    /// Degenerate inputs (zero elapsed time, zero-length paths) are not
    /// errors: every division by zero resolves to 0.
    pub fn compute(
        track: &Track,
        smoothed: &[na::Point2<f32>],
        pixel_to_micron: f32,
    ) -> KinematicMetrics {
        let elapsed = track.elapsed();

        let vcl = velocity(track.path_length() * pixel_to_micron, elapsed);
        let vsl = velocity(track.straight_length() * pixel_to_micron, elapsed);
        let vap = velocity(path_length(smoothed) * pixel_to_micron, elapsed);

        KinematicMetrics {
            vcl,
            vsl,
            vap,
            lin: ratio(vsl, vcl),
            str_: ratio(vsl, vap),
            wob: ratio(vap, vcl),
            alh: lateral_amplitude(&track.points, smoothed, pixel_to_micron),
            bcf: beat_cross_frequency(&track.points, smoothed, elapsed),
        }
    }
}

#[inline]
fn velocity(distance_um: f32, elapsed: f32) -> f32 {
    if elapsed > 0.0 {
        distance_um / elapsed
    } else {
        0.0
    }
}

#[inline]
fn ratio(num: f32, den: f32) -> f32 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

fn path_length(points: &[na::Point2<f32>]) -> f32 {
    points.windows(2).map(|w| na::distance(&w[0], &w[1])).sum()
}

/// Mean distance between the raw samples and the smoothed path, in microns.
fn lateral_amplitude(
    raw: &[na::Point2<f32>],
    smoothed: &[na::Point2<f32>],
    pixel_to_micron: f32,
) -> f32 {
    let n = raw.len().min(smoothed.len());
    if n < 3 {
        return 0.0;
    }

    let sum: f32 = raw
        .iter()
        .zip(smoothed)
        .map(|(r, s)| na::distance(r, s))
        .sum();

    sum * pixel_to_micron / n as f32
}

/// Count the sign changes of the side the raw point falls on relative to the
/// smoothed path segment, per second. The side comes from the 2-D cross
/// product of the segment vector with the point-offset vector, with crossings
/// through the dead-zone ignored until the sign actually flips.
fn beat_cross_frequency(
    raw: &[na::Point2<f32>],
    smoothed: &[na::Point2<f32>],
    elapsed: f32,
) -> f32 {
    let n = raw.len().min(smoothed.len());
    if n < 5 || elapsed <= 0.0 {
        return 0.0;
    }

    let mut crossings = 0u32;
    let mut last_side = 0i8;

    for i in 0..n - 1 {
        let segment = smoothed[i + 1] - smoothed[i];
        let offset = raw[i] - smoothed[i];
        let cross = segment.x * offset.y - segment.y * offset.x;

        let side = if cross > CROSS_DEAD_ZONE {
            1
        } else if cross < -CROSS_DEAD_ZONE {
            -1
        } else {
            0
        };

        if side != 0 {
            if last_side != 0 && side != last_side {
                crossings += 1;
            }
            last_side = side;
        }
    }

    crossings as f32 / elapsed
}
