use crate::config::AnalyzerConfig;
use crate::kinematics::KinematicMetrics;
use crate::track::Track;

use serde_derive::{Deserialize, Serialize};

/// Tracks with at least this many samples count as reliably tracked.
const TRACKED_MIN_SAMPLES: usize = 5;

/// Sample-level statistics over all valid tracks of one analysis run.
/// Built once, after the tracker has drained the whole video.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct PopulationMetrics {
    pub total_count: usize,
    pub tracked_count: usize,

    /// Averages over valid tracks with nonzero VCL.
    pub avg_vcl: f32,
    pub avg_vsl: f32,
    pub avg_vap: f32,
    pub avg_lin: f32,
    pub avg_alh: f32,
    pub avg_bcf: f32,

    /// Percentages over all valid tracks; 0 when the run found none.
    pub total_motility: f32,
    pub progressive_motility: f32,
    pub non_progressive_motility: f32,
    pub immotile: f32,

    /// Objects per microliter of sample volume.
    pub concentration: f32,
}

impl PopulationMetrics {
    pub fn aggregate(tracks: &[(Track, KinematicMetrics)], config: &AnalyzerConfig) -> Self {
        let total = tracks.len();
        let tracked = tracks
            .iter()
            .filter(|(t, _)| t.len() >= TRACKED_MIN_SAMPLES)
            .count();

        let moving: Vec<&KinematicMetrics> =
            tracks.iter().filter(|(_, m)| m.vcl > 0.0).map(|(_, m)| m).collect();
        let n = moving.len() as f32;

        let avg = |f: fn(&KinematicMetrics) -> f32| -> f32 {
            if moving.is_empty() {
                0.0
            } else {
                moving.iter().map(|m| f(m)).sum::<f32>() / n
            }
        };

        let motile = tracks
            .iter()
            .filter(|(_, m)| m.vcl > config.motility_threshold)
            .count();
        let progressive = tracks
            .iter()
            .filter(|(_, m)| m.vcl > config.motility_threshold && m.lin > config.progressive_linearity)
            .count();

        let percent = |count: usize| -> f32 {
            if total == 0 {
                0.0
            } else {
                count as f32 / total as f32 * 100.0
            }
        };

        let total_motility = percent(motile);
        let progressive_motility = percent(progressive);

        // analysis volume in microliters: mm^2 * um / 1000
        let volume_ul = config.analysis_area_mm2 * config.chamber_depth_um / 1000.0;
        let concentration = if volume_ul > 0.0 {
            total as f32 / volume_ul
        } else {
            0.0
        };

        Self {
            total_count: total,
            tracked_count: tracked,
            avg_vcl: avg(|m| m.vcl),
            avg_vsl: avg(|m| m.vsl),
            avg_vap: avg(|m| m.vap),
            avg_lin: avg(|m| m.lin),
            avg_alh: avg(|m| m.alh),
            avg_bcf: avg(|m| m.bcf),
            total_motility,
            progressive_motility,
            non_progressive_motility: total_motility - progressive_motility,
            immotile: if total == 0 { 0.0 } else { 100.0 - total_motility },
            concentration,
        }
    }
}
