use serde_derive::{Deserialize, Serialize};

/// All tunables of the analysis pipeline.
///
/// `pixel_to_micron` and `frame_rate` depend on the imaging setup and have no
/// safe defaults, so the constructor takes them explicitly; everything else
/// starts at its standard value.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnalyzerConfig {
    /// Microns per pixel of the original frame. Must be calibrated per setup.
    pub pixel_to_micron: f32,
    /// Video frame rate in frames per second.
    pub frame_rate: f32,

    /// Square side of the detector input tensor, in pixels.
    #[serde(default = "default_input_size")]
    pub input_size: u32,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_nms_threshold")]
    pub nms_threshold: f32,

    /// Maximum center distance (px) for a detection to continue a track.
    #[serde(default = "default_max_association_distance")]
    pub max_association_distance: f32,
    /// Consecutive missed frames after which a track terminates.
    #[serde(default = "default_max_missed_frames")]
    pub max_missed_frames: u32,

    #[serde(default = "default_min_track_samples")]
    pub min_track_samples: usize,
    /// Minimum cumulative path length (px) for a track to count as a cell.
    #[serde(default = "default_min_track_movement")]
    pub min_track_movement: f32,

    /// VCL above which a cell counts as motile, in microns per second.
    #[serde(default = "default_motility_threshold")]
    pub motility_threshold: f32,
    /// LIN above which a motile cell counts as progressive.
    #[serde(default = "default_progressive_linearity")]
    pub progressive_linearity: f32,

    #[serde(default = "default_analysis_area_mm2")]
    pub analysis_area_mm2: f32,
    #[serde(default = "default_chamber_depth_um")]
    pub chamber_depth_um: f32,
}

impl AnalyzerConfig {
    pub fn new(pixel_to_micron: f32, frame_rate: f32) -> Self {
        Self {
            pixel_to_micron,
            frame_rate,
            input_size: default_input_size(),
            confidence_threshold: default_confidence_threshold(),
            nms_threshold: default_nms_threshold(),
            max_association_distance: default_max_association_distance(),
            max_missed_frames: default_max_missed_frames(),
            min_track_samples: default_min_track_samples(),
            min_track_movement: default_min_track_movement(),
            motility_threshold: default_motility_threshold(),
            progressive_linearity: default_progressive_linearity(),
            analysis_area_mm2: default_analysis_area_mm2(),
            chamber_depth_um: default_chamber_depth_um(),
        }
    }
}

fn default_input_size() -> u32 {
    640
}

fn default_confidence_threshold() -> f32 {
    0.5
}

fn default_nms_threshold() -> f32 {
    0.4
}

fn default_max_association_distance() -> f32 {
    50.0
}

fn default_max_missed_frames() -> u32 {
    5
}

fn default_min_track_samples() -> usize {
    3
}

fn default_min_track_movement() -> f32 {
    10.0
}

fn default_motility_threshold() -> f32 {
    5.0
}

fn default_progressive_linearity() -> f32 {
    0.45
}

fn default_analysis_area_mm2() -> f32 {
    1.0
}

fn default_chamber_depth_um() -> f32 {
    20.0
}
