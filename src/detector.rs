use crate::detection::Detection;
use crate::error::Error;
use crate::frame::FrameDetections;

use ndarray::prelude::*;

/// Floats per candidate row ahead of the class scores: cx, cy, w, h, objectness.
const BOX_FIELDS: usize = 5;

/// Capability seam over the external inference runtime.
///
/// Given a preprocessed CHW float tensor, the backend returns one row per
/// candidate box: `[cx, cy, w, h, objectness, class_score_0, ...]` in the
/// coordinate space of its square input image.
pub trait Detector {
    fn infer(&self, tensor: ArrayView3<'_, f32>) -> Result<Array2<f32>, Error>;

    /// Side of the square input tensor, in pixels.
    fn input_size(&self) -> u32 {
        640
    }
}

/// Turns one frame's raw detector output into a de-duplicated detection list.
pub struct PostProcessor {
    pub confidence_threshold: f32,
    pub nms_threshold: f32,
    pub input_size: u32,
    pub frame_rate: f32,
}

impl PostProcessor {
    pub fn new(confidence_threshold: f32, nms_threshold: f32, input_size: u32, frame_rate: f32) -> Self {
        Self {
            confidence_threshold,
            nms_threshold,
            input_size,
            frame_rate,
        }
    }

    /// Confidence filtering, class-agnostic NMS and rescaling back to the
    /// original frame's pixel space. Pure function of the raw output.
    pub fn process(
        &self,
        view: ArrayView2<'_, f32>,
        frame: usize,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<FrameDetections, Error> {
        let npreds = view.shape()[0];
        let pred_size = view.shape()[1];

        if npreds > 0 && pred_size < BOX_FIELDS + 1 {
            return Err(Error::MalformedOutput {
                expected: BOX_FIELDS + 1,
                got: pred_size,
            });
        }

        // Extract the bounding boxes for which confidence is above the threshold.
        let mut candidates = Vec::new();

        for index in 0..npreds {
            let row = view.index_axis(Axis(0), index);
            let row = row.as_slice().ok_or(Error::MalformedOutput {
                expected: BOX_FIELDS + 1,
                got: 0,
            })?;

            let (x, y, w, h, objectness) = (row[0], row[1], row[2], row[3], row[4]);
            let scores = &row[BOX_FIELDS..];

            let mut class_index = -1;
            let mut class_score = 0.0;

            for (idx, val) in scores.iter().copied().enumerate() {
                if val > class_score {
                    class_index = idx as i32;
                    class_score = val;
                }
            }

            let confidence = objectness * class_score;

            if objectness <= self.confidence_threshold || confidence <= self.confidence_threshold {
                continue;
            }

            candidates.push(Detection {
                frame,
                x,
                y,
                w,
                h,
                confidence,
                class: class_index,
            });
        }

        let kept = self.non_maximum_suppression(&mut candidates);
        log::trace!(
            "frame {}: {} candidates, {} after nms",
            frame,
            npreds,
            kept.len()
        );

        // Back from input-tensor space to frame pixels, independently per axis.
        let sx = frame_width as f32 / self.input_size as f32;
        let sy = frame_height as f32 / self.input_size as f32;

        let detections = candidates
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| kept.contains(&(*idx as i32)))
            .map(|(_, mut det)| {
                det.x *= sx;
                det.y *= sy;
                det.w *= sx;
                det.h *= sy;
                det
            })
            .collect();

        Ok(FrameDetections::new(frame, self.frame_rate, detections))
    }

    /// Class-agnostic NMS: returns the indexes of `dets` that survive.
    /// Sorts `dets` descending by confidence in place.
    fn non_maximum_suppression(&self, dets: &mut [Detection]) -> Vec<i32> {
        if dets.len() < 2 {
            return (0..dets.len() as i32).collect();
        }

        dets.sort_unstable_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let mut retain: Vec<_> = (0..dets.len() as i32).collect();
        for idx in 0..dets.len() - 1 {
            if retain[idx] != -1 {
                for r in retain[idx + 1..].iter_mut() {
                    if *r != -1 {
                        let iou = dets[idx].iou(&dets[*r as usize]);
                        if iou > self.nms_threshold {
                            *r = -1;
                        }
                    }
                }
            }
        }

        retain.retain(|&x| x > -1);
        retain
    }
}
