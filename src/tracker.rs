use crate::error::Error;
use crate::frame::FrameDetections;
use crate::track::{Track, TrackState};

use nalgebra as na;

/// Frame-to-frame track associator.
///
/// Greedy nearest-neighbor assignment: tracks claim detections in ascending
/// id order, so ties are deterministic and no detection is ever claimed
/// twice. This trades a little association accuracy against a globally
/// optimal bipartite match for linear-ish per-frame cost.
pub struct Tracker {
    max_association_distance: f32,
    max_missed_frames: u32,
    /// Non-terminated tracks, ascending by id.
    live: Vec<Track>,
    /// Terminated tracks, in order of termination.
    done: Vec<Track>,
    next_id: u32,
    last_frame: Option<usize>,
}

impl Tracker {
    pub fn new(max_association_distance: f32, max_missed_frames: u32) -> Self {
        Self {
            max_association_distance,
            max_missed_frames,
            live: Vec::new(),
            done: Vec::new(),
            next_id: 1,
            last_frame: None,
        }
    }

    #[inline]
    pub fn live_tracks(&self) -> &[Track] {
        &self.live
    }

    /// Consume one frame's detections. Frames must arrive in strictly
    /// increasing order; a frame with zero detections is not an error, it
    /// just ages every live track.
    pub fn update(&mut self, frame: &FrameDetections) -> Result<(), Error> {
        if let Some(last) = self.last_frame {
            if frame.frame <= last {
                return Err(Error::FrameOrder {
                    last,
                    got: frame.frame,
                });
            }
        }
        self.last_frame = Some(frame.frame);

        let mut assigned = vec![false; frame.len()];

        for track in &mut self.live {
            let pos = track.last_point();

            let nearest = frame
                .iter()
                .enumerate()
                .filter(|(idx, _)| !assigned[*idx])
                .map(|(idx, det)| (idx, det, na::distance(&pos, &na::Point2::new(det.x, det.y))))
                .min_by(|a, b| a.2.total_cmp(&b.2));

            match nearest {
                Some((idx, det, dist)) if dist < self.max_association_distance => {
                    assigned[idx] = true;
                    track.push(frame.timestamp, na::Point2::new(det.x, det.y), det.confidence);
                }
                _ => {
                    track.misses += 1;
                    track.state = TrackState::Lost;
                }
            }
        }

        let max_missed = self.max_missed_frames;
        let current = frame.frame;
        let done = &mut self.done;

        self.live.retain_mut(|track| {
            if track.misses >= max_missed {
                track.terminate(current);
                log::debug!("track {} terminated at frame {}", track.id, current);
                done.push(track.clone());
                false
            } else {
                true
            }
        });

        for (idx, det) in frame.iter().enumerate() {
            if assigned[idx] {
                continue;
            }

            let id = self.next_id;
            self.next_id += 1;
            log::debug!("track {} started at frame {}", id, frame.frame);
            self.live.push(Track::new(
                id,
                frame.frame,
                frame.timestamp,
                na::Point2::new(det.x, det.y),
                det.confidence,
            ));
        }

        Ok(())
    }

    /// End of the video: terminate every remaining track at the last frame
    /// seen and hand the whole arena over, ascending by id.
    pub fn finish(mut self) -> Vec<Track> {
        let last = self.last_frame.unwrap_or(0);

        for mut track in self.live {
            track.terminate(last);
            self.done.push(track);
        }

        self.done.sort_unstable_by_key(|t| t.id);
        self.done
    }
}
