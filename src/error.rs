use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Frames must be fed to the tracker in strictly increasing order.
    #[error("frame {got} arrived after frame {last}: frames must be strictly increasing")]
    FrameOrder { last: usize, got: usize },

    /// Detector output rows must carry at least `[cx, cy, w, h, objectness, score...]`.
    #[error("malformed detector output: expected at least {expected} values per box, got {got}")]
    MalformedOutput { expected: usize, got: usize },

    #[error("analysis finished without processing any frames")]
    NoFrames,

    #[error("inference failed: {0}")]
    Inference(String),
}
