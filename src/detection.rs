use serde_derive::{Deserialize, Serialize};

/// One candidate object found in one frame. Contains (x,y) of the center and
/// (width,height) of the bbox, in pixels of the original frame.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Detection {
    pub frame: usize,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(rename = "p")]
    pub confidence: f32,
    #[serde(rename = "c")]
    pub class: i32,
}

impl Detection {
    /// Intersection-over-Union of two axis-aligned boxes.
    /// Zero-area union is defined as IoU = 0.
    pub fn iou(&self, other: &Detection) -> f32 {
        let b1_area = self.w * self.h;
        let b2_area = other.w * other.h;

        let i_xmin = self.xmin().max(other.xmin());
        let i_xmax = self.xmax().min(other.xmax());
        let i_ymin = self.ymin().max(other.ymin());
        let i_ymax = self.ymax().min(other.ymax());
        let i_area = (i_xmax - i_xmin).max(0.) * (i_ymax - i_ymin).max(0.);

        let union = b1_area + b2_area - i_area;
        if union <= 0. {
            return 0.;
        }

        i_area / union
    }

    #[inline(always)]
    pub fn xmax(&self) -> f32 {
        self.x + self.w / 2.
    }

    #[inline(always)]
    pub fn ymax(&self) -> f32 {
        self.y + self.h / 2.
    }

    #[inline(always)]
    pub fn xmin(&self) -> f32 {
        self.x - self.w / 2.
    }

    #[inline(always)]
    pub fn ymin(&self) -> f32 {
        self.y - self.h / 2.
    }
}
