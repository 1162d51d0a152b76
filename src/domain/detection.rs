use serde::{Deserialize, Serialize};

/// Box produced by the decoder, still in model input coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
    pub class_id: usize,
}

impl Candidate {
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32, confidence: f32, class_id: usize) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
            confidence,
            class_id,
        }
    }

    /// Width/height are clamped at zero so inverted boxes have no area.
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }
}

/// Final detection in original image pixel coordinates.
///
/// Serialized as `{x1, y1, x2, y2, conf, classId}`, the shape web and mobile
/// clients read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(rename = "conf")]
    pub confidence: f32,
    #[serde(rename = "classId")]
    pub class_id: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_conf_and_class_id() {
        let d = Detection { x1: 540.0, y1: 260.0, x2: 740.0, y2: 460.0, confidence: 0.5, class_id: 7 };
        let json = serde_json::to_value(d).unwrap();
        assert_eq!(json["conf"], 0.5);
        assert_eq!(json["classId"], 7);

        let back: Detection = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }
}
