use super::detection::Candidate;

/// Keeps the union non-zero for degenerate boxes.
const IOU_EPSILON: f32 = 1e-9;

pub fn iou(a: &Candidate, b: &Candidate) -> f32 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    inter / (a.area() + b.area() - inter + IOU_EPSILON)
}

/// Greedy per-class non-maximum suppression.
///
/// Candidates are visited by descending confidence (ties keep their input
/// order). A candidate is dropped when it overlaps an already kept box of the
/// same class by more than `iou_threshold`. Stops once `max_detections` boxes
/// are kept.
pub fn suppress(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    let mut kept: Vec<Candidate> = Vec::with_capacity(max_detections.min(candidates.len()));
    if max_detections == 0 {
        return kept;
    }

    // sort_by is stable
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    for candidate in candidates {
        let overlaps = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && iou(&candidate, k) > iou_threshold);
        if !overlaps {
            kept.push(candidate);
            if kept.len() >= max_detections {
                break;
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class_id: usize) -> Candidate {
        Candidate { x1, y1, x2, y2, confidence, class_id }
    }

    #[test]
    fn iou_basics() {
        let a = cand(0.0, 0.0, 10.0, 10.0, 0.9, 0);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);

        let half = cand(5.0, 0.0, 15.0, 10.0, 0.9, 0);
        assert!((iou(&a, &half) - 50.0 / 150.0).abs() < 1e-6);

        let apart = cand(20.0, 20.0, 30.0, 30.0, 0.9, 0);
        assert_eq!(iou(&a, &apart), 0.0);
    }

    #[test]
    fn degenerate_box_has_zero_iou() {
        let point = cand(5.0, 5.0, 5.0, 5.0, 0.99, 0);
        let boxed = cand(0.0, 0.0, 10.0, 10.0, 0.5, 0);
        assert_eq!(iou(&point, &boxed), 0.0);
        assert_eq!(iou(&point, &point), 0.0);

        let kept = suppress(vec![boxed, point, point], 0.45, 10);
        assert_eq!(kept, vec![point, point, boxed]);
    }

    #[test]
    fn inverted_box_counts_as_empty() {
        let inverted = cand(10.0, 10.0, 0.0, 0.0, 0.9, 0);
        assert_eq!(inverted.area(), 0.0);
        assert_eq!(iou(&inverted, &cand(0.0, 0.0, 10.0, 10.0, 0.9, 0)), 0.0);
    }

    #[test]
    fn overlapping_same_class_is_suppressed() {
        let strong = cand(0.0, 0.0, 10.0, 10.0, 0.9, 1);
        let weak = cand(1.0, 1.0, 11.0, 11.0, 0.8, 1);
        let kept = suppress(vec![weak, strong], 0.45, 10);
        assert_eq!(kept, vec![strong]);
    }

    #[test]
    fn other_class_never_suppresses() {
        let a = cand(0.0, 0.0, 10.0, 10.0, 0.9, 1);
        let b = cand(0.0, 0.0, 10.0, 10.0, 0.8, 2);
        assert_eq!(suppress(vec![a, b], 0.45, 10), vec![a, b]);
    }

    #[test]
    fn overlap_at_threshold_is_kept() {
        let a = cand(0.0, 0.0, 10.0, 10.0, 0.9, 0);
        let b = cand(5.0, 0.0, 15.0, 10.0, 0.8, 0);
        let at = iou(&a, &b);
        assert_eq!(suppress(vec![a, b], at, 10).len(), 2);
        assert_eq!(suppress(vec![a, b], at - 1e-4, 10).len(), 1);
    }

    #[test]
    fn cap_stops_early() {
        let boxes: Vec<Candidate> = (0..20)
            .map(|i| {
                let x = i as f32 * 100.0;
                cand(x, 0.0, x + 10.0, 10.0, 0.5 + i as f32 * 0.01, 0)
            })
            .collect();
        let kept = suppress(boxes, 0.45, 5);
        assert_eq!(kept.len(), 5);
        assert!(kept.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert_eq!(kept[0].x1, 1900.0);

        assert!(suppress(vec![cand(0.0, 0.0, 1.0, 1.0, 0.9, 0)], 0.45, 0).is_empty());
    }

    #[test]
    fn equal_confidence_keeps_input_order() {
        let a = cand(0.0, 0.0, 1.0, 1.0, 0.7, 0);
        let b = cand(10.0, 0.0, 11.0, 1.0, 0.7, 0);
        let c = cand(20.0, 0.0, 21.0, 1.0, 0.7, 0);
        assert_eq!(suppress(vec![b, c, a], 0.45, 10), vec![b, c, a]);
    }

    #[test]
    fn idempotent_and_no_same_class_overlap() {
        let mut boxes = Vec::new();
        for i in 0..40 {
            let f = i as f32;
            boxes.push(cand(
                (f * 7.0) % 50.0,
                (f * 3.0) % 40.0,
                (f * 7.0) % 50.0 + 20.0 + (i % 3) as f32,
                (f * 3.0) % 40.0 + 25.0,
                0.3 + ((i * 37) % 60) as f32 / 100.0,
                i % 3,
            ));
        }

        let kept = suppress(boxes, 0.45, 100);
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                if a.class_id == b.class_id {
                    assert!(iou(a, b) <= 0.45);
                }
            }
        }

        let again = suppress(kept.clone(), 0.45, 100);
        assert_eq!(again, kept);
    }
}
