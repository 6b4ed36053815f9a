//! Nearest-edge/center alignment. Each axis is solved independently against
//! the candidates' min/center/max lines; ties keep the first minimal distance
//! encountered while iterating, so candidate order is part of the behavior.

use crate::geometry::{Bounds, Point};
use serde::{Deserialize, Serialize};

/// A guide segment for UI feedback, spanning the union of the two shapes'
/// cross extents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    pub from: Point,
    pub to: Point,
}

/// The correction vector plus the guides that produced it. `horizontal`
/// refers to snapping along the x axis (a vertical guide line) and
/// `vertical` to the y axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snap {
    pub amount: Point,
    pub horizontal: Option<Guide>,
    pub vertical: Option<Guide>,
}

/// Snap distance in frame pixels; tighter when zoomed in.
pub fn snap_threshold(scale: f32) -> i32 {
    (5.0 / scale.max(f32::EPSILON)).ceil() as i32
}

/// Snap a moving point against candidate bounds. A distance below (never at)
/// `threshold` wins.
pub fn point_snap(point: Point, targets: &[Bounds], threshold: i32) -> Snap {
    let mut snap = Snap::default();
    let mut min_distance_x = threshold;
    let mut min_distance_y = threshold;

    for bounds in targets {
        for target_x in [bounds.left, bounds.center.x, bounds.right] {
            let dist = (point.x - target_x).abs();
            if dist < min_distance_x {
                min_distance_x = dist;
                snap.amount.x = target_x - point.x;
                let min_y = point.y.min(bounds.top);
                let max_y = point.y.max(bounds.bottom);
                snap.horizontal = Some(Guide {
                    from: Point::new(target_x, min_y),
                    to: Point::new(target_x, max_y),
                });
            }
        }
        for target_y in [bounds.top, bounds.center.y, bounds.bottom] {
            let dist = (point.y - target_y).abs();
            if dist < min_distance_y {
                min_distance_y = dist;
                snap.amount.y = target_y - point.y;
                let min_x = point.x.min(bounds.left);
                let max_x = point.x.max(bounds.right);
                snap.vertical = Some(Guide {
                    from: Point::new(min_x, target_y),
                    to: Point::new(max_x, target_y),
                });
            }
        }
    }
    snap
}

/// Snap a moving bounding box: its min/center/max lines are compared against
/// each candidate's min/center/max lines, per axis.
pub fn bounds_snap(bounds: &Bounds, targets: &[Bounds], threshold: i32) -> Snap {
    let mut snap = Snap::default();
    let mut min_distance_x = threshold;
    let mut min_distance_y = threshold;

    for target in targets {
        for x in [bounds.left, bounds.center.x, bounds.right] {
            for target_x in [target.left, target.center.x, target.right] {
                let dist = (x - target_x).abs();
                if dist < min_distance_x {
                    min_distance_x = dist;
                    snap.amount.x = target_x - x;
                    let edges = [bounds.top, bounds.bottom, target.top, target.bottom];
                    snap.horizontal = Some(Guide {
                        from: Point::new(target_x, edges.iter().copied().min().unwrap_or(0)),
                        to: Point::new(target_x, edges.iter().copied().max().unwrap_or(0)),
                    });
                }
            }
        }
        for y in [bounds.top, bounds.center.y, bounds.bottom] {
            for target_y in [target.top, target.center.y, target.bottom] {
                let dist = (y - target_y).abs();
                if dist < min_distance_y {
                    min_distance_y = dist;
                    snap.amount.y = target_y - y;
                    let edges = [bounds.left, bounds.right, target.left, target.right];
                    snap.vertical = Some(Guide {
                        from: Point::new(edges.iter().copied().min().unwrap_or(0), target_y),
                        to: Point::new(edges.iter().copied().max().unwrap_or(0), target_y),
                    });
                }
            }
        }
    }
    snap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[test]
    fn threshold_scales_with_zoom() {
        assert_eq!(snap_threshold(5.0), 1);
        assert_eq!(snap_threshold(1.0), 5);
        assert_eq!(snap_threshold(0.5), 10);
    }

    #[test]
    fn first_minimal_candidate_wins() {
        let a = Bounds::new(Point::new(10, 0), Size::new(1, 1));
        let b = Bounds::new(Point::new(10, 20), Size::new(1, 1));
        let snap = point_snap(Point::new(8, 0), &[a, b], 5);
        assert_eq!(snap.amount.x, 2);
        // The guide belongs to the first candidate at that distance.
        assert_eq!(snap.horizontal.unwrap().to, Point::new(10, 0));
    }
}
