//! Quarter-turn rotation of points and bounding boxes.
//!
//! Clockwise positive angles, in degrees, with the y axis pointing down:
//! - 90° sends right to down
//! - -90° sends right to up
//!
//! Only multiples of 90° up to a half turn are supported, so a rotated
//! box is always exact.

use super::error::LayoutError;
use super::types::{BoundingBox, Point};

/// A rotation the layout engine knows how to apply exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterTurn {
    None,
    Clockwise,
    CounterClockwise,
    Half,
}

impl QuarterTurn {
    /// Map an angle of 0, ±90 or ±180 degrees to its turn
    pub fn from_degrees(degrees: f64) -> Result<Self, LayoutError> {
        let near = |target: f64| (degrees - target).abs() < 1e-9;
        if near(0.0) {
            Ok(QuarterTurn::None)
        } else if near(90.0) {
            Ok(QuarterTurn::Clockwise)
        } else if near(-90.0) {
            Ok(QuarterTurn::CounterClockwise)
        } else if near(180.0) || near(-180.0) {
            Ok(QuarterTurn::Half)
        } else {
            Err(LayoutError::UnsupportedRotation { degrees })
        }
    }

    pub fn degrees(&self) -> f64 {
        match self {
            QuarterTurn::None => 0.0,
            QuarterTurn::Clockwise => 90.0,
            QuarterTurn::CounterClockwise => -90.0,
            QuarterTurn::Half => 180.0,
        }
    }

    /// Width and height trade places
    pub fn swaps_axes(&self) -> bool {
        matches!(self, QuarterTurn::Clockwise | QuarterTurn::CounterClockwise)
    }

    /// Turn `point` about `pivot`
    pub fn rotate_point(&self, point: Point, pivot: Point) -> Point {
        let dx = point.x - pivot.x;
        let dy = point.y - pivot.y;
        let (x, y) = match self {
            QuarterTurn::None => (dx, dy),
            QuarterTurn::Clockwise => (-dy, dx),
            QuarterTurn::CounterClockwise => (dy, -dx),
            QuarterTurn::Half => (-dx, -dy),
        };
        Point::new(pivot.x + x, pivot.y + y)
    }

    /// Turn a box about `pivot`; opposite corners stay opposite
    pub fn rotate_bounds(&self, bounds: &BoundingBox, pivot: Point) -> BoundingBox {
        let a = self.rotate_point(Point::new(bounds.left, bounds.top), pivot);
        let b = self.rotate_point(Point::new(bounds.right, bounds.bottom), pivot);
        BoundingBox::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }
}

/// Check that `degrees` is one of 0, ±90, ±180
pub fn validate_quarter_turn(degrees: f64) -> Result<(), LayoutError> {
    QuarterTurn::from_degrees(degrees).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clockwise_sends_right_to_down() {
        let pivot = Point::new(0.0, 0.0);
        assert_eq!(
            QuarterTurn::Clockwise.rotate_point(Point::new(1.0, 0.0), pivot),
            Point::new(0.0, 1.0)
        );
        assert_eq!(
            QuarterTurn::CounterClockwise.rotate_point(Point::new(1.0, 0.0), pivot),
            Point::new(0.0, -1.0)
        );
        assert_eq!(
            QuarterTurn::Half.rotate_point(Point::new(1.0, 0.0), pivot),
            Point::new(-1.0, 0.0)
        );
    }

    #[test]
    fn test_rotation_about_offset_pivot() {
        // 50 units right of the pivot ends up 50 units below it
        let result = QuarterTurn::Clockwise.rotate_point(Point::new(100.0, 50.0), Point::new(50.0, 50.0));
        assert_eq!(result, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_bounds_about_top_left_corner() {
        let bounds = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let pivot = bounds.origin();
        assert_eq!(
            QuarterTurn::Clockwise.rotate_bounds(&bounds, pivot),
            BoundingBox::new(-50.0, 0.0, 0.0, 100.0)
        );
        assert_eq!(
            QuarterTurn::Half.rotate_bounds(&bounds, pivot),
            BoundingBox::new(-100.0, -50.0, 0.0, 0.0)
        );
        assert_eq!(QuarterTurn::None.rotate_bounds(&bounds, pivot), bounds);
    }

    #[test]
    fn test_from_degrees() {
        assert_eq!(QuarterTurn::from_degrees(-180.0), Ok(QuarterTurn::Half));
        assert_eq!(QuarterTurn::from_degrees(90.0).map(|t| t.swaps_axes()), Ok(true));
        assert_eq!(
            validate_quarter_turn(45.0),
            Err(LayoutError::UnsupportedRotation { degrees: 45.0 })
        );
        assert!(validate_quarter_turn(270.0).is_err());
    }
}
