//! Bounding-box transform primitives
//!
//! Stateless operations over a [`CanvasHost`]: measure, align, place
//! against a side with a gap, rotate about the visual center, and resize
//! to a physical target. Every move is expressed as a translation of the
//! moving shape, so the base shape is never touched.

use crate::host::{CanvasHost, ShapeId, ShapeKind};

use super::composite::with_composite;
use super::error::LayoutError;
use super::transform::validate_quarter_turn;
use super::types::{to_points, BoundingBox, Position, Side};

/// Translations smaller than this are skipped
const MOVE_EPSILON: f64 = 1e-9;

/// Visual bounds of a shape.
///
/// Leaves report their own geometry. Groups union their children, except
/// a clipped group, whose clipping path alone defines what is visible.
pub fn bounds_of<H: CanvasHost + ?Sized>(
    host: &H,
    shape: ShapeId,
) -> Result<BoundingBox, LayoutError> {
    match host.kind(shape)? {
        ShapeKind::Path | ShapeKind::Text => host.bounding_box(shape),
        ShapeKind::Group { clipped } => {
            let children = host.children(crate::host::Container::Group(shape))?;
            if clipped {
                for child in &children {
                    if host.is_clipping_path(*child)? {
                        return bounds_of(host, *child);
                    }
                }
            }
            union_of(host, &children)?
                .ok_or_else(|| LayoutError::empty_bounds(format!("group {}", shape.0)))
        }
    }
}

/// Combined visual bounds of several shapes
pub fn bounds_of_all<H: CanvasHost + ?Sized>(
    host: &H,
    shapes: &[ShapeId],
) -> Result<BoundingBox, LayoutError> {
    union_of(host, shapes)?.ok_or_else(|| {
        let ids: Vec<String> = shapes.iter().map(|s| s.0.to_string()).collect();
        LayoutError::empty_bounds(format!("shapes [{}]", ids.join(", ")))
    })
}

/// Union of the shapes that have geometry; empty groups are skipped
fn union_of<H: CanvasHost + ?Sized>(
    host: &H,
    shapes: &[ShapeId],
) -> Result<Option<BoundingBox>, LayoutError> {
    let mut acc: Option<BoundingBox> = None;
    for shape in shapes {
        let bounds = match bounds_of(host, *shape) {
            Ok(b) => b,
            Err(LayoutError::EmptyBounds { .. }) => continue,
            Err(e) => return Err(e),
        };
        acc = Some(match acc {
            Some(a) => a.union(&bounds),
            None => bounds,
        });
    }
    Ok(acc)
}

/// Offset that brings `moving` into alignment with `target`
pub fn alignment_delta(
    target: &BoundingBox,
    moving: &BoundingBox,
    position: Position,
) -> (f64, f64) {
    let tc = target.center();
    let mc = moving.center();
    let left = target.left - moving.left;
    let right = target.right - moving.right;
    let top = target.top - moving.top;
    let bottom = target.bottom - moving.bottom;
    let center_x = tc.x - mc.x;
    let center_y = tc.y - mc.y;

    match position {
        Position::Left => (left, 0.0),
        Position::Right => (right, 0.0),
        Position::Top => (0.0, top),
        Position::Bottom => (0.0, bottom),
        Position::LeftCenter => (left, center_y),
        Position::RightCenter => (right, center_y),
        Position::TopCenter => (center_x, top),
        Position::BottomCenter => (center_x, bottom),
        Position::Center => (center_x, center_y),
        Position::CenterX => (center_x, 0.0),
        Position::CenterY => (0.0, center_y),
    }
}

/// Translate a shape unless the offset is negligible
fn translate_by<H: CanvasHost + ?Sized>(
    host: &mut H,
    shape: ShapeId,
    dx: f64,
    dy: f64,
) -> Result<(), LayoutError> {
    if dx.abs() < MOVE_EPSILON && dy.abs() < MOVE_EPSILON {
        return Ok(());
    }
    host.translate(shape, dx, dy)
}

/// Align `moving` to `base` on the given edge or center
pub fn align<H: CanvasHost + ?Sized>(
    host: &mut H,
    base: ShapeId,
    moving: ShapeId,
    position: Position,
) -> Result<(), LayoutError> {
    let target = bounds_of(host, base)?;
    align_to_rect(host, moving, &target, position)
}

/// Align `moving` against a bare rectangle
pub fn align_to_rect<H: CanvasHost + ?Sized>(
    host: &mut H,
    moving: ShapeId,
    rect: &BoundingBox,
    position: Position,
) -> Result<(), LayoutError> {
    let current = bounds_of(host, moving)?;
    let (dx, dy) = alignment_delta(rect, &current, position);
    translate_by(host, moving, dx, dy)
}

/// Place `moving` against `side` of `base`, separated by `gap` points.
///
/// Only the axis of the side changes; the other axis is left for a
/// follow-up [`align`].
pub fn move_adjacent<H: CanvasHost + ?Sized>(
    host: &mut H,
    base: ShapeId,
    moving: ShapeId,
    side: Side,
    gap: f64,
) -> Result<(), LayoutError> {
    if !gap.is_finite() || gap < 0.0 {
        return Err(LayoutError::invalid_parameter(
            "gap",
            format!("gap must be a non-negative number, got {}", gap),
        ));
    }
    let b = bounds_of(host, base)?;
    let m = bounds_of(host, moving)?;

    let (dx, dy) = match side {
        Side::Right => ((b.right + gap) - m.left, 0.0),
        Side::Left => ((b.left - gap) - m.right, 0.0),
        Side::Top => (0.0, (b.top - gap) - m.bottom),
        Side::Bottom => (0.0, (b.bottom + gap) - m.top),
    };
    translate_by(host, moving, dx, dy)
}

/// Rotate a shape by a quarter turn, keeping its bounds center in place
pub fn rotate_about_center<H: CanvasHost + ?Sized>(
    host: &mut H,
    shape: ShapeId,
    degrees: f64,
) -> Result<(), LayoutError> {
    validate_quarter_turn(degrees)?;
    if degrees == 0.0 {
        return Ok(());
    }
    let before = bounds_of(host, shape)?.center();
    host.rotate(shape, degrees)?;
    let after = bounds_of(host, shape)?.center();
    translate_by(host, shape, before.x - after.x, before.y - after.y)
}

/// Rotate several shapes as one rigid unit about their combined center
pub fn rotate_group_about_center<H: CanvasHost + ?Sized>(
    host: &mut H,
    shapes: &[ShapeId],
    degrees: f64,
) -> Result<(), LayoutError> {
    validate_quarter_turn(degrees)?;
    match shapes {
        [] => Err(LayoutError::invalid_parameter("shapes", "nothing to rotate")),
        [single] => rotate_about_center(host, *single, degrees),
        _ => with_composite(host, shapes, shapes.first().copied(), |host, unit| {
            rotate_about_center(host, unit.shape(), degrees)
        }),
    }
}

/// Scale shapes so their combined bounds measure the target size in inches.
///
/// An omitted axis keeps its current size. Several shapes are scaled as
/// one unit. The center of the bounds does not move.
pub fn resize_to_target<H: CanvasHost + ?Sized>(
    host: &mut H,
    shapes: &[ShapeId],
    target_width: Option<f64>,
    target_height: Option<f64>,
) -> Result<(), LayoutError> {
    for (name, value) in [("target_width", target_width), ("target_height", target_height)] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(LayoutError::invalid_parameter(
                    name,
                    format!("must be a positive size in inches, got {}", v),
                ));
            }
        }
    }
    match shapes {
        [] => Err(LayoutError::invalid_parameter("shapes", "nothing to resize")),
        [single] => resize_one(host, *single, target_width, target_height),
        _ => with_composite(host, shapes, shapes.first().copied(), |host, unit| {
            resize_one(host, unit.shape(), target_width, target_height)
        }),
    }
}

fn resize_one<H: CanvasHost + ?Sized>(
    host: &mut H,
    shape: ShapeId,
    target_width: Option<f64>,
    target_height: Option<f64>,
) -> Result<(), LayoutError> {
    let before = bounds_of(host, shape)?;
    if before.width() <= 0.0 || before.height() <= 0.0 {
        return Err(LayoutError::bounds_unavailable(
            shape,
            "zero-size bounds cannot be scaled",
        ));
    }
    let sx = target_width
        .map(|w| to_points(w) / before.width() * 100.0)
        .unwrap_or(100.0);
    let sy = target_height
        .map(|h| to_points(h) / before.height() * 100.0)
        .unwrap_or(100.0);
    host.resize(shape, sx, sy)?;

    let center = before.center();
    let after = bounds_of(host, shape)?.center();
    translate_by(host, shape, center.x - after.x, center.y - after.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Container, MemoryHost};
    use crate::layout::types::{Dimension, Point};

    const EPSILON: f64 = 1e-6;

    fn host_with_canvas() -> (MemoryHost, Container) {
        let mut host = MemoryHost::new();
        let canvas = host.add_canvas(BoundingBox::new(0.0, 0.0, 2000.0, 2000.0));
        (host, Container::Canvas(canvas.id))
    }

    #[test]
    fn test_move_adjacent_right_is_exact() {
        let (mut host, c) = host_with_canvas();
        let base = host.add_path(c, "base", BoundingBox::new(50.0, 0.0, 100.0, 40.0)).unwrap();
        let moving = host.add_path(c, "moving", BoundingBox::new(-10.0, 5.0, 10.0, 15.0)).unwrap();

        move_adjacent(&mut host, base, moving, Side::Right, 7.2).unwrap();

        let m = bounds_of(&host, moving).unwrap();
        assert_eq!(m.left, 107.2);
        assert_eq!(m.top, 5.0, "off-axis position is unchanged");
    }

    #[test]
    fn test_move_adjacent_each_side() {
        let (mut host, c) = host_with_canvas();
        let base = host.add_path(c, "base", BoundingBox::new(100.0, 100.0, 200.0, 200.0)).unwrap();
        let moving = host.add_path(c, "moving", BoundingBox::new(0.0, 0.0, 10.0, 10.0)).unwrap();

        move_adjacent(&mut host, base, moving, Side::Left, 5.0).unwrap();
        assert_eq!(bounds_of(&host, moving).unwrap().right, 95.0);

        move_adjacent(&mut host, base, moving, Side::Top, 5.0).unwrap();
        assert_eq!(bounds_of(&host, moving).unwrap().bottom, 95.0);

        move_adjacent(&mut host, base, moving, Side::Bottom, 5.0).unwrap();
        assert_eq!(bounds_of(&host, moving).unwrap().top, 205.0);
    }

    #[test]
    fn test_move_adjacent_rejects_negative_gap() {
        let (mut host, c) = host_with_canvas();
        let a = host.add_path(c, "a", BoundingBox::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let b = host.add_path(c, "b", BoundingBox::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let err = move_adjacent(&mut host, a, b, Side::Right, -1.0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { .. }));
    }

    #[test]
    fn test_align_variants() {
        let (mut host, c) = host_with_canvas();
        let base = host.add_path(c, "base", BoundingBox::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        let moving = host.add_path(c, "moving", BoundingBox::new(300.0, 300.0, 320.0, 340.0)).unwrap();

        align(&mut host, base, moving, Position::Center).unwrap();
        assert_eq!(bounds_of(&host, moving).unwrap().center(), Point::new(50.0, 50.0));

        align(&mut host, base, moving, Position::BottomCenter).unwrap();
        let m = bounds_of(&host, moving).unwrap();
        assert_eq!(m.bottom, 100.0);
        assert_eq!(m.center().x, 50.0);

        align(&mut host, base, moving, Position::Left).unwrap();
        let m = bounds_of(&host, moving).unwrap();
        assert_eq!(m.left, 0.0);
        assert_eq!(m.bottom, 100.0);
    }

    #[test]
    fn test_clipped_group_uses_clip_path() {
        let (mut host, c) = host_with_canvas();
        let group = host.add_group(c, "clipped", true).unwrap();
        host.add_path(Container::Group(group), "art", BoundingBox::new(0.0, 0.0, 500.0, 500.0))
            .unwrap();
        host.add_clipping_path(group, BoundingBox::new(100.0, 100.0, 200.0, 150.0))
            .unwrap();

        assert_eq!(
            bounds_of(&host, group).unwrap(),
            BoundingBox::new(100.0, 100.0, 200.0, 150.0)
        );
    }

    #[test]
    fn test_empty_group_has_empty_bounds() {
        let (mut host, c) = host_with_canvas();
        let group = host.add_group(c, "empty", false).unwrap();
        assert!(matches!(
            bounds_of(&host, group),
            Err(LayoutError::EmptyBounds { .. })
        ));
        assert!(matches!(
            bounds_of_all(&host, &[]),
            Err(LayoutError::EmptyBounds { .. })
        ));
    }

    #[test]
    fn test_rotate_about_center_keeps_center() {
        let (mut host, c) = host_with_canvas();
        let shape = host.add_path(c, "s", BoundingBox::new(10.0, 20.0, 110.0, 70.0)).unwrap();
        let center = bounds_of(&host, shape).unwrap().center();

        rotate_about_center(&mut host, shape, 90.0).unwrap();
        let after = bounds_of(&host, shape).unwrap();
        assert!(after.center().distance(center) < EPSILON);
        assert!((after.width() - 50.0).abs() < EPSILON);
        assert!((after.height() - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotate_rejects_odd_angles() {
        let (mut host, c) = host_with_canvas();
        let shape = host.add_path(c, "s", BoundingBox::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(
            rotate_about_center(&mut host, shape, 45.0),
            Err(LayoutError::UnsupportedRotation { degrees: 45.0 })
        );
    }

    #[test]
    fn test_rotate_group_keeps_relative_layout() {
        let (mut host, c) = host_with_canvas();
        let a = host.add_path(c, "a", BoundingBox::new(0.0, 0.0, 100.0, 50.0)).unwrap();
        let b = host.add_path(c, "b", BoundingBox::new(110.0, 0.0, 210.0, 50.0)).unwrap();
        let before = bounds_of_all(&host, &[a, b]).unwrap();

        rotate_group_about_center(&mut host, &[a, b], 90.0).unwrap();

        let after = bounds_of_all(&host, &[a, b]).unwrap();
        assert!(after.center().distance(before.center()) < EPSILON);
        assert!((after.width() - before.height()).abs() < EPSILON);
        // b was right of a, so after a clockwise turn it sits below a
        assert!(bounds_of(&host, b).unwrap().top > bounds_of(&host, a).unwrap().bottom);
        assert_eq!(host.children(c).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_resize_single_axis() {
        let (mut host, c) = host_with_canvas();
        let shape = host
            .add_artwork(c, "FRONT", Dimension::new(2.0, 1.0), Point::new(0.0, 0.0), None)
            .unwrap();
        let center = bounds_of(&host, shape).unwrap().center();

        resize_to_target(&mut host, &[shape], Some(4.0), None).unwrap();

        let after = bounds_of(&host, shape).unwrap();
        assert!((after.width() - 288.0).abs() < EPSILON);
        assert!((after.height() - 72.0).abs() < EPSILON);
        assert!(after.center().distance(center) < EPSILON);
    }

    #[test]
    fn test_resize_many_as_one() {
        let (mut host, c) = host_with_canvas();
        let a = host.add_path(c, "a", BoundingBox::new(0.0, 0.0, 72.0, 72.0)).unwrap();
        let b = host.add_path(c, "b", BoundingBox::new(144.0, 0.0, 216.0, 72.0)).unwrap();

        resize_to_target(&mut host, &[a, b], Some(6.0), Some(2.0)).unwrap();

        let all = bounds_of_all(&host, &[a, b]).unwrap();
        assert!((all.width() - 432.0).abs() < EPSILON);
        assert!((all.height() - 144.0).abs() < EPSILON);
        assert!((bounds_of(&host, a).unwrap().width() - 144.0).abs() < EPSILON);
        assert_eq!(host.children(c).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_resize_rejects_bad_target() {
        let (mut host, c) = host_with_canvas();
        let a = host.add_path(c, "a", BoundingBox::new(0.0, 0.0, 72.0, 72.0)).unwrap();
        assert!(resize_to_target(&mut host, &[a], Some(0.0), None).is_err());
        assert!(resize_to_target(&mut host, &[], Some(1.0), None).is_err());
    }
}
