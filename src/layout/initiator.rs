//! Build the first repeatable unit from a front/back artwork pair
//!
//! The pair is labelled with its size, scaled to the requested physical
//! size, arranged for the chosen mode and orientation, and grouped into a
//! [`CompositeUnit`] that the grid placer then duplicates.

use tracing::debug;

use crate::host::{CanvasHost, Container, ShapeId, ShapeKind};

use super::composite::CompositeUnit;
use super::error::LayoutError;
use super::kernel::{align, move_adjacent, resize_to_target, rotate_about_center};
use super::types::{to_points, Dimension, Mode, Orientation, Position, Side};

/// Name suffix of the 180° duplicates in an L unit
pub const TURNED_SUFFIX: &str = "_TURNED";

/// Everything needed to build the initial unit
#[derive(Debug, Clone, PartialEq)]
pub struct InitialUnitRequest {
    pub mode: Mode,
    pub orientation: Orientation,
    /// Size of each piece, in inches
    pub dimension: Dimension,
    /// Space between pieces, in inches
    pub gap: f64,
    /// Text written into the size label, e.g. "M"
    pub size_label: String,
    /// Name of the text child that receives the size label
    pub label_placeholder: String,
}

/// Look up the front and back artwork by name
pub fn find_artwork<H: CanvasHost + ?Sized>(
    host: &H,
    container: Container,
    front_name: &str,
    back_name: &str,
) -> Result<(ShapeId, ShapeId), LayoutError> {
    let find = |name: &str| {
        host.find_child_by_name(container, name)?
            .ok_or_else(|| LayoutError::missing_shape(name, container.to_string()))
    };
    Ok((find(front_name)?, find(back_name)?))
}

/// Write `label` into the text placeholder inside `shape`.
///
/// The placeholder is searched depth-first through nested groups.
pub fn stamp_size_label<H: CanvasHost + ?Sized>(
    host: &mut H,
    shape: ShapeId,
    placeholder: &str,
    label: &str,
) -> Result<(), LayoutError> {
    match find_text(host, shape, placeholder)? {
        Some(text) => host.set_text(text, label),
        None => Err(LayoutError::size_label_missing(
            host.name(shape)?,
            placeholder,
        )),
    }
}

fn find_text<H: CanvasHost + ?Sized>(
    host: &H,
    shape: ShapeId,
    placeholder: &str,
) -> Result<Option<ShapeId>, LayoutError> {
    if !matches!(host.kind(shape)?, ShapeKind::Group { .. }) {
        return Ok(None);
    }
    for child in host.children(Container::Group(shape))? {
        match host.kind(child)? {
            ShapeKind::Text if host.name(child)? == placeholder => return Ok(Some(child)),
            ShapeKind::Group { .. } => {
                if let Some(found) = find_text(host, child, placeholder)? {
                    return Ok(Some(found));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

/// Turn a front/back pair into the unit the grid is tiled from
pub fn build_initial_unit<H: CanvasHost + ?Sized>(
    host: &mut H,
    front: ShapeId,
    back: ShapeId,
    request: &InitialUnitRequest,
) -> Result<CompositeUnit, LayoutError> {
    if !request.dimension.is_positive() {
        return Err(LayoutError::invalid_parameter(
            "dimension",
            format!(
                "piece size {}x{} must be positive",
                request.dimension.width, request.dimension.height
            ),
        ));
    }
    if request.orientation == Orientation::LShape && !request.mode.supports_l_shape() {
        return Err(LayoutError::invalid_parameter(
            "orientation",
            format!("L-shape layout requires mode FB, got {}", request.mode),
        ));
    }
    let gap = to_points(request.gap);

    stamp_size_label(host, front, &request.label_placeholder, &request.size_label)?;
    stamp_size_label(host, back, &request.label_placeholder, &request.size_label)?;

    let Dimension { width, height } = request.dimension;
    resize_to_target(host, &[front], Some(width), Some(height))?;
    resize_to_target(host, &[back], Some(width), Some(height))?;
    align(host, front, back, Position::Center)?;

    let pieces = match request.orientation {
        Orientation::Vertical => {
            match request.mode {
                Mode::FB => {
                    move_adjacent(host, front, back, Side::Bottom, gap)?;
                    align(host, front, back, Position::CenterX)?;
                }
                Mode::Pant => {
                    move_adjacent(host, front, back, Side::Right, gap)?;
                    align(host, front, back, Position::CenterY)?;
                }
                Mode::B => {}
            }
            vec![front, back]
        }
        Orientation::Horizontal => {
            rotate_about_center(host, front, -90.0)?;
            rotate_about_center(host, back, -90.0)?;
            match request.mode {
                Mode::FB => {
                    move_adjacent(host, front, back, Side::Right, gap)?;
                    align(host, front, back, Position::CenterY)?;
                    rotate_about_center(host, back, 180.0)?;
                }
                Mode::Pant => {
                    move_adjacent(host, front, back, Side::Bottom, gap)?;
                    align(host, front, back, Position::CenterX)?;
                }
                Mode::B => {}
            }
            vec![front, back]
        }
        Orientation::LShape => build_pinwheel(host, front, back, gap)?,
    };

    debug!(
        mode = %request.mode,
        orientation = %request.orientation,
        pieces = pieces.len(),
        "initial unit arranged"
    );
    CompositeUnit::group(host, &pieces, Some(front))
}

/// Interlock front, back and their 180° copies into a square pinwheel
fn build_pinwheel<H: CanvasHost + ?Sized>(
    host: &mut H,
    front: ShapeId,
    back: ShapeId,
    gap: f64,
) -> Result<Vec<ShapeId>, LayoutError> {
    rotate_about_center(host, back, 90.0)?;
    align(host, front, back, Position::Bottom)?;
    move_adjacent(host, front, back, Side::Right, gap)?;

    let front_turned = turned_copy(host, front)?;
    let back_turned = turned_copy(host, back)?;

    move_adjacent(host, front, back_turned, Side::Top, gap)?;
    align(host, front, back_turned, Position::Left)?;

    move_adjacent(host, back, front_turned, Side::Top, gap)?;
    align(host, back, front_turned, Position::Right)?;

    Ok(vec![front, back, front_turned, back_turned])
}

fn turned_copy<H: CanvasHost + ?Sized>(
    host: &mut H,
    shape: ShapeId,
) -> Result<ShapeId, LayoutError> {
    let copy = host.duplicate_shape(shape)?;
    rotate_about_center(host, copy, 180.0)?;
    let name = host.name(shape)?;
    host.set_name(copy, &format!("{}{}", name, TURNED_SUFFIX))?;
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::layout::kernel::{bounds_of, bounds_of_all};
    use crate::layout::types::{BoundingBox, Point};

    const EPSILON: f64 = 1e-6;

    fn pair(host: &mut MemoryHost) -> (ShapeId, ShapeId) {
        let canvas = host.add_canvas(BoundingBox::new(0.0, 0.0, 5000.0, 5000.0));
        let c = Container::Canvas(canvas.id);
        let front = host
            .add_artwork(c, "FRONT", Dimension::new(4.0, 5.0), Point::new(0.0, 0.0), Some("SIZE"))
            .unwrap();
        let back = host
            .add_artwork(c, "BACK", Dimension::new(4.0, 5.0), Point::new(600.0, 0.0), Some("SIZE"))
            .unwrap();
        (front, back)
    }

    fn request(mode: Mode, orientation: Orientation) -> InitialUnitRequest {
        InitialUnitRequest {
            mode,
            orientation,
            dimension: Dimension::new(2.0, 3.0),
            gap: 0.5,
            size_label: "XL".to_string(),
            label_placeholder: "SIZE".to_string(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_vertical_fb_stacks_back_below() {
        let mut host = MemoryHost::new();
        let (front, back) = pair(&mut host);
        let mut unit =
            build_initial_unit(&mut host, front, back, &request(Mode::FB, Orientation::Vertical))
                .unwrap();

        let f = bounds_of(&host, front).unwrap();
        let b = bounds_of(&host, back).unwrap();
        assert!(approx(f.width(), 144.0) && approx(f.height(), 216.0));
        assert!(approx(b.top - f.bottom, 36.0));
        assert!(approx(b.center().x, f.center().x));

        let unit_bounds = unit.bounds(&host).unwrap();
        assert!(approx(unit_bounds.height(), 216.0 * 2.0 + 36.0));
        unit.release(&mut host, None).unwrap();
    }

    #[test]
    fn test_size_label_is_stamped() {
        let mut host = MemoryHost::new();
        let (front, back) = pair(&mut host);
        let mut unit =
            build_initial_unit(&mut host, front, back, &request(Mode::B, Orientation::Vertical))
                .unwrap();
        for piece in [front, back] {
            let label = host
                .find_child_by_name(Container::Group(piece), "SIZE")
                .unwrap()
                .unwrap();
            assert_eq!(host.text(label), Some("XL"));
        }
        unit.release(&mut host, None).unwrap();
    }

    #[test]
    fn test_missing_label_fails() {
        let mut host = MemoryHost::new();
        let canvas = host.add_canvas(BoundingBox::new(0.0, 0.0, 1000.0, 1000.0));
        let c = Container::Canvas(canvas.id);
        let front = host
            .add_artwork(c, "FRONT", Dimension::new(1.0, 1.0), Point::new(0.0, 0.0), Some("SIZE"))
            .unwrap();
        let back = host
            .add_artwork(c, "BACK", Dimension::new(1.0, 1.0), Point::new(0.0, 0.0), None)
            .unwrap();

        let err = build_initial_unit(&mut host, front, back, &request(Mode::FB, Orientation::Vertical))
            .unwrap_err();
        assert_eq!(err, LayoutError::size_label_missing("BACK", "SIZE"));
    }

    #[test]
    fn test_horizontal_fb_turns_pieces() {
        let mut host = MemoryHost::new();
        let (front, back) = pair(&mut host);
        let mut unit = build_initial_unit(
            &mut host,
            front,
            back,
            &request(Mode::FB, Orientation::Horizontal),
        )
        .unwrap();

        let f = bounds_of(&host, front).unwrap();
        let b = bounds_of(&host, back).unwrap();
        assert!(approx(f.width(), 216.0) && approx(f.height(), 144.0));
        assert!(approx(b.left - f.right, 36.0));
        assert!(approx(b.center().y, f.center().y));
        unit.release(&mut host, None).unwrap();
    }

    #[test]
    fn test_l_shape_pinwheel() {
        let mut host = MemoryHost::new();
        let (front, back) = pair(&mut host);
        let mut unit =
            build_initial_unit(&mut host, front, back, &request(Mode::FB, Orientation::LShape))
                .unwrap();

        let pieces = unit.members();
        assert_eq!(pieces.len(), 4);
        let names: Vec<String> = pieces.iter().map(|p| host.name(*p).unwrap()).collect();
        assert_eq!(names, vec!["FRONT", "BACK", "FRONT_TURNED", "BACK_TURNED"]);

        // (w + h + gap) on both sides
        let side = 144.0 + 216.0 + 36.0;
        let all = bounds_of_all(&host, &pieces).unwrap();
        assert!(approx(all.width(), side), "width {}", all.width());
        assert!(approx(all.height(), side), "height {}", all.height());

        let boxes: Vec<BoundingBox> =
            pieces.iter().map(|p| bounds_of(&host, *p).unwrap()).collect();
        for i in 0..boxes.len() {
            for j in (i + 1)..boxes.len() {
                assert!(!boxes[i].intersects(&boxes[j]), "{} overlaps {}", names[i], names[j]);
            }
        }
        unit.release(&mut host, None).unwrap();
    }

    #[test]
    fn test_l_shape_requires_fb() {
        let mut host = MemoryHost::new();
        let (front, back) = pair(&mut host);
        let err = build_initial_unit(&mut host, front, back, &request(Mode::B, Orientation::LShape))
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { .. }));
    }

    #[test]
    fn test_find_artwork_reports_missing_piece() {
        let mut host = MemoryHost::new();
        let canvas = host.add_canvas(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        let c = Container::Canvas(canvas.id);
        host.add_path(c, "FRONT", BoundingBox::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let err = find_artwork(&host, c, "FRONT", "BACK").unwrap_err();
        assert_eq!(err, LayoutError::missing_shape("BACK", "canvas 0"));
    }
}
