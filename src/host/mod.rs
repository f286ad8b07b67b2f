//! Capability interface to the document that stores and renders shapes
//!
//! The layout engine never touches a concrete document model. Everything
//! it needs from the host goes through [`CanvasHost`], so a real design
//! tool, a test mock, or the headless [`MemoryHost`] can drive the same
//! code.

pub mod memory;

pub use memory::{MemoryHost, ShapeSnapshot};

use std::fmt;

use crate::layout::{BoundingBox, Dimension, LayoutError};

/// Opaque handle to a placeable shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

/// Opaque handle to a canvas (artboard)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanvasId(pub u32);

/// Something that owns an ordered list of shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Canvas(CanvasId),
    Group(ShapeId),
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Canvas(id) => write!(f, "canvas {}", id.0),
            Container::Group(id) => write!(f, "group {}", id.0),
        }
    }
}

/// Where to put a shape relative to an anchor sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
    /// Append at the end of the container; the anchor is ignored
    Inside,
}

/// What kind of geometry a shape holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Path,
    Text,
    Group { clipped: bool },
}

/// A canvas as seen by the engine: its handle plus usable rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasHandle {
    pub id: CanvasId,
    pub rect: BoundingBox,
}

/// Operations the layout engine requires from a document host.
///
/// All calls are blocking and complete before returning. Only one canvas
/// is filled at a time, so implementations need not be reentrant.
pub trait CanvasHost {
    /// Create a canvas with the given usable size (inches)
    fn create_canvas(&mut self, usable: Dimension) -> Result<CanvasHandle, LayoutError>;

    /// Usable rectangle of an existing canvas
    fn canvas_rect(&self, canvas: CanvasId) -> Result<BoundingBox, LayoutError>;

    /// Independent deep copy, placed right after the source in its container
    fn duplicate_shape(&mut self, shape: ShapeId) -> Result<ShapeId, LayoutError>;

    /// Delete a shape and everything it contains
    fn remove_shape(&mut self, shape: ShapeId) -> Result<(), LayoutError>;

    fn translate(&mut self, shape: ShapeId, dx: f64, dy: f64) -> Result<(), LayoutError>;

    /// Rotate clockwise by `degrees` around a host-defined pivot
    fn rotate(&mut self, shape: ShapeId, degrees: f64) -> Result<(), LayoutError>;

    /// Scale by percentages around a host-defined pivot
    fn resize(
        &mut self,
        shape: ShapeId,
        scale_x_percent: f64,
        scale_y_percent: f64,
    ) -> Result<(), LayoutError>;

    /// Geometric bounds of a shape, in points
    fn bounding_box(&self, shape: ShapeId) -> Result<BoundingBox, LayoutError>;

    fn kind(&self, shape: ShapeId) -> Result<ShapeKind, LayoutError>;

    /// Whether a shape is the clipping path of its parent group
    fn is_clipping_path(&self, shape: ShapeId) -> Result<bool, LayoutError>;

    fn container_of(&self, shape: ShapeId) -> Result<Container, LayoutError>;

    /// Children of a container, in order
    fn children(&self, container: Container) -> Result<Vec<ShapeId>, LayoutError>;

    /// Create an empty group, after `anchor` when given, else appended
    fn create_group(
        &mut self,
        container: Container,
        anchor: Option<ShapeId>,
    ) -> Result<ShapeId, LayoutError>;

    /// Move a shape into `container`, positioned relative to `anchor`
    fn move_into_container(
        &mut self,
        shape: ShapeId,
        container: Container,
        anchor: Option<ShapeId>,
        placement: Placement,
    ) -> Result<(), LayoutError>;

    fn set_name(&mut self, shape: ShapeId, name: &str) -> Result<(), LayoutError>;

    fn name(&self, shape: ShapeId) -> Result<String, LayoutError>;

    /// First direct child with the given name
    fn find_child_by_name(
        &self,
        container: Container,
        name: &str,
    ) -> Result<Option<ShapeId>, LayoutError>;

    /// Replace the contents of a text shape
    fn set_text(&mut self, shape: ShapeId, text: &str) -> Result<(), LayoutError>;
}
