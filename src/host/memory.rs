//! Headless in-memory document implementing [`CanvasHost`].
//!
//! Shapes are stored as a tree of rectangles. Leaves carry their bounding
//! box; groups carry ordered children and an optional clip flag. Rotation
//! and resizing pivot on the top-left corner of the shape's raw bounds,
//! the way many drawing hosts pivot on an origin point rather than the
//! visual center.

use std::collections::HashMap;

use super::{CanvasHandle, CanvasHost, CanvasId, Container, Placement, ShapeId, ShapeKind};
use crate::layout::transform::QuarterTurn;
use crate::layout::{to_points, BoundingBox, Dimension, LayoutError, Point};

/// Horizontal distance between consecutive canvases, in points
const CANVAS_SPACING: f64 = 72.0;

#[derive(Debug, Clone)]
enum Geometry {
    Path { bounds: BoundingBox, clipping: bool },
    Text { bounds: BoundingBox, text: String },
    Group { clipped: bool, children: Vec<ShapeId> },
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Container,
    geometry: Geometry,
    /// Accumulated clockwise rotation, for previews
    rotation: f64,
}

#[derive(Debug, Clone)]
struct CanvasRecord {
    rect: BoundingBox,
    children: Vec<ShapeId>,
}

/// A read-only view of one shape and its subtree
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSnapshot {
    pub id: ShapeId,
    pub name: String,
    pub kind: ShapeKind,
    /// Raw bounds; `None` for an empty group
    pub bounds: Option<BoundingBox>,
    pub rotation: f64,
    pub text: Option<String>,
    pub clipping: bool,
    pub children: Vec<ShapeSnapshot>,
}

impl ShapeSnapshot {
    /// Number of non-group shapes in this subtree
    pub fn leaf_count(&self) -> usize {
        if self.children.is_empty() && !matches!(self.kind, ShapeKind::Group { .. }) {
            1
        } else {
            self.children.iter().map(|c| c.leaf_count()).sum()
        }
    }
}

/// In-memory document of canvases and shapes
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    nodes: HashMap<ShapeId, Node>,
    canvases: Vec<CanvasRecord>,
    next_id: u64,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canvas with an explicit usable rectangle
    pub fn add_canvas(&mut self, rect: BoundingBox) -> CanvasHandle {
        let id = CanvasId(self.canvases.len() as u32);
        self.canvases.push(CanvasRecord {
            rect,
            children: vec![],
        });
        CanvasHandle { id, rect }
    }

    /// Add a plain path shape
    pub fn add_path(
        &mut self,
        container: Container,
        name: &str,
        bounds: BoundingBox,
    ) -> Result<ShapeId, LayoutError> {
        self.insert_node(
            container,
            name,
            Geometry::Path {
                bounds,
                clipping: false,
            },
        )
    }

    /// Add the clipping path of a clipped group
    pub fn add_clipping_path(
        &mut self,
        group: ShapeId,
        bounds: BoundingBox,
    ) -> Result<ShapeId, LayoutError> {
        self.insert_node(
            Container::Group(group),
            "<clip>",
            Geometry::Path {
                bounds,
                clipping: true,
            },
        )
    }

    /// Add a text shape
    pub fn add_text(
        &mut self,
        container: Container,
        name: &str,
        bounds: BoundingBox,
        text: &str,
    ) -> Result<ShapeId, LayoutError> {
        self.insert_node(
            container,
            name,
            Geometry::Text {
                bounds,
                text: text.to_string(),
            },
        )
    }

    /// Add an empty group
    pub fn add_group(
        &mut self,
        container: Container,
        name: &str,
        clipped: bool,
    ) -> Result<ShapeId, LayoutError> {
        self.insert_node(
            container,
            name,
            Geometry::Group {
                clipped,
                children: vec![],
            },
        )
    }

    /// Add one artwork piece: a named group holding a body path and,
    /// optionally, a text placeholder for the size label
    pub fn add_artwork(
        &mut self,
        container: Container,
        name: &str,
        size: Dimension,
        origin: Point,
        label_placeholder: Option<&str>,
    ) -> Result<ShapeId, LayoutError> {
        let body = BoundingBox::from_origin(
            origin.x,
            origin.y,
            to_points(size.width),
            to_points(size.height),
        );
        let group = self.add_group(container, name, false)?;
        self.add_path(Container::Group(group), "body", body)?;
        if let Some(placeholder) = label_placeholder {
            let label_height = body.height() / 10.0;
            let label = BoundingBox::new(
                body.left + body.width() / 4.0,
                body.top,
                body.right - body.width() / 4.0,
                body.top + label_height,
            );
            self.add_text(Container::Group(group), placeholder, label, "")?;
        }
        Ok(group)
    }

    /// All canvases, in creation order
    pub fn canvases(&self) -> Vec<CanvasHandle> {
        self.canvases
            .iter()
            .enumerate()
            .map(|(i, c)| CanvasHandle {
                id: CanvasId(i as u32),
                rect: c.rect,
            })
            .collect()
    }

    /// Current contents of a text shape
    pub fn text(&self, shape: ShapeId) -> Option<&str> {
        match &self.nodes.get(&shape)?.geometry {
            Geometry::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    /// Whether a handle still refers to a live shape
    pub fn contains(&self, shape: ShapeId) -> bool {
        self.nodes.contains_key(&shape)
    }

    /// Total number of live shapes, groups included
    pub fn shape_count(&self) -> usize {
        self.nodes.len()
    }

    /// Snapshot the tree under a container
    pub fn snapshot(&self, container: Container) -> Result<Vec<ShapeSnapshot>, LayoutError> {
        self.children(container)?
            .into_iter()
            .map(|id| self.snapshot_shape(id))
            .collect()
    }

    fn snapshot_shape(&self, id: ShapeId) -> Result<ShapeSnapshot, LayoutError> {
        let node = self.node(id)?;
        let (text, clipping, children) = match &node.geometry {
            Geometry::Path { clipping, .. } => (None, *clipping, vec![]),
            Geometry::Text { text, .. } => (Some(text.clone()), false, vec![]),
            Geometry::Group { children, .. } => (
                None,
                false,
                children
                    .iter()
                    .map(|c| self.snapshot_shape(*c))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };
        Ok(ShapeSnapshot {
            id,
            name: node.name.clone(),
            kind: kind_of(&node.geometry),
            bounds: self.raw_bounds(id),
            rotation: node.rotation,
            text,
            clipping,
            children,
        })
    }

    fn node(&self, id: ShapeId) -> Result<&Node, LayoutError> {
        self.nodes.get(&id).ok_or(LayoutError::UnknownShape(id))
    }

    fn node_mut(&mut self, id: ShapeId) -> Result<&mut Node, LayoutError> {
        self.nodes.get_mut(&id).ok_or(LayoutError::UnknownShape(id))
    }

    fn alloc_id(&mut self) -> ShapeId {
        self.next_id += 1;
        ShapeId(self.next_id)
    }

    fn insert_node(
        &mut self,
        container: Container,
        name: &str,
        geometry: Geometry,
    ) -> Result<ShapeId, LayoutError> {
        // validate the container before allocating
        self.child_list_mut(container)?;
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            Node {
                name: name.to_string(),
                parent: container,
                geometry,
                rotation: 0.0,
            },
        );
        self.child_list_mut(container)?.push(id);
        Ok(id)
    }

    fn child_list(&self, container: Container) -> Result<&Vec<ShapeId>, LayoutError> {
        match container {
            Container::Canvas(id) => self
                .canvases
                .get(id.0 as usize)
                .map(|c| &c.children)
                .ok_or(LayoutError::UnknownCanvas(id.0)),
            Container::Group(id) => match &self.node(id)?.geometry {
                Geometry::Group { children, .. } => Ok(children),
                _ => Err(LayoutError::invalid_parameter(
                    "container",
                    format!("shape {} is not a group", id.0),
                )),
            },
        }
    }

    fn child_list_mut(&mut self, container: Container) -> Result<&mut Vec<ShapeId>, LayoutError> {
        match container {
            Container::Canvas(id) => self
                .canvases
                .get_mut(id.0 as usize)
                .map(|c| &mut c.children)
                .ok_or(LayoutError::UnknownCanvas(id.0)),
            Container::Group(id) => match &mut self.node_mut(id)?.geometry {
                Geometry::Group { children, .. } => Ok(children),
                _ => Err(LayoutError::invalid_parameter(
                    "container",
                    format!("shape {} is not a group", id.0),
                )),
            },
        }
    }

    fn detach(&mut self, shape: ShapeId) -> Result<(), LayoutError> {
        let parent = self.node(shape)?.parent;
        self.child_list_mut(parent)?.retain(|c| *c != shape);
        Ok(())
    }

    fn collect_leaves(&self, id: ShapeId, out: &mut Vec<ShapeId>) -> Result<(), LayoutError> {
        match &self.node(id)?.geometry {
            Geometry::Group { children, .. } => {
                for child in children {
                    self.collect_leaves(*child, out)?;
                }
            }
            _ => out.push(id),
        }
        Ok(())
    }

    fn collect_subtree(&self, id: ShapeId, out: &mut Vec<ShapeId>) -> Result<(), LayoutError> {
        out.push(id);
        if let Geometry::Group { children, .. } = &self.node(id)?.geometry {
            for child in children {
                self.collect_subtree(*child, out)?;
            }
        }
        Ok(())
    }

    /// Union of every leaf, ignoring clipping
    fn raw_bounds(&self, id: ShapeId) -> Option<BoundingBox> {
        let node = self.nodes.get(&id)?;
        match &node.geometry {
            Geometry::Path { bounds, .. } | Geometry::Text { bounds, .. } => Some(*bounds),
            Geometry::Group { children, .. } => children
                .iter()
                .filter_map(|c| self.raw_bounds(*c))
                .reduce(|a, b| a.union(&b)),
        }
    }

    fn map_leaf_bounds(
        &mut self,
        shape: ShapeId,
        rotation: f64,
        f: impl Fn(&BoundingBox) -> BoundingBox,
    ) -> Result<(), LayoutError> {
        let mut leaves = vec![];
        self.collect_leaves(shape, &mut leaves)?;
        for leaf in leaves {
            let node = self.node_mut(leaf)?;
            node.rotation = (node.rotation + rotation).rem_euclid(360.0);
            match &mut node.geometry {
                Geometry::Path { bounds, .. } | Geometry::Text { bounds, .. } => {
                    *bounds = f(bounds);
                }
                Geometry::Group { .. } => {}
            }
        }
        Ok(())
    }

    fn clone_subtree(&mut self, id: ShapeId, parent: Container) -> Result<ShapeId, LayoutError> {
        let source = self.node(id)?.clone();
        let new_id = self.alloc_id();
        let geometry = match source.geometry {
            Geometry::Group { clipped, children } => {
                // insert the group first so children can reference it
                self.nodes.insert(
                    new_id,
                    Node {
                        name: source.name.clone(),
                        parent,
                        geometry: Geometry::Group {
                            clipped,
                            children: vec![],
                        },
                        rotation: source.rotation,
                    },
                );
                let mut copies = Vec::with_capacity(children.len());
                for child in children {
                    copies.push(self.clone_subtree(child, Container::Group(new_id))?);
                }
                Geometry::Group {
                    clipped,
                    children: copies,
                }
            }
            other => other,
        };
        self.nodes.insert(
            new_id,
            Node {
                name: source.name,
                parent,
                geometry,
                rotation: source.rotation,
            },
        );
        Ok(new_id)
    }

    fn is_within(&self, candidate: Container, shape: ShapeId) -> Result<bool, LayoutError> {
        let mut current = candidate;
        loop {
            match current {
                Container::Canvas(_) => return Ok(false),
                Container::Group(id) if id == shape => return Ok(true),
                Container::Group(id) => current = self.node(id)?.parent,
            }
        }
    }
}

fn kind_of(geometry: &Geometry) -> ShapeKind {
    match geometry {
        Geometry::Path { .. } => ShapeKind::Path,
        Geometry::Text { .. } => ShapeKind::Text,
        Geometry::Group { clipped, .. } => ShapeKind::Group { clipped: *clipped },
    }
}

impl CanvasHost for MemoryHost {
    fn create_canvas(&mut self, usable: Dimension) -> Result<CanvasHandle, LayoutError> {
        if !usable.is_positive() {
            return Err(LayoutError::invalid_parameter(
                "usable",
                format!("canvas size {}x{} must be positive", usable.width, usable.height),
            ));
        }
        let left = self
            .canvases
            .last()
            .map(|c| c.rect.right + CANVAS_SPACING)
            .unwrap_or(0.0);
        let rect = BoundingBox::from_origin(
            left,
            0.0,
            to_points(usable.width),
            to_points(usable.height),
        );
        Ok(self.add_canvas(rect))
    }

    fn canvas_rect(&self, canvas: CanvasId) -> Result<BoundingBox, LayoutError> {
        self.canvases
            .get(canvas.0 as usize)
            .map(|c| c.rect)
            .ok_or(LayoutError::UnknownCanvas(canvas.0))
    }

    fn duplicate_shape(&mut self, shape: ShapeId) -> Result<ShapeId, LayoutError> {
        let parent = self.node(shape)?.parent;
        let copy = self.clone_subtree(shape, parent)?;
        let siblings = self.child_list_mut(parent)?;
        let position = siblings
            .iter()
            .position(|c| *c == shape)
            .map(|p| p + 1)
            .unwrap_or(siblings.len());
        siblings.insert(position, copy);
        Ok(copy)
    }

    fn remove_shape(&mut self, shape: ShapeId) -> Result<(), LayoutError> {
        self.detach(shape)?;
        let mut subtree = vec![];
        self.collect_subtree(shape, &mut subtree)?;
        for id in subtree {
            self.nodes.remove(&id);
        }
        Ok(())
    }

    fn translate(&mut self, shape: ShapeId, dx: f64, dy: f64) -> Result<(), LayoutError> {
        self.map_leaf_bounds(shape, 0.0, |b| b.translated(dx, dy))
    }

    fn rotate(&mut self, shape: ShapeId, degrees: f64) -> Result<(), LayoutError> {
        let pivot = self
            .raw_bounds(shape)
            .ok_or_else(|| LayoutError::bounds_unavailable(shape, "nothing to rotate"))?
            .origin();
        let turn = QuarterTurn::from_degrees(degrees)?;
        self.map_leaf_bounds(shape, turn.degrees(), |b| turn.rotate_bounds(b, pivot))
    }

    fn resize(
        &mut self,
        shape: ShapeId,
        scale_x_percent: f64,
        scale_y_percent: f64,
    ) -> Result<(), LayoutError> {
        if !(scale_x_percent > 0.0 && scale_y_percent > 0.0) {
            return Err(LayoutError::invalid_parameter(
                "scale",
                format!(
                    "scale {}% x {}% must be positive",
                    scale_x_percent, scale_y_percent
                ),
            ));
        }
        let pivot = self
            .raw_bounds(shape)
            .ok_or_else(|| LayoutError::bounds_unavailable(shape, "nothing to resize"))?
            .origin();
        let (sx, sy) = (scale_x_percent / 100.0, scale_y_percent / 100.0);
        self.map_leaf_bounds(shape, 0.0, |b| b.scaled_about(pivot, sx, sy))
    }

    fn bounding_box(&self, shape: ShapeId) -> Result<BoundingBox, LayoutError> {
        self.node(shape)?;
        self.raw_bounds(shape)
            .ok_or_else(|| LayoutError::bounds_unavailable(shape, "group has no geometry"))
    }

    fn kind(&self, shape: ShapeId) -> Result<ShapeKind, LayoutError> {
        Ok(kind_of(&self.node(shape)?.geometry))
    }

    fn is_clipping_path(&self, shape: ShapeId) -> Result<bool, LayoutError> {
        Ok(matches!(
            self.node(shape)?.geometry,
            Geometry::Path { clipping: true, .. }
        ))
    }

    fn container_of(&self, shape: ShapeId) -> Result<Container, LayoutError> {
        Ok(self.node(shape)?.parent)
    }

    fn children(&self, container: Container) -> Result<Vec<ShapeId>, LayoutError> {
        self.child_list(container).cloned()
    }

    fn create_group(
        &mut self,
        container: Container,
        anchor: Option<ShapeId>,
    ) -> Result<ShapeId, LayoutError> {
        let group = self.insert_node(
            container,
            "",
            Geometry::Group {
                clipped: false,
                children: vec![],
            },
        )?;
        if anchor.is_some() {
            self.move_into_container(group, container, anchor, Placement::After)?;
        }
        Ok(group)
    }

    fn move_into_container(
        &mut self,
        shape: ShapeId,
        container: Container,
        anchor: Option<ShapeId>,
        placement: Placement,
    ) -> Result<(), LayoutError> {
        self.node(shape)?;
        if self.is_within(container, shape)? {
            return Err(LayoutError::invalid_parameter(
                "container",
                format!("cannot move shape {} into itself", shape.0),
            ));
        }
        if anchor == Some(shape) {
            return Err(LayoutError::invalid_parameter(
                "anchor",
                "a shape cannot be its own anchor",
            ));
        }
        // validate the target before detaching
        self.child_list(container)?;
        self.detach(shape)?;
        let siblings = self.child_list_mut(container)?;
        let index = match (placement, anchor) {
            (Placement::Inside, _) | (Placement::After, None) => siblings.len(),
            (Placement::Before, None) => 0,
            (Placement::Before, Some(a)) | (Placement::After, Some(a)) => {
                let at = siblings.iter().position(|c| *c == a).ok_or_else(|| {
                    LayoutError::invalid_parameter(
                        "anchor",
                        format!("shape {} is not in {}", a.0, container),
                    )
                });
                match at {
                    Ok(p) if placement == Placement::After => p + 1,
                    Ok(p) => p,
                    Err(e) => {
                        // put it back where it can be found before failing
                        siblings.push(shape);
                        self.node_mut(shape)?.parent = container;
                        return Err(e);
                    }
                }
            }
        };
        siblings.insert(index, shape);
        self.node_mut(shape)?.parent = container;
        Ok(())
    }

    fn set_name(&mut self, shape: ShapeId, name: &str) -> Result<(), LayoutError> {
        self.node_mut(shape)?.name = name.to_string();
        Ok(())
    }

    fn name(&self, shape: ShapeId) -> Result<String, LayoutError> {
        Ok(self.node(shape)?.name.clone())
    }

    fn find_child_by_name(
        &self,
        container: Container,
        name: &str,
    ) -> Result<Option<ShapeId>, LayoutError> {
        Ok(self
            .child_list(container)?
            .iter()
            .copied()
            .find(|c| self.nodes.get(c).map(|n| n.name == name).unwrap_or(false)))
    }

    fn set_text(&mut self, shape: ShapeId, text: &str) -> Result<(), LayoutError> {
        match &mut self.node_mut(shape)?.geometry {
            Geometry::Text { text: contents, .. } => {
                *contents = text.to_string();
                Ok(())
            }
            _ => Err(LayoutError::invalid_parameter(
                "shape",
                format!("shape {} is not a text shape", shape.0),
            )),
        }
    }
}
