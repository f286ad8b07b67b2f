//! Grid placement across one or more canvases
//!
//! [`GridPlacer`] duplicates the template unit row by row until the
//! requested quantity is placed, opening a new canvas whenever the
//! current one has used its row budget. Each call to `next` fills and
//! finalizes exactly one canvas.
//!
//! ## Sequence Numbers
//!
//! Every placed unit is named with its sequence number, starting at 1.
//! An L unit carries two garments and advances the number by two. When
//! an L layout is asked for an odd quantity, the last unit loses its
//! turned pair.

use std::iter::FusedIterator;

use tracing::{debug, info, warn};

use crate::host::{CanvasHandle, CanvasHost, Container, Placement, ShapeId};

use super::composite::{with_composite, CompositeUnit};
use super::error::LayoutError;
use super::initiator::TURNED_SUFFIX;
use super::kernel::{align, align_to_rect, move_adjacent};
use super::row_fit::RowFitResult;
use super::types::{to_inches, to_points, Dimension, Orientation, Position, Side};

/// Parameters of one placement run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    pub orientation: Orientation,
    /// Garments to produce
    pub quantity: u32,
    /// Space between units, in inches
    pub gap: f64,
    /// Width of every canvas opened by the placer, in inches
    pub canvas_max_width: f64,
}

/// What ended up on one canvas
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasFill {
    pub canvas: CanvasHandle,
    /// Units placed on this canvas
    pub units: u32,
    /// Placed shapes, after their units were dissolved
    pub shapes: Vec<ShapeId>,
    /// First garment index on this canvas
    pub first_index: u32,
    /// Last garment index on this canvas
    pub last_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Filling,
    Done,
    Failed,
}

/// Lazily fills canvases, one per iteration step
pub struct GridPlacer<'h, H: CanvasHost + ?Sized> {
    host: &'h mut H,
    template: Option<CompositeUnit>,
    row_fit: RowFitResult,
    request: PlacementRequest,
    working_quantity: u32,
    step: u32,
    next_index: u32,
    canvases_filled: u32,
    /// Copy of a previous canvas's first unit, waiting for a new canvas
    carry: Option<ShapeId>,
    state: State,
}

/// Start placing copies of `template` according to `row_fit`
pub fn place_grid<H: CanvasHost + ?Sized>(
    host: &mut H,
    template: CompositeUnit,
    row_fit: RowFitResult,
    request: PlacementRequest,
) -> GridPlacer<'_, H> {
    let step = request.orientation.index_step();
    let working_quantity = if step == 2 {
        request.quantity.div_ceil(2) * 2
    } else {
        request.quantity
    };
    GridPlacer {
        host,
        template: Some(template),
        row_fit,
        request,
        working_quantity,
        step,
        next_index: 1,
        canvases_filled: 0,
        carry: None,
        state: State::Filling,
    }
}

impl<H: CanvasHost + ?Sized> GridPlacer<'_, H> {
    /// Quantity actually planned for, after rounding L layouts up to pairs
    pub fn working_quantity(&self) -> u32 {
        self.working_quantity
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let r = &self.request;
        if r.quantity == 0 {
            return Err(LayoutError::invalid_parameter(
                "quantity",
                "at least one garment is required",
            ));
        }
        if !r.gap.is_finite() || r.gap < 0.0 {
            return Err(LayoutError::invalid_parameter(
                "gap",
                format!("gap must be a non-negative number, got {}", r.gap),
            ));
        }
        if !r.canvas_max_width.is_finite() || r.canvas_max_width <= 0.0 {
            return Err(LayoutError::capacity(format!(
                "canvas width {} leaves no room",
                r.canvas_max_width
            )));
        }
        Ok(())
    }

    /// Rows the canvas at `index` may hold
    fn row_budget(&self, index: u32) -> u32 {
        let balanced = self.row_fit.rows_on_canvas(index);
        if balanced > 0 {
            balanced
        } else {
            self.row_fit.rows_per_canvas.max(1)
        }
    }

    /// Canvas for the next fill, with its first unit anchored top-left
    fn open_canvas(&mut self) -> Result<(CanvasHandle, ShapeId), LayoutError> {
        let (canvas, first) = match (self.canvases_filled, self.carry.take()) {
            (0, _) => {
                let template = self
                    .template
                    .as_ref()
                    .map(|t| t.shape())
                    .ok_or_else(|| LayoutError::invalid_parameter("template", "already released"))?;
                let id = match self.host.container_of(template)? {
                    Container::Canvas(id) => id,
                    other => {
                        return Err(LayoutError::invalid_parameter(
                            "template",
                            format!("template must sit directly on a canvas, found in {}", other),
                        ))
                    }
                };
                let rect = self.host.canvas_rect(id)?;
                (CanvasHandle { id, rect }, template)
            }
            (_, Some(carry)) => {
                let rows = self.row_budget(self.canvases_filled);
                let height = self
                    .row_fit
                    .height_for_rows(rows, to_points(self.request.gap));
                let size = Dimension::new(self.request.canvas_max_width, to_inches(height));
                let canvas = self.host.create_canvas(size)?;
                self.host.move_into_container(
                    carry,
                    Container::Canvas(canvas.id),
                    None,
                    Placement::Inside,
                )?;
                (canvas, carry)
            }
            (_, None) => {
                return Err(LayoutError::invalid_parameter(
                    "placer",
                    "no unit left to start a new canvas",
                ))
            }
        };
        align_to_rect(self.host, first, &canvas.rect, Position::Left)?;
        align_to_rect(self.host, first, &canvas.rect, Position::Top)?;
        Ok((canvas, first))
    }

    fn fill_canvas(&mut self) -> Result<CanvasFill, LayoutError> {
        if self.canvases_filled == 0 {
            self.validate()?;
        }
        let (canvas, first) = self.open_canvas()?;
        let gap = to_points(self.request.gap);
        let fit = self.row_fit.fit_per_row.max(1);
        let budget = self.row_budget(self.canvases_filled);

        let mut index = self.next_index;
        self.host.set_name(first, &index.to_string())?;
        let mut placed = vec![(first, index)];
        let mut row_first = first;
        let mut previous = first;
        let mut in_row = 1;
        let mut rows_used = 1;
        index += self.step;

        while index <= self.working_quantity {
            let unit = if in_row < fit {
                let unit = self.host.duplicate_shape(previous)?;
                move_adjacent(self.host, previous, unit, Side::Right, gap)?;
                align(self.host, previous, unit, Position::Top)?;
                in_row += 1;
                unit
            } else if rows_used < budget {
                let unit = self.host.duplicate_shape(row_first)?;
                // keep sibling order in garment order
                let container = self.host.container_of(previous)?;
                self.host
                    .move_into_container(unit, container, Some(previous), Placement::After)?;
                move_adjacent(self.host, row_first, unit, Side::Bottom, gap)?;
                align(self.host, row_first, unit, Position::Left)?;
                row_first = unit;
                rows_used += 1;
                in_row = 1;
                unit
            } else {
                break;
            };
            self.host.set_name(unit, &index.to_string())?;
            placed.push((unit, index));
            previous = unit;
            index += self.step;
        }
        self.next_index = index;

        let more = index <= self.working_quantity;
        if more {
            self.carry = Some(self.host.duplicate_shape(first)?);
            debug!(canvas = canvas.id.0, next = index, "canvas full, carrying unit over");
        } else if self.working_quantity != self.request.quantity {
            self.trim_turned_pair(previous)?;
        }

        let fill = self.finalize(canvas, &placed)?;
        self.canvases_filled += 1;
        if !more {
            self.state = State::Done;
        }
        Ok(fill)
    }

    /// Drop the turned pieces of the last L unit
    fn trim_turned_pair(&mut self, unit: ShapeId) -> Result<(), LayoutError> {
        for child in self.host.children(Container::Group(unit))? {
            if self.host.name(child)?.ends_with(TURNED_SUFFIX) {
                self.host.remove_shape(child)?;
            }
        }
        Ok(())
    }

    /// Center the units on the canvas, then dissolve them into named pieces
    fn finalize(
        &mut self,
        canvas: CanvasHandle,
        placed: &[(ShapeId, u32)],
    ) -> Result<CanvasFill, LayoutError> {
        let units: Vec<ShapeId> = placed.iter().map(|(u, _)| *u).collect();
        with_composite(self.host, &units, units.first().copied(), |host, group| {
            align_to_rect(host, group.shape(), &canvas.rect, Position::Center)
        })?;

        let mut shapes = Vec::new();
        let mut last_index = 0;
        for (unit, index) in placed {
            for member in self.host.children(Container::Group(*unit))? {
                let name = self.host.name(member)?;
                let garment = match name.strip_suffix(TURNED_SUFFIX) {
                    Some(base) => format!("{}-{}", index + 1, base),
                    None => format!("{}-{}", index, name),
                };
                self.host.set_name(member, &garment)?;
                shapes.push(member);
            }

            let is_template = self.template.as_ref().map(|t| t.shape()) == Some(*unit);
            match self.template.take() {
                Some(mut template) if is_template => template.release(self.host, None)?,
                other => {
                    self.template = other;
                    CompositeUnit::adopt(self.host, *unit)?.release(self.host, None)?;
                }
            }
            last_index = (index + self.step - 1).min(self.request.quantity);
        }

        let first_index = placed.first().map(|(_, i)| *i).unwrap_or(0);
        info!(
            canvas = canvas.id.0,
            units = placed.len(),
            first = first_index,
            last = last_index,
            "canvas filled"
        );
        Ok(CanvasFill {
            canvas,
            units: placed.len() as u32,
            shapes,
            first_index,
            last_index,
        })
    }

    fn fail(&mut self) {
        self.state = State::Failed;
        if let Some(mut template) = self.template.take() {
            if let Err(e) = template.release(self.host, None) {
                warn!(error = %e, "failed to release template unit after placement error");
            }
        }
    }
}

impl<H: CanvasHost + ?Sized> Iterator for GridPlacer<'_, H> {
    type Item = Result<CanvasFill, LayoutError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != State::Filling {
            return None;
        }
        match self.fill_canvas() {
            Ok(fill) => Some(Ok(fill)),
            Err(e) => {
                self.fail();
                Some(Err(e))
            }
        }
    }
}

impl<H: CanvasHost + ?Sized> FusedIterator for GridPlacer<'_, H> {}
