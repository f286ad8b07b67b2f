//! Row fitting: units per row, rows, and how rows split over canvases

use tracing::{debug, warn};

use super::error::LayoutError;
use super::planner::items_per_row;
use super::types::{to_points, BoundingBox};

/// Printable limits of one canvas, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLimits {
    pub max_width: f64,
    pub max_height: f64,
    pub gap: f64,
}

impl CanvasLimits {
    /// Limits given in inches
    pub fn from_inches(max_width: f64, max_height: f64, gap: f64) -> Self {
        Self {
            max_width: to_points(max_width),
            max_height: to_points(max_height),
            gap: to_points(gap),
        }
    }
}

/// How a quantity of units fills rows and canvases
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFitResult {
    pub fit_per_row: u32,
    pub rows_needed: u32,
    /// Units in the last, partially filled row (0 when rows are full)
    pub remainder: u32,
    pub canvases_needed: u32,
    pub rows_per_canvas: u32,
    /// The unit should be turned a quarter before tiling
    pub rotate_recommended: bool,
    /// Height of one row in the chosen orientation, in points
    pub row_extent: f64,
    /// Width of a full row in the chosen orientation, in points
    pub row_width: f64,
    /// Height of all rows stacked, in points
    pub total_height: f64,
}

impl RowFitResult {
    /// Rows assigned to canvas `index` when rows are spread evenly.
    ///
    /// Counts differ by at most one between canvases, earlier canvases
    /// taking the extra rows.
    pub fn rows_on_canvas(&self, index: u32) -> u32 {
        if index >= self.canvases_needed {
            return 0;
        }
        let base = self.rows_needed / self.canvases_needed;
        let extra = self.rows_needed % self.canvases_needed;
        base + u32::from(index < extra)
    }

    /// Height needed for `rows` rows, in points
    pub fn height_for_rows(&self, rows: u32, gap: f64) -> f64 {
        stack_height(rows, self.row_extent, gap)
    }
}

/// One orientation's candidate
#[derive(Debug, Clone, Copy)]
struct Candidate {
    fit: u32,
    across: f64,
    rows: u32,
    extent: f64,
    total: f64,
}

fn stack_height(rows: u32, extent: f64, gap: f64) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    rows as f64 * extent + (rows - 1) as f64 * gap
}

fn candidate(quantity: u32, across: f64, extent: f64, limits: &CanvasLimits) -> Candidate {
    let fit = items_per_row(across, limits.gap, limits.max_width);
    let rows = quantity.div_ceil(fit);
    Candidate {
        fit,
        across,
        rows,
        extent,
        total: stack_height(rows, extent, limits.gap),
    }
}

/// Fit `quantity` units of `unit` size onto canvases bounded by `limits`.
///
/// Both the natural and the quarter-turned unit are tried; the turned one
/// wins ties. With one or two units and a tile too wide to sit two to a
/// row in either orientation, each orientation is measured as a single
/// stack of the units.
pub fn plan_row_fit(
    unit: &BoundingBox,
    quantity: u32,
    limits: &CanvasLimits,
) -> Result<RowFitResult, LayoutError> {
    fit_rows(unit, quantity, limits, true)
}

/// Fit `quantity` units of `unit` size without turning them.
///
/// Used when the unit stays as built. `rotate_recommended` is always
/// false and the single-stack rule only looks at the natural fit.
pub fn plan_row_fit_natural(
    unit: &BoundingBox,
    quantity: u32,
    limits: &CanvasLimits,
) -> Result<RowFitResult, LayoutError> {
    fit_rows(unit, quantity, limits, false)
}

fn fit_rows(
    unit: &BoundingBox,
    quantity: u32,
    limits: &CanvasLimits,
    allow_turn: bool,
) -> Result<RowFitResult, LayoutError> {
    if quantity == 0 {
        return Err(LayoutError::invalid_parameter(
            "quantity",
            "at least one unit is required",
        ));
    }
    let (width, height) = (unit.width(), unit.height());
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(LayoutError::capacity(format!(
            "unit size {}x{} is not a positive size",
            width, height
        )));
    }
    if !(limits.max_width.is_finite() && limits.max_width > 0.0)
        || !(limits.max_height.is_finite() && limits.max_height > 0.0)
    {
        return Err(LayoutError::capacity(format!(
            "canvas limits {}x{} leave no room",
            limits.max_width, limits.max_height
        )));
    }
    if !limits.gap.is_finite() || limits.gap < 0.0 {
        return Err(LayoutError::invalid_parameter(
            "gap",
            format!("gap must be a non-negative number, got {}", limits.gap),
        ));
    }

    let mut natural = candidate(quantity, width, height, limits);
    let mut rotated = candidate(quantity, height, width, limits);

    if quantity <= 2 && (natural.fit < 2 || (allow_turn && rotated.fit < 2)) {
        for c in [&mut natural, &mut rotated] {
            c.fit = 1;
            c.rows = quantity;
            c.total = stack_height(quantity, c.extent, limits.gap);
        }
    }

    let rotate_recommended = allow_turn && rotated.total <= natural.total;
    let chosen = if rotate_recommended { rotated } else { natural };
    if chosen.across > limits.max_width {
        warn!(
            width = chosen.across,
            max_width = limits.max_width,
            turned = rotate_recommended,
            "unit is wider than the canvas, rows will overflow"
        );
    }

    let canvases_needed = ((chosen.total / limits.max_height).ceil() as u32).max(1);
    let per_canvas_height = (chosen.total / canvases_needed as f64).ceil();
    let rows_per_canvas = ((per_canvas_height / chosen.extent).ceil() as u32).max(1);

    let result = RowFitResult {
        fit_per_row: chosen.fit,
        rows_needed: chosen.rows,
        remainder: quantity % chosen.fit,
        canvases_needed,
        rows_per_canvas,
        rotate_recommended,
        row_extent: chosen.extent,
        row_width: stack_height(chosen.fit, chosen.across, limits.gap),
        total_height: chosen.total,
    };
    debug!(
        fit = result.fit_per_row,
        rows = result.rows_needed,
        canvases = result.canvases_needed,
        rotate = result.rotate_recommended,
        "row fit planned"
    );
    Ok(result)
}
