//! Orientation heuristics: how many tiles fit per row and which
//! orientation to use
//!
//! These are deliberate approximations that favour the orientation with
//! more tiles per row; they do not search for an optimal packing.

use tracing::debug;

use super::error::LayoutError;
use super::types::{Dimension, Mode, Orientation};

/// Per-orientation fit counts and the recommended orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPlan {
    pub vertical_per_row: u32,
    pub horizontal_per_row: u32,
    pub vertical_rows: u32,
    pub horizontal_rows: u32,
    pub l_shape_feasible: bool,
    /// L units needed, two garments each
    pub l_shape_pairs: u32,
    /// L units that fit side by side in one row
    pub l_shape_per_row: u32,
    pub recommended: Orientation,
}

impl LayoutPlan {
    /// Tiles per row for an orientation
    pub fn per_row(&self, orientation: Orientation) -> u32 {
        match orientation {
            Orientation::Vertical => self.vertical_per_row,
            Orientation::Horizontal => self.horizontal_per_row,
            Orientation::LShape => self.l_shape_per_row,
        }
    }

    /// Rows needed for an orientation
    pub fn rows(&self, orientation: Orientation) -> u32 {
        match orientation {
            Orientation::Vertical => self.vertical_rows,
            Orientation::Horizontal => self.horizontal_rows,
            Orientation::LShape => self.l_shape_pairs.div_ceil(self.l_shape_per_row),
        }
    }
}

/// How many items of `extent` fit in `limit`, each followed by `gap`.
///
/// Never less than one, so a single oversized item still gets a row.
pub fn items_per_row(extent: f64, gap: f64, limit: f64) -> u32 {
    let count = (limit / (extent + gap)).floor();
    if count.is_finite() && count >= 1.0 {
        count as u32
    } else {
        1
    }
}

/// Expected size of one built unit, in inches.
///
/// Matches what the initiator assembles: Horizontal turns each piece a
/// quarter, and an L unit is a square of side `w + h + gap`.
pub fn unit_dimension(piece: Dimension, mode: Mode, orientation: Orientation, gap: f64) -> Dimension {
    match orientation {
        Orientation::Vertical => mode.tile_dimension(piece, gap),
        Orientation::Horizontal => match mode {
            Mode::B => piece.swapped(),
            Mode::FB => Dimension::new(piece.height * 2.0 + gap, piece.width),
            Mode::Pant => Dimension::new(piece.height, piece.width * 2.0 + gap),
        },
        Orientation::LShape => {
            let side = piece.width + piece.height + gap;
            Dimension::new(side, side)
        }
    }
}

/// Plan orientation and row counts for `quantity` garments.
///
/// All sizes are in inches. The tile is the piece adjusted for the mode;
/// Vertical counts along the tile height and Horizontal along the tile
/// width.
pub fn plan_layout(
    dimension: Dimension,
    mode: Mode,
    gap: f64,
    canvas_max_size: f64,
    quantity: u32,
) -> Result<LayoutPlan, LayoutError> {
    if quantity == 0 {
        return Err(LayoutError::invalid_parameter(
            "quantity",
            "at least one garment is required",
        ));
    }
    if !dimension.is_positive() {
        return Err(LayoutError::capacity(format!(
            "piece size {}x{} is not a positive size",
            dimension.width, dimension.height
        )));
    }
    if !canvas_max_size.is_finite() || canvas_max_size <= 0.0 {
        return Err(LayoutError::capacity(format!(
            "canvas size {} leaves no room",
            canvas_max_size
        )));
    }
    if !gap.is_finite() || gap < 0.0 {
        return Err(LayoutError::invalid_parameter(
            "gap",
            format!("gap must be a non-negative number, got {}", gap),
        ));
    }

    let tile = mode.tile_dimension(dimension, gap);
    let vertical_per_row = items_per_row(tile.height, gap, canvas_max_size);
    let horizontal_per_row = items_per_row(tile.width, gap, canvas_max_size);

    let l_side = dimension.width + dimension.height + gap;
    let l_shape_feasible = mode.supports_l_shape()
        && (vertical_per_row < 3 || horizontal_per_row < 3)
        && l_side < canvas_max_size;
    let l_shape_pairs = quantity.div_ceil(2);
    let l_shape_per_row = items_per_row(l_side, gap, canvas_max_size);

    let recommended = if l_shape_feasible && vertical_per_row < 3 && horizontal_per_row < 3 {
        Orientation::LShape
    } else if horizontal_per_row > vertical_per_row {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };

    let plan = LayoutPlan {
        vertical_per_row,
        horizontal_per_row,
        vertical_rows: quantity.div_ceil(vertical_per_row),
        horizontal_rows: quantity.div_ceil(horizontal_per_row),
        l_shape_feasible,
        l_shape_pairs,
        l_shape_per_row,
        recommended,
    };
    debug!(
        %mode,
        vertical = plan.vertical_per_row,
        horizontal = plan.horizontal_per_row,
        l_shape = plan.l_shape_feasible,
        recommended = %plan.recommended,
        "layout planned"
    );
    Ok(plan)
}
