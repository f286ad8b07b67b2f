//! Grid and row packing layout engine
//!
//! Plans how many repeated garment units fit per row and per canvas,
//! builds the first unit from a front/back artwork pair, and tiles copies
//! of it across as many canvases as the quantity needs. All geometry goes
//! through a [`CanvasHost`](crate::host::CanvasHost).

pub mod composite;
pub mod config;
pub mod error;
pub mod initiator;
pub mod kernel;
pub mod placer;
pub mod planner;
pub mod row_fit;
pub mod transform;
pub mod types;

pub use composite::{with_composite, CompositeUnit};
pub use config::LayoutConfig;
pub use error::LayoutError;
pub use initiator::{build_initial_unit, find_artwork, stamp_size_label, InitialUnitRequest};
pub use kernel::{
    align, align_to_rect, bounds_of, bounds_of_all, move_adjacent, resize_to_target,
    rotate_about_center, rotate_group_about_center,
};
pub use placer::{place_grid, CanvasFill, GridPlacer, PlacementRequest};
pub use planner::{plan_layout, unit_dimension, LayoutPlan};
pub use row_fit::{plan_row_fit, plan_row_fit_natural, CanvasLimits, RowFitResult};
pub use types::*;
