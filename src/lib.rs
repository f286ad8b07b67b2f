//! gangsheet - Grid and row packing of garment artwork onto print canvases
//!
//! This library plans how many front/back artwork units fit per row and
//! per canvas, builds the first unit, and tiles copies of it across as
//! many canvases as the quantity needs. Geometry is delegated to a
//! [`CanvasHost`]; [`MemoryHost`] is a headless implementation.
//!
//! # Example
//!
//! ```rust
//! use gangsheet::{run, stage_artwork, Job, MemoryHost, RunConfig};
//!
//! let job = Job::from_str(r#"
//!     [job]
//!     quantity = 4
//!     mode = "FB"
//!     size_label = "M"
//!     width = 10.0
//!     height = 12.0
//! "#).unwrap();
//!
//! let mut host = MemoryHost::new();
//! let canvas = stage_artwork(&mut host, &job).unwrap();
//! let summary = run(&mut host, &job, &RunConfig::new().with_artwork_canvas(canvas.id)).unwrap();
//! assert_eq!(summary.garments_placed(), 4);
//! ```

pub mod host;
pub mod job;
pub mod layout;
pub mod renderer;

pub use host::{CanvasHandle, CanvasHost, CanvasId, Container, MemoryHost, ShapeId};
pub use job::{Job, JobError, OrientationChoice};
pub use layout::{
    CanvasFill, Dimension, LayoutConfig, LayoutError, LayoutPlan, Mode, Orientation, RowFitResult,
};
pub use renderer::{render_preview, SvgConfig};

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use layout::{
    build_initial_unit, find_artwork, place_grid, plan_layout, plan_row_fit, plan_row_fit_natural,
    rotate_about_center, unit_dimension, BoundingBox, CompositeUnit, InitialUnitRequest, PlacementRequest, Point,
};

/// Errors that can occur during a placement run
#[derive(Debug, Error)]
pub enum RunError {
    /// Error loading the job
    #[error("job error: {0}")]
    Job(#[from] JobError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Configuration for a placement run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Canvas holding the front and back artwork
    pub artwork_canvas: CanvasId,
    /// Stop after planning, without touching the document
    pub plan_only: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            artwork_canvas: CanvasId(0),
            plan_only: false,
        }
    }
}

impl RunConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas the artwork is looked up on
    pub fn with_artwork_canvas(mut self, canvas: CanvasId) -> Self {
        self.artwork_canvas = canvas;
        self
    }

    /// Enable or disable plan-only mode
    pub fn with_plan_only(mut self, plan_only: bool) -> Self {
        self.plan_only = plan_only;
        self
    }
}

/// Outcome of a placement run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub quantity: u32,
    pub mode: Mode,
    pub plan: LayoutPlan,
    pub orientation: Orientation,
    pub row_fit: RowFitResult,
    /// The unit is turned a quarter to stack shorter
    pub rotated: bool,
    /// Filled canvases, empty in plan-only runs
    pub canvases: Vec<CanvasFill>,
}

impl RunSummary {
    /// Garments that ended up on canvases
    pub fn garments_placed(&self) -> u32 {
        self.canvases
            .iter()
            .map(|c| c.last_index + 1 - c.first_index)
            .sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "plan: {} x {} {}, vertical {}/row, horizontal {}/row, l-shape {}",
            self.quantity,
            self.mode,
            self.plan.recommended,
            self.plan.vertical_per_row,
            self.plan.horizontal_per_row,
            if self.plan.l_shape_feasible {
                "feasible"
            } else {
                "not feasible"
            }
        )?;
        writeln!(
            f,
            "layout: {}{}, {} per row, {} rows over {} canvas(es)",
            self.orientation,
            if self.rotated { " (turned)" } else { "" },
            self.row_fit.fit_per_row,
            self.row_fit.rows_needed,
            self.row_fit.canvases_needed
        )?;
        for fill in &self.canvases {
            writeln!(
                f,
                "canvas {}: garments {}-{} in {} units",
                fill.canvas.id.0, fill.first_index, fill.last_index, fill.units
            )?;
        }
        Ok(())
    }
}

/// Put a job's artwork on a fresh canvas of a headless document.
///
/// The canvas is as large as the job allows; front and back sit side by
/// side at its top-left, each with a size label placeholder.
pub fn stage_artwork(host: &mut MemoryHost, job: &Job) -> Result<CanvasHandle, LayoutError> {
    let config = &job.layout;
    let canvas = host.create_canvas(Dimension::new(
        config.canvas_max_width,
        config.canvas_max_height,
    ))?;
    let container = Container::Canvas(canvas.id);
    let origin = canvas.rect.origin();
    host.add_artwork(
        container,
        &config.front_name,
        job.artwork.front,
        origin,
        Some(&config.label_placeholder),
    )?;
    let front_width = layout::to_points(job.artwork.front.width);
    host.add_artwork(
        container,
        &config.back_name,
        job.artwork.back,
        Point::new(origin.x + front_width + layout::to_points(config.gap), origin.y),
        Some(&config.label_placeholder),
    )?;
    Ok(canvas)
}

/// Plan and place a job's garments in `host`.
///
/// The front and back artwork are looked up by name on the configured
/// canvas, which also becomes the first canvas filled.
pub fn run<H: CanvasHost + ?Sized>(
    host: &mut H,
    job: &Job,
    config: &RunConfig,
) -> Result<RunSummary, RunError> {
    let layout = &job.layout;
    let plan = plan_layout(
        job.dimension,
        job.mode,
        layout.gap,
        layout.canvas_max_width,
        job.quantity,
    )?;
    let orientation = match job.orientation {
        OrientationChoice::Auto => plan.recommended,
        OrientationChoice::Fixed(o) => o,
    };
    let units = job.quantity.div_ceil(orientation.index_step());

    if config.plan_only {
        let unit = unit_dimension(job.dimension, job.mode, orientation, layout.gap);
        let (row_fit, rotated) = orient_row_fit(&BoundingBox::from_dimension(unit), units, layout)?;
        return Ok(RunSummary {
            quantity: job.quantity,
            mode: job.mode,
            plan,
            orientation,
            row_fit,
            rotated,
            canvases: vec![],
        });
    }

    let (front, back) = find_artwork(
        host,
        Container::Canvas(config.artwork_canvas),
        &layout.front_name,
        &layout.back_name,
    )?;
    let request = InitialUnitRequest {
        mode: job.mode,
        orientation,
        dimension: job.dimension,
        gap: layout.gap,
        size_label: job.size_label.clone(),
        label_placeholder: layout.label_placeholder.clone(),
    };
    let mut unit = build_initial_unit(host, front, back, &request)?;

    let prepared = fit_unit(host, &unit, units, layout);
    let (row_fit, rotated) = match prepared {
        Ok(ready) => ready,
        Err(e) => {
            release_after_failure(host, &mut unit);
            return Err(e.into());
        }
    };

    let placement = PlacementRequest {
        orientation,
        quantity: job.quantity,
        gap: layout.gap,
        canvas_max_width: layout.canvas_max_width,
    };
    let canvases = place_grid(host, unit, row_fit, placement).collect::<Result<Vec<_>, _>>()?;

    let summary = RunSummary {
        quantity: job.quantity,
        mode: job.mode,
        plan,
        orientation,
        row_fit,
        rotated,
        canvases,
    };
    info!(
        garments = summary.garments_placed(),
        canvases = summary.canvases.len(),
        "placement complete"
    );
    Ok(summary)
}

/// Row fit for a unit of `bounds`, and whether the unit gets turned.
///
/// The turn is taken only when allowed and the unit is not square; when
/// it is skipped the rows are planned for the upright unit.
fn orient_row_fit(
    bounds: &BoundingBox,
    units: u32,
    layout: &LayoutConfig,
) -> Result<(RowFitResult, bool), LayoutError> {
    let limits = layout.limits();
    let row_fit = plan_row_fit(bounds, units, &limits)?;
    if !row_fit.rotate_recommended {
        return Ok((row_fit, false));
    }
    if layout.rotate_to_fit && (bounds.width() - bounds.height()).abs() > f64::EPSILON {
        return Ok((row_fit, true));
    }
    Ok((plan_row_fit_natural(bounds, units, &limits)?, false))
}

/// Row fit for the built unit, turning it when that stacks shorter
fn fit_unit<H: CanvasHost + ?Sized>(
    host: &mut H,
    unit: &CompositeUnit,
    units: u32,
    layout: &LayoutConfig,
) -> Result<(RowFitResult, bool), LayoutError> {
    let bounds = unit.bounds(host)?;
    let (row_fit, turn) = orient_row_fit(&bounds, units, layout)?;
    if turn {
        rotate_about_center(host, unit.shape(), 90.0)?;
    }
    Ok((row_fit, turn))
}

fn release_after_failure<H: CanvasHost + ?Sized>(host: &mut H, unit: &mut CompositeUnit) {
    if let Err(e) = unit.release(host, None) {
        warn!(error = %e, "failed to release initial unit");
    }
}
