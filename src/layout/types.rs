//! Core types for the layout engine
//!
//! Physical sizes ([`Dimension`]) are in inches; geometry reported by the
//! host ([`BoundingBox`], [`Point`]) is in points. The y axis grows
//! downward, so `top < bottom` and "above" means a smaller y.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::error::LayoutError;

/// Points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert inches to points
pub fn to_points(inches: f64) -> f64 {
    inches * POINTS_PER_INCH
}

/// Convert points to inches
pub fn to_inches(points: f64) -> f64 {
    points / POINTS_PER_INCH
}

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Physical size of an artwork piece or canvas, in inches
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

impl Dimension {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides finite and strictly positive
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width and height exchanged
    pub fn swapped(&self) -> Self {
        Self::new(self.height, self.width)
    }
}

/// Axis-aligned extent of a shape, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box with its top-left corner at `(x, y)`
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Box at the origin sized from a physical dimension
    pub fn from_dimension(dimension: Dimension) -> Self {
        Self::from_origin(
            0.0,
            0.0,
            to_points(dimension.width),
            to_points(dimension.height),
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: (self.left + self.right) / 2.0,
            y: (self.top + self.bottom) / 2.0,
        }
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Physical size in inches
    pub fn dimension(&self) -> Dimension {
        Dimension::new(to_inches(self.width()), to_inches(self.height()))
    }

    /// Check if this bounding box intersects another (touching edges do not count)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Smallest box containing both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Copy moved by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Copy scaled about `pivot`
    pub fn scaled_about(&self, pivot: Point, sx: f64, sy: f64) -> BoundingBox {
        let a = Point::new(
            pivot.x + (self.left - pivot.x) * sx,
            pivot.y + (self.top - pivot.y) * sy,
        );
        let b = Point::new(
            pivot.x + (self.right - pivot.x) * sx,
            pivot.y + (self.bottom - pivot.y) * sy,
        );
        BoundingBox::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }
}

/// How a repeatable unit is oriented and tiled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Pieces upright
    Vertical,
    /// Pieces turned a quarter
    Horizontal,
    /// Interlocking four-piece pinwheel
    LShape,
}

impl Orientation {
    /// Sequence numbers consumed by one placed unit
    pub fn index_step(&self) -> u32 {
        match self {
            Orientation::LShape => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Vertical => write!(f, "vertical"),
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::LShape => write!(f, "l_shape"),
        }
    }
}

impl FromStr for Orientation {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "vertical" | "v" => Ok(Orientation::Vertical),
            "horizontal" | "h" => Ok(Orientation::Horizontal),
            "l_shape" | "lshape" | "l" => Ok(Orientation::LShape),
            _ => Err(LayoutError::invalid_parameter(
                "orientation",
                format!("unknown orientation '{}'", s),
            )),
        }
    }
}

/// What a single tile carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Single side
    B,
    /// Front and back stacked
    FB,
    /// Non-body accessory, pieces side by side
    Pant,
}

impl Mode {
    /// Size of one tile before orientation is applied
    pub fn tile_dimension(&self, piece: Dimension, gap: f64) -> Dimension {
        match self {
            Mode::B => piece,
            Mode::FB => Dimension::new(piece.width, piece.height * 2.0 + gap),
            Mode::Pant => Dimension::new(piece.width * 2.0 + gap, piece.height),
        }
    }

    /// Whether the interlocking pinwheel can be built in this mode
    pub fn supports_l_shape(&self) -> bool {
        matches!(self, Mode::FB)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::B => write!(f, "B"),
            Mode::FB => write!(f, "FB"),
            Mode::Pant => write!(f, "PANT"),
        }
    }
}

impl FromStr for Mode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "B" => Ok(Mode::B),
            "FB" => Ok(Mode::FB),
            "PANT" => Ok(Mode::Pant),
            _ => Err(LayoutError::invalid_parameter(
                "mode",
                format!("unknown mode '{}' (expected B, FB or PANT)", s),
            )),
        }
    }
}

/// Edge or center to align two items on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Left,
    Right,
    Top,
    Bottom,
    LeftCenter,
    RightCenter,
    TopCenter,
    BottomCenter,
    Center,
    CenterX,
    CenterY,
}

impl Position {
    const TOKENS: [&'static str; 11] = [
        "left",
        "right",
        "top",
        "bottom",
        "left_center",
        "right_center",
        "top_center",
        "bottom_center",
        "center",
        "center_x",
        "center_y",
    ];
}

impl FromStr for Position {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "left" => Ok(Position::Left),
            "right" => Ok(Position::Right),
            "top" => Ok(Position::Top),
            "bottom" => Ok(Position::Bottom),
            "left_center" => Ok(Position::LeftCenter),
            "right_center" => Ok(Position::RightCenter),
            "top_center" => Ok(Position::TopCenter),
            "bottom_center" => Ok(Position::BottomCenter),
            "center" => Ok(Position::Center),
            "center_x" => Ok(Position::CenterX),
            "center_y" => Ok(Position::CenterY),
            _ => Err(LayoutError::invalid_position(s, &Position::TOKENS)),
        }
    }
}

/// Side of a base item to place another item against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl FromStr for Side {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            _ => Err(LayoutError::invalid_position(
                s,
                &["left", "right", "top", "bottom"],
            )),
        }
    }
}
