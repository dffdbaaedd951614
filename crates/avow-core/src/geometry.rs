//! Geometric primitives for avow placement and adjacency.
//!
//! This module provides the geometric types used to position avows in the
//! editing plane and to decide which avows touch each other.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Avow diagrams use a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward (positive to the right)
//! - **Y-axis**: Increases downward (positive downward)
//!
//! An avow's "top" neighbor therefore has a smaller `y` than the avow itself.

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use avow_core::geometry::Point;
/// let p = Point::new(10.0, 20.0);
///
/// assert_eq!(p.x(), 10.0);
/// assert_eq!(p.y(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }
}

/// Represents the dimensions of an avow with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a copy with a different width
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Returns a copy with a different height
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Returns true if both dimensions are strictly positive and finite
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Moves the bounds so that its top-left corner sits at `top_left`,
    /// keeping its size.
    pub fn with_top_left(self, top_left: Point) -> Self {
        Self::new_from_top_left(top_left, self.to_size())
    }

    /// Resizes the bounds around its top-left corner.
    pub fn with_size(self, size: Size) -> Self {
        Self::new_from_top_left(self.min_point(), size)
    }

    /// Length of the shared span of both bounds along the x-axis.
    ///
    /// Negative when the bounds are horizontally apart.
    ///
    /// # Examples
    ///
    /// ```
    /// # use avow_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(4.0, 1.0));
    /// let b = Bounds::new_from_top_left(Point::new(3.0, 1.0), Size::new(4.0, 1.0));
    /// assert_eq!(a.horizontal_overlap(&b), 1.0);
    /// ```
    pub fn horizontal_overlap(&self, other: &Self) -> f32 {
        self.max_x.min(other.max_x) - self.min_x.max(other.min_x)
    }

    /// Length of the shared span of both bounds along the y-axis.
    ///
    /// Negative when the bounds are vertically apart.
    pub fn vertical_overlap(&self, other: &Self) -> f32 {
        self.max_y.min(other.max_y) - self.min_y.max(other.min_y)
    }

    /// Returns true when the interiors of both bounds share an area whose
    /// extent exceeds `margin` on both axes.
    ///
    /// Bounds that merely touch along an edge never overlap.
    pub fn overlaps(&self, other: &Self, margin: f32) -> bool {
        self.horizontal_overlap(other) > margin && self.vertical_overlap(other) > margin
    }
}
