//! Axis-aligned search boxes for docking.
//!
//! A [`GridBox`] is described by its center and its edge lengths. Boxes computed from
//! atoms are padded on every side by a fixed margin so that ligands placed near the
//! selected atoms still fit inside the search region.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

/// Padding added on each side of the raw atom extent, in Angstroms.
pub const DEFAULT_PADDING: f64 = 5.0;

const AXES: [char; 3] = ['x', 'y', 'z'];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridBoxError {
    #[error("Grid size along {axis} must be positive and finite (got {value})")]
    InvalidSize { axis: char, value: f64 },
    #[error("Grid center along {axis} must be finite (got {value})")]
    InvalidCenter { axis: char, value: f64 },
    #[error("Padding must be finite and non-negative (got {0})")]
    InvalidPadding(f64),
    #[error("Atom coordinate along {axis} is not finite (got {value})")]
    InvalidCoordinate { axis: char, value: f64 },
}

/// Flat key/value form of a [`GridBox`], as persisted in `grid.json` and consumed by
/// the docking engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub center_x: f64,
    pub center_y: f64,
    pub center_z: f64,
    pub size_x: f64,
    pub size_y: f64,
    pub size_z: f64,
}

/// An axis-aligned box with strictly positive, finite edge lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "GridDimensions", try_from = "GridDimensions")]
pub struct GridBox {
    center: Point3<f64>,
    size: Vector3<f64>,
}

impl GridBox {
    /// Creates a box from a center and edge lengths, validating both.
    ///
    /// # Errors
    ///
    /// Returns [`GridBoxError::InvalidCenter`] for non-finite center components and
    /// [`GridBoxError::InvalidSize`] for sizes that are not strictly positive and finite.
    pub fn new(center: Point3<f64>, size: Vector3<f64>) -> Result<Self, GridBoxError> {
        for (i, axis) in AXES.iter().copied().enumerate() {
            if !center[i].is_finite() {
                return Err(GridBoxError::InvalidCenter {
                    axis,
                    value: center[i],
                });
            }
            if !(size[i].is_finite() && size[i] > 0.0) {
                return Err(GridBoxError::InvalidSize {
                    axis,
                    value: size[i],
                });
            }
        }
        Ok(Self { center, size })
    }

    /// Computes the padded bounding box of a point set in a single pass.
    ///
    /// The raw extent `[min, max]` on each axis is widened by `padding` on both sides;
    /// the center is the midpoint of the padded extent and the size is its span.
    ///
    /// # Return
    ///
    /// Returns `Ok(None)` when `points` is empty: an empty selection has no box.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative or non-finite padding, or for non-finite
    /// coordinates.
    pub fn enclosing<'a, I>(points: I, padding: f64) -> Result<Option<Self>, GridBoxError>
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        if !(padding.is_finite() && padding >= 0.0) {
            return Err(GridBoxError::InvalidPadding(padding));
        }

        let mut bounds: Option<(Point3<f64>, Point3<f64>)> = None;
        for point in points {
            for (i, axis) in AXES.iter().copied().enumerate() {
                if !point[i].is_finite() {
                    return Err(GridBoxError::InvalidCoordinate {
                        axis,
                        value: point[i],
                    });
                }
            }
            bounds = Some(match bounds {
                None => (*point, *point),
                Some((min, max)) => (min.inf(point), max.sup(point)),
            });
        }

        let Some((min, max)) = bounds else {
            return Ok(None);
        };
        let pad = Vector3::repeat(padding);
        let lower = min - pad;
        let upper = max + pad;
        let center = nalgebra::center(&lower, &upper);
        let size = upper - lower;

        // A single point with zero padding has no volume.
        Self::new(center, size).map(Some)
    }

    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    pub fn size(&self) -> Vector3<f64> {
        self.size
    }

    pub fn min_corner(&self) -> Point3<f64> {
        self.center - self.size / 2.0
    }

    pub fn max_corner(&self) -> Point3<f64> {
        self.center + self.size / 2.0
    }

    /// Returns `true` if `point` lies inside the box or on its boundary.
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        let (min, max) = (self.min_corner(), self.max_corner());
        (0..3).all(|i| point[i] >= min[i] && point[i] <= max[i])
    }

    pub fn dimensions(&self) -> GridDimensions {
        GridDimensions::from(*self)
    }

    /// Renders the box as `key = value` lines, the format docking engines such as
    /// AutoDock Vina and Uni-Dock accept through `--config`.
    pub fn to_engine_config(&self) -> String {
        let d = self.dimensions();
        let mut out = String::new();
        for (key, value) in [
            ("center_x", d.center_x),
            ("center_y", d.center_y),
            ("center_z", d.center_z),
            ("size_x", d.size_x),
            ("size_y", d.size_y),
            ("size_z", d.size_z),
        ] {
            let _ = writeln!(out, "{key} = {value}");
        }
        out
    }
}

impl From<GridBox> for GridDimensions {
    fn from(grid: GridBox) -> Self {
        Self {
            center_x: grid.center.x,
            center_y: grid.center.y,
            center_z: grid.center.z,
            size_x: grid.size.x,
            size_y: grid.size.y,
            size_z: grid.size.z,
        }
    }
}

impl TryFrom<GridDimensions> for GridBox {
    type Error = GridBoxError;

    fn try_from(d: GridDimensions) -> Result<Self, Self::Error> {
        GridBox::new(
            Point3::new(d.center_x, d.center_y, d.center_z),
            Vector3::new(d.size_x, d.size_y, d.size_z),
        )
    }
}
