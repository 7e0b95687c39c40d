use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::SurfaceError;

/// Rectangular grid of weighted control points `(x, y, z, weight)`.
///
/// Rows run along the surface's `u` direction, columns along `v`.
///
/// Deserializes through [`ControlPointGrid::new`], so a loaded grid is
/// validated the same way as a built one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Vec4>>", into = "Vec<Vec<Vec4>>")]
pub struct ControlPointGrid {
    rows: usize,
    cols: usize,
    /// Row-major.
    points: Vec<Vec4>,
}

impl ControlPointGrid {
    /// Build a grid from rows of weighted points.
    ///
    /// Rows must be non-empty and of equal length; coordinates must be finite
    /// and weights finite and strictly positive.
    pub fn new(rows: Vec<Vec<Vec4>>) -> Result<Self, SurfaceError> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if row_count == 0 || cols == 0 {
            return Err(SurfaceError::InvalidSurfaceParameters(
                "control point grid is empty".into(),
            ));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(SurfaceError::InvalidSurfaceParameters(format!(
                "row {i} has {} control points, expected {cols}",
                row.len()
            )));
        }
        let points: Vec<Vec4> = rows.into_iter().flatten().collect();
        if points.iter().any(|p| !p.is_finite()) {
            return Err(SurfaceError::InvalidSurfaceParameters(
                "control points must be finite".into(),
            ));
        }
        if points.iter().any(|p| p.w <= 0.0) {
            return Err(SurfaceError::InvalidSurfaceParameters(
                "control point weights must be > 0".into(),
            ));
        }
        Ok(Self {
            rows: row_count,
            cols,
            points,
        })
    }

    /// Build from `[x, y, z, w]` rows.
    pub fn from_weighted(rows: &[Vec<[f32; 4]>]) -> Result<Self, SurfaceError> {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|p| Vec4::from_array(*p)).collect())
                .collect(),
        )
    }

    /// Build from `[x, y, z]` rows, every weight 1.
    pub fn from_points(rows: &[Vec<[f32; 3]>]) -> Result<Self, SurfaceError> {
        Self::new(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|p| Vec3::from_array(*p).extend(1.0))
                        .collect()
                })
                .collect(),
        )
    }

    /// Number of control points along `u`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of control points along `v`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Vec4 {
        self.points[row * self.cols + col]
    }

    /// Control point premultiplied by its weight: `(wx, wy, wz, w)`.
    pub(crate) fn homogeneous(&self, row: usize, col: usize) -> Vec4 {
        let p = self.get(row, col);
        (p.truncate() * p.w).extend(p.w)
    }

    pub fn points(&self) -> &[Vec4] {
        &self.points
    }
}

impl TryFrom<Vec<Vec<Vec4>>> for ControlPointGrid {
    type Error = SurfaceError;

    fn try_from(rows: Vec<Vec<Vec4>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<ControlPointGrid> for Vec<Vec<Vec4>> {
    fn from(grid: ControlPointGrid) -> Self {
        grid.points.chunks(grid.cols.max(1)).map(<[Vec4]>::to_vec).collect()
    }
}
