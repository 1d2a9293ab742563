//! Axis-aligned bounding boxes for local remeshing.

use serde::{Deserialize, Serialize};

/// Relative padding applied to each box face, as a fraction of the box
/// extent along that axis.
pub const RELATIVE_PADDING: f64 = 1.0e-3;
/// Absolute padding added to each box face.
pub const UNIT_MARGIN: f64 = 1.0;

/// Axis-aligned box `[min, max]` in three dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Smallest box containing every position, or `None` for an empty input.
    pub fn around<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f64; 3]>,
    {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for pos in iter {
            for axis in 0..3 {
                bbox.min[axis] = bbox.min[axis].min(pos[axis]);
                bbox.max[axis] = bbox.max[axis].max(pos[axis]);
            }
        }
        Some(bbox)
    }

    /// Grow every face outward by `RELATIVE_PADDING * extent + UNIT_MARGIN`.
    ///
    /// Flat (collinear or coplanar) point sets get a box with non-zero extent
    /// along every axis, which the adjacency primitive needs.
    pub fn inflated(&self) -> Self {
        let extent = self.extent();
        let mut out = *self;
        for axis in 0..3 {
            let pad = RELATIVE_PADDING * extent[axis] + UNIT_MARGIN;
            out.min[axis] -= pad;
            out.max[axis] += pad;
        }
        out
    }

    /// Extent along each axis.
    pub fn extent(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Closed containment test.
    pub fn contains(&self, p: [f64; 3]) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }
}
