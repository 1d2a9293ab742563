//! Per-level point presence.

use crate::mesh_error::MeshError;

/// Presence flags for one level with a cached count of present points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelMask {
    present: Vec<bool>,
    count: usize,
}

impl LevelMask {
    /// Every point present (level 0).
    pub fn full(num_points: usize) -> Self {
        Self {
            present: vec![true; num_points],
            count: num_points,
        }
    }

    /// Number of points the mask spans.
    #[inline]
    pub fn len(&self) -> usize {
        self.present.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    /// Number of present points.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Presence of an in-range id. Out-of-range ids are reported absent.
    #[inline]
    pub fn contains(&self, p: usize) -> bool {
        self.present.get(p).copied().unwrap_or(false)
    }

    /// Presence lookup that rejects out-of-range ids.
    pub fn try_contains(&self, p: usize) -> Result<bool, MeshError> {
        self.present
            .get(p)
            .copied()
            .ok_or(MeshError::PointOutOfRange {
                point: p,
                len: self.present.len(),
            })
    }

    /// Mark `p` absent. Returns `true` if it was present.
    pub fn remove(&mut self, p: usize) -> Result<bool, MeshError> {
        let was = self.try_contains(p)?;
        if was {
            self.present[p] = false;
            self.count -= 1;
        }
        Ok(was)
    }

    /// Present ids in ascending order.
    pub fn active_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.present
            .iter()
            .enumerate()
            .filter_map(|(p, &on)| on.then_some(p))
    }
}
