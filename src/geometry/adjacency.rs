//! Local adjacency primitive used by the coarsening engine.
//!
//! Given a small working set of points and a box around them, the primitive
//! reports which points are neighbors of which. Neighbors are either other
//! input points or one of the six box walls; walls are a separate variant so
//! callers can ignore them without sentinel ids.
//!
//! [`GabrielAdjacency`] is the built-in implementation: two points are
//! adjacent when no third point lies strictly inside the sphere having their
//! connecting segment as diameter. The Gabriel graph is a subgraph of the
//! Delaunay triangulation, is exact for collinear inputs and needs no
//! tolerance-sensitive predicates beyond one distance comparison.

use super::bounds::BoundingBox;
use super::positions::squared_distance;

/// One face of the bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoxWall {
    XMin,
    XMax,
    YMin,
    YMax,
    ZMin,
    ZMax,
}

impl BoxWall {
    const MIN_WALLS: [BoxWall; 3] = [BoxWall::XMin, BoxWall::YMin, BoxWall::ZMin];
    const MAX_WALLS: [BoxWall; 3] = [BoxWall::XMax, BoxWall::YMax, BoxWall::ZMax];
}

/// A neighbor reported by a [`LocalAdjacency`] implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocalNeighbor {
    /// Another input point, by global id.
    Point(usize),
    /// A wall of the bounding box.
    Wall(BoxWall),
}

impl LocalNeighbor {
    /// The global id for point neighbors, `None` for walls.
    #[inline]
    pub fn point(self) -> Option<usize> {
        match self {
            LocalNeighbor::Point(id) => Some(id),
            LocalNeighbor::Wall(_) => None,
        }
    }
}

/// Input record for the primitive: a global id and its position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalPoint {
    pub id: usize,
    pub position: [f64; 3],
}

/// Computes neighbor relations among a local set of points inside a box.
///
/// The returned outer vector is aligned with `points`. Implementations must
/// never report a point as its own neighbor.
pub trait LocalAdjacency {
    fn compute_neighbors(&self, points: &[LocalPoint], bounds: &BoundingBox)
    -> Vec<Vec<LocalNeighbor>>;
}

/// Gabriel-graph adjacency with wall contacts for extremal points.
#[derive(Clone, Copy, Debug)]
pub struct GabrielAdjacency {
    /// Relative slack on the empty-sphere test; points closer than
    /// `radius² * (1 - slack)` to the midpoint block the pair.
    pub slack: f64,
}

impl Default for GabrielAdjacency {
    fn default() -> Self {
        Self { slack: 1.0e-12 }
    }
}

impl LocalAdjacency for GabrielAdjacency {
    fn compute_neighbors(
        &self,
        points: &[LocalPoint],
        bounds: &BoundingBox,
    ) -> Vec<Vec<LocalNeighbor>> {
        let mut out = vec![Vec::new(); points.len()];
        let inside: Vec<usize> = (0..points.len())
            .filter(|&i| bounds.contains(points[i].position))
            .collect();

        for (a, &i) in inside.iter().enumerate() {
            for &j in &inside[a + 1..] {
                if points[i].id == points[j].id {
                    continue;
                }
                let pi = points[i].position;
                let pj = points[j].position;
                let mid = [
                    0.5 * (pi[0] + pj[0]),
                    0.5 * (pi[1] + pj[1]),
                    0.5 * (pi[2] + pj[2]),
                ];
                let radius2 = 0.25 * squared_distance(pi, pj);
                let limit = radius2 * (1.0 - self.slack);
                let blocked = inside.iter().any(|&k| {
                    k != i && k != j && squared_distance(points[k].position, mid) < limit
                });
                if !blocked {
                    out[i].push(LocalNeighbor::Point(points[j].id));
                    out[j].push(LocalNeighbor::Point(points[i].id));
                }
            }
        }

        // The point closest to a wall owns the Voronoi cell touching it.
        for axis in 0..3 {
            let lo = inside
                .iter()
                .map(|&i| points[i].position[axis])
                .fold(f64::INFINITY, f64::min);
            let hi = inside
                .iter()
                .map(|&i| points[i].position[axis])
                .fold(f64::NEG_INFINITY, f64::max);
            for &i in &inside {
                let c = points[i].position[axis];
                if c == lo {
                    out[i].push(LocalNeighbor::Wall(BoxWall::MIN_WALLS[axis]));
                }
                if c == hi {
                    out[i].push(LocalNeighbor::Wall(BoxWall::MAX_WALLS[axis]));
                }
            }
        }

        for list in &mut out {
            list.sort_unstable();
            list.dedup();
        }
        out
    }
}
