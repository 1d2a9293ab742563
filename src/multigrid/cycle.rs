//! Level-visiting policies for multigrid-style iteration.
//!
//! A cycle is a precomputed sequence of level indices. Consecutive repeats
//! are collapsed, so each step either coarsens or refines by at least one
//! level. Moving from a coarser level to a finer one is a field transfer
//! with `source = previous` and `dest = level`.

use crate::mesh_error::MeshError;

/// Closed set of iteration-order policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(i64)]
pub enum CycleKind {
    /// Coarsest to finest once per iteration.
    Naive = 1,
    /// Descend to the coarsest level and climb back.
    VCycle = 2,
    /// Visit each coarser sub-hierarchy twice per descent.
    WCycle = 3,
}

impl TryFrom<i64> for CycleKind {
    type Error = MeshError;

    fn try_from(selector: i64) -> Result<Self, Self::Error> {
        match selector {
            1 => Ok(CycleKind::Naive),
            2 => Ok(CycleKind::VCycle),
            3 => Ok(CycleKind::WCycle),
            other => Err(MeshError::UnknownCyclePolicy(other)),
        }
    }
}

/// One step of a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelVisit {
    pub level: usize,
    /// Level visited just before, `None` for the first step.
    pub previous: Option<usize>,
}

impl LevelVisit {
    /// `(source, dest)` when this step refines, i.e. the previous level was
    /// coarser and its results must be interpolated onto `level`.
    pub fn transfer(&self) -> Option<(usize, usize)> {
        match self.previous {
            Some(prev) if prev > self.level => Some((prev, self.level)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_refinement(&self) -> bool {
        self.transfer().is_some()
    }
}

/// Iterator over the levels visited by a cycle policy.
#[derive(Clone, Debug)]
pub struct MultigridCycle {
    kind: CycleKind,
    sequence: Vec<usize>,
    cursor: usize,
}

impl MultigridCycle {
    /// Cycle between `finest_level` and `max_level` (the coarsest),
    /// repeated `max_iterations` times.
    pub fn new(
        kind: CycleKind,
        max_level: usize,
        finest_level: usize,
        max_iterations: usize,
    ) -> Result<Self, MeshError> {
        if finest_level > max_level {
            return Err(MeshError::InvalidConfiguration(format!(
                "finest level {finest_level} exceeds max level {max_level}"
            )));
        }
        if max_iterations == 0 {
            return Err(MeshError::InvalidConfiguration(
                "max_iterations must be at least 1".into(),
            ));
        }
        let mut one = Vec::new();
        match kind {
            CycleKind::Naive => one.extend((finest_level..=max_level).rev()),
            CycleKind::VCycle => v_cycle(finest_level, max_level, &mut one),
            CycleKind::WCycle => w_cycle(finest_level, max_level, &mut one),
        }
        let mut sequence = Vec::with_capacity(one.len() * max_iterations);
        for _ in 0..max_iterations {
            push_collapsed(&mut sequence, one.iter().copied());
        }
        Ok(Self {
            kind,
            sequence,
            cursor: 0,
        })
    }

    #[inline]
    pub fn kind(&self) -> CycleKind {
        self.kind
    }

    /// The full level sequence, independent of iteration progress.
    #[inline]
    pub fn levels(&self) -> &[usize] {
        &self.sequence
    }

    /// Advance and return the next level to visit.
    pub fn next_level(&mut self) -> Option<usize> {
        self.next().map(|visit| visit.level)
    }
}

impl Iterator for MultigridCycle {
    type Item = LevelVisit;

    fn next(&mut self) -> Option<LevelVisit> {
        let level = *self.sequence.get(self.cursor)?;
        let previous = self
            .cursor
            .checked_sub(1)
            .map(|i| self.sequence[i]);
        self.cursor += 1;
        Some(LevelVisit { level, previous })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.sequence.len() - self.cursor;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for MultigridCycle {}

fn push_collapsed(out: &mut Vec<usize>, levels: impl IntoIterator<Item = usize>) {
    for l in levels {
        if out.last() != Some(&l) {
            out.push(l);
        }
    }
}

fn v_cycle(level: usize, coarsest: usize, out: &mut Vec<usize>) {
    push_collapsed(out, [level]);
    if level < coarsest {
        v_cycle(level + 1, coarsest, out);
        push_collapsed(out, [level]);
    }
}

fn w_cycle(level: usize, coarsest: usize, out: &mut Vec<usize>) {
    push_collapsed(out, [level]);
    if level < coarsest {
        w_cycle(level + 1, coarsest, out);
        w_cycle(level + 1, coarsest, out);
        push_collapsed(out, [level]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(kind: CycleKind, max: usize, finest: usize, iters: usize) -> Vec<usize> {
        MultigridCycle::new(kind, max, finest, iters)
            .unwrap()
            .map(|v| v.level)
            .collect()
    }

    #[test]
    fn selector_decoding() {
        assert_eq!(CycleKind::try_from(1), Ok(CycleKind::Naive));
        assert_eq!(CycleKind::try_from(3), Ok(CycleKind::WCycle));
        assert_eq!(CycleKind::try_from(0), Err(MeshError::UnknownCyclePolicy(0)));
    }

    #[test]
    fn sequences() {
        assert_eq!(levels(CycleKind::Naive, 2, 0, 1), vec![2, 1, 0]);
        assert_eq!(levels(CycleKind::VCycle, 2, 0, 1), vec![0, 1, 2, 1, 0]);
        assert_eq!(levels(CycleKind::WCycle, 2, 0, 1), vec![0, 1, 2, 1, 2, 1, 0]);
        assert_eq!(levels(CycleKind::VCycle, 2, 1, 2), vec![1, 2, 1, 2, 1]);
        assert_eq!(levels(CycleKind::VCycle, 0, 0, 3), vec![0]);
    }

    #[test]
    fn transfers_only_when_refining() {
        let transfers: Vec<_> = MultigridCycle::new(CycleKind::VCycle, 2, 0, 1)
            .unwrap()
            .filter_map(|v| v.transfer())
            .collect();
        assert_eq!(transfers, vec![(2, 1), (1, 0)]);
    }

    #[test]
    fn next_level_walks_the_sequence() {
        let mut cycle = MultigridCycle::new(CycleKind::Naive, 1, 0, 2).unwrap();
        assert_eq!(cycle.len(), 4);
        assert_eq!(cycle.next_level(), Some(1));
        assert_eq!(cycle.next_level(), Some(0));
        assert_eq!(cycle.next_level(), Some(1));
        assert_eq!(cycle.next_level(), Some(0));
        assert_eq!(cycle.next_level(), None);
    }
}
