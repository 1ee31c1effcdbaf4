//! Level-of-detail navigation on top of single split/contraction steps

use crate::progressive::ProgressiveMesh;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Summary of a progressive mesh's current resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOfDetail {
    pub vertex_count: usize,
    pub face_count: usize,
    pub current_split: usize,
    pub num_splits: usize,
}

impl LevelOfDetail {
    /// Whole-number percentage of splits applied; 100 for a mesh without splits
    pub fn percent(&self) -> usize {
        if self.num_splits == 0 {
            100
        } else {
            100 * self.current_split / self.num_splits
        }
    }
}

impl fmt::Display for LevelOfDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({} %)", self.current_split, self.num_splits, self.percent())
    }
}

impl ProgressiveMesh {
    /// Total number of split records, applied or not
    pub fn num_splits(&self) -> usize {
        self.splits().len() + self.contractions().len()
    }

    /// Number of splits currently applied
    pub fn current_split(&self) -> usize {
        self.contractions().len()
    }

    /// Number of splits still to apply before full detail
    pub fn pending_splits(&self) -> usize {
        self.splits().len()
    }

    pub fn has_more_detail(&self) -> bool {
        !self.splits().is_empty()
    }

    pub fn has_less_detail(&self) -> bool {
        !self.contractions().is_empty()
    }

    /// Fraction of splits applied, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        match self.num_splits() {
            0 => 1.0,
            n => self.current_split() as f64 / n as f64,
        }
    }

    /// Apply up to `steps` splits; returns how many were applied.
    pub fn refine(&mut self, steps: usize) -> usize {
        (0..steps).take_while(|_| self.perform_vertex_split()).count()
    }

    /// Apply up to `steps` contractions; returns how many were applied.
    pub fn coarsen(&mut self, steps: usize) -> usize {
        (0..steps).take_while(|_| self.perform_contraction()).count()
    }

    /// Move to exactly `level` applied splits (clamped to the total).
    ///
    /// Returns the number of edits performed.
    pub fn set_level(&mut self, level: usize) -> usize {
        let from = self.current_split();
        let to = level.min(self.num_splits());
        let steps = if to >= from {
            self.refine(to - from)
        } else {
            self.coarsen(from - to)
        };
        debug!(from, to, steps, "level of detail changed");
        steps
    }

    /// Move to the level closest to `fraction` of all splits applied.
    ///
    /// `fraction` is clamped to `[0, 1]`; NaN leaves the mesh unchanged.
    pub fn progress_to(&mut self, fraction: f64) -> usize {
        if fraction.is_nan() {
            return 0;
        }
        let target = (fraction.clamp(0.0, 1.0) * self.num_splits() as f64).round() as usize;
        self.set_level(target)
    }

    /// Apply every remaining split
    pub fn expand_fully(&mut self) -> usize {
        self.refine(self.pending_splits())
    }

    /// Undo every applied split
    pub fn collapse_fully(&mut self) -> usize {
        self.coarsen(self.current_split())
    }

    pub fn level_of_detail(&self) -> LevelOfDetail {
        LevelOfDetail {
            vertex_count: self.vertex_count(),
            face_count: self.face_count(),
            current_split: self.current_split(),
            num_splits: self.num_splits(),
        }
    }
}
