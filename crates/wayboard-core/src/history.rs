//! Snapshot-based undo/redo over the raster surface.

use crate::surface::{RasterSurface, Snapshot};

/// Linear history of buffer snapshots with a cursor.
///
/// Invariant: when non-empty, `step < snapshots.len()`. Committing while
/// the cursor is not at the end prunes the redo branch. Unbounded unless
/// built with [`History::with_limit`].
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    step: usize,
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            step: 0,
            limit: None,
        }
    }

    /// Create an empty history keeping at most `limit` snapshots (minimum 1).
    ///
    /// Evicting the oldest snapshot means undo can no longer reach the
    /// baseline once more than `limit - 1` commits were made.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new()
        }
    }

    /// History with an optional cap, as configured on the host.
    pub fn bounded(limit: Option<usize>) -> Self {
        match limit {
            Some(limit) => Self::with_limit(limit),
            None => Self::new(),
        }
    }

    /// Snapshot the surface and make it the current step.
    pub fn commit(&mut self, surface: &RasterSurface) {
        self.push(surface.snapshot());
    }

    /// Append a snapshot after the cursor, discarding any redo branch.
    pub fn push(&mut self, snapshot: Snapshot) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.step + 1);
        }
        self.snapshots.push(snapshot);

        if let Some(excess) = self.limit.and_then(|limit| self.snapshots.len().checked_sub(limit)) {
            self.snapshots.drain(..excess);
        }
        self.step = self.snapshots.len() - 1;
        log::debug!("History commit: step {} of {}", self.step, self.snapshots.len());
    }

    /// Step back and restore that snapshot.
    /// Returns true if undo was performed, false if already at the first step.
    pub fn undo(&mut self, surface: &mut RasterSurface) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.step -= 1;
        surface.restore(&self.snapshots[self.step]);
        true
    }

    /// Step forward and restore that snapshot.
    /// Returns true if redo was performed, false if already at the last step.
    pub fn redo(&mut self, surface: &mut RasterSurface) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.step += 1;
        surface.restore(&self.snapshots[self.step]);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty() && self.step > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.snapshots.is_empty() && self.step + 1 < self.snapshots.len()
    }

    /// Cursor position, or `None` while empty.
    pub fn step(&self) -> Option<usize> {
        (!self.snapshots.is_empty()).then_some(self.step)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.step)
    }

    /// Drop every snapshot (surface unmount).
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.step = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::SerializableColor;
    use kurbo::Point;

    fn surface() -> RasterSurface {
        let mut s = RasterSurface::new(1.0, SerializableColor::white()).unwrap();
        s.resize(32.0, 32.0).unwrap();
        s
    }

    fn dab(surface: &mut RasterSurface, x: f64) {
        surface
            .context()
            .fill_circle(Point::new(x, 16.0), 3.0, SerializableColor::black());
    }

    #[test]
    fn test_empty_history() {
        let mut h = History::new();
        let mut s = surface();
        assert!(h.is_empty());
        assert_eq!(h.step(), None);
        assert!(!h.undo(&mut s));
        assert!(!h.redo(&mut s));
    }

    #[test]
    fn test_undo_redo_restores_buffers() {
        let mut h = History::new();
        let mut s = surface();
        h.commit(&s);
        let baseline = s.snapshot();
        dab(&mut s, 8.0);
        h.commit(&s);
        let after = s.snapshot();

        assert!(h.undo(&mut s));
        assert_eq!(s.snapshot(), baseline);
        assert!(!h.undo(&mut s));

        assert!(h.redo(&mut s));
        assert_eq!(s.snapshot(), after);
        assert!(!h.redo(&mut s));
    }

    #[test]
    fn test_commit_after_undo_prunes_redo_branch() {
        let mut h = History::new();
        let mut s = surface();
        h.commit(&s);
        dab(&mut s, 6.0);
        h.commit(&s);
        dab(&mut s, 12.0);
        h.commit(&s);

        assert!(h.undo(&mut s));
        let step_before = h.step().unwrap();
        dab(&mut s, 24.0);
        h.commit(&s);

        assert_eq!(h.len(), step_before + 2);
        assert!(!h.can_redo());
    }

    #[test]
    fn test_default_history_keeps_every_commit() {
        let mut h = History::new();
        let mut s = surface();
        h.commit(&s);
        let baseline = s.snapshot();
        for i in 0..60 {
            dab(&mut s, f64::from(i % 30));
            h.commit(&s);
        }
        assert_eq!(h.limit(), None);
        assert_eq!(h.len(), 61);

        let mut undos = 0;
        while h.undo(&mut s) {
            undos += 1;
        }
        assert_eq!(undos, 60);
        assert_eq!(s.snapshot(), baseline);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut h = History::with_limit(3);
        let mut s = surface();
        for i in 0..5 {
            dab(&mut s, 4.0 + i as f64 * 5.0);
            h.commit(&s);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.step(), Some(2));
        assert_eq!(h.current(), Some(&s.snapshot()));
    }

    #[test]
    fn test_reset() {
        let mut h = History::new();
        let s = surface();
        h.commit(&s);
        h.reset();
        assert!(h.is_empty());
        assert!(!h.can_undo());
    }
}
