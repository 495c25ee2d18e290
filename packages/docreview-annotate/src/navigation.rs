//! Stepping through an ordered annotation list, optionally only over flagged entries.

use crate::annotation::AnnotationId;
use crate::selection::{AnnotationHost, SelectionController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    ids: Vec<AnnotationId>,
    critical: Vec<bool>,
    index: usize,
}

impl Navigator {
    /// Builds a navigator from `(id, is_critical)` pairs. The cursor starts at 0.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (AnnotationId, bool)>,
    {
        let (ids, critical) = entries.into_iter().unzip();
        Self { ids, critical, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&AnnotationId> {
        self.ids.get(self.index)
    }

    pub fn is_critical(&self, index: usize) -> bool {
        self.critical.get(index).copied().unwrap_or(false)
    }

    pub fn critical_count(&self) -> usize {
        self.critical.iter().filter(|c| **c).count()
    }

    /// Moves the cursor to `id` without selecting. Returns false if `id` is not listed.
    pub fn jump_to(&mut self, id: &AnnotationId) -> bool {
        match self.ids.iter().position(|candidate| candidate == id) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    /// One step with wraparound over the full list.
    pub fn step(
        &mut self,
        direction: Direction,
        selection: &mut SelectionController,
        host: &mut dyn AnnotationHost,
    ) -> Option<AnnotationId> {
        let target = self.wrapped_index(direction)?;
        self.land(target, selection, host)
    }

    /// One step over flagged entries only, wrapping within that subset.
    pub fn step_critical(
        &mut self,
        direction: Direction,
        selection: &mut SelectionController,
        host: &mut dyn AnnotationHost,
    ) -> Option<AnnotationId> {
        let target = self.critical_index(direction)?;
        self.land(target, selection, host)
    }

    fn wrapped_index(&self, direction: Direction) -> Option<usize> {
        let len = self.ids.len();
        if len == 0 {
            return None;
        }
        Some(match direction {
            Direction::Next => (self.index + 1) % len,
            Direction::Previous => (self.index + len - 1) % len,
        })
    }

    fn critical_index(&self, direction: Direction) -> Option<usize> {
        let mut flagged = self
            .critical
            .iter()
            .enumerate()
            .filter(|(_, critical)| **critical)
            .map(|(i, _)| i);

        match direction {
            Direction::Next => {
                let first = flagged.clone().next()?;
                Some(flagged.find(|&i| i > self.index).unwrap_or(first))
            }
            Direction::Previous => {
                let last = flagged.clone().last()?;
                Some(flagged.rev().find(|&i| i < self.index).unwrap_or(last))
            }
        }
    }

    fn land(
        &mut self,
        target: usize,
        selection: &mut SelectionController,
        host: &mut dyn AnnotationHost,
    ) -> Option<AnnotationId> {
        self.index = target;
        let id = self.ids.get(target)?.clone();
        selection.select(id.clone(), host);
        Some(id)
    }
}
