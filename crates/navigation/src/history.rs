use crate::source::DatasetRef;

/// Stack of visited datasets; the bottom entry is the root level.
///
/// Never holds two identical consecutive entries and never pops its root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationHistory {
    entries: Vec<DatasetRef>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything and starts over from `root`.
    pub fn reset(&mut self, root: DatasetRef) {
        self.entries.clear();
        self.entries.push(root);
    }

    /// Returns `false` (and does nothing) if `dataset` is already on top.
    pub fn push(&mut self, dataset: DatasetRef) -> bool {
        if self.top() == Some(&dataset) {
            return false;
        }
        self.entries.push(dataset);
        true
    }

    /// Pops the top entry unless it is the root.
    pub fn pop(&mut self) -> Option<DatasetRef> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop()
    }

    pub fn top(&self) -> Option<&DatasetRef> {
        self.entries.last()
    }

    /// The entry a drill-up would return to.
    pub fn parent(&self) -> Option<&DatasetRef> {
        let n = self.entries.len();
        if n < 2 {
            return None;
        }
        self.entries.get(n - 2)
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[DatasetRef] {
        &self.entries
    }
}
