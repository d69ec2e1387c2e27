use std::collections::BTreeMap;

use scene::labels::{ElementId, LabelWidget};
use tracing::trace;

/// Headless label overlay: keeps mounted labels in memory.
#[derive(Debug, Default)]
pub struct ConsoleLabels {
    next: u64,
    mounted: BTreeMap<ElementId, String>,
}

impl ConsoleLabels {
    /// Names of mounted labels, in mount order.
    pub fn names(&self) -> Vec<&str> {
        self.mounted.values().map(String::as_str).collect()
    }
}

impl LabelWidget for ConsoleLabels {
    fn mount(&mut self, id: &str, name: &str) -> ElementId {
        self.next += 1;
        let element = ElementId(self.next);
        trace!(id, name, element = element.0, "mount label");
        self.mounted.insert(element, name.to_string());
        element
    }

    fn unmount(&mut self, element: ElementId) {
        trace!(element = element.0, "unmount label");
        self.mounted.remove(&element);
    }
}
