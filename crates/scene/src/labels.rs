/// Opaque handle to a DOM-attachable element owned by the label widget.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Label-overlay collaborator.
///
/// The core never renders text; it asks the widget for an element per region,
/// positions it in 3D, and hands it back on teardown.
pub trait LabelWidget {
    fn mount(&mut self, id: &str, name: &str) -> ElementId;
    fn unmount(&mut self, element: ElementId);
}
