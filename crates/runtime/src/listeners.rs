use foundation::arena::Arena;
use foundation::handles::Handle;

/// Input events the map core subscribes to on the render surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InputKind {
    PointerMove,
    Click,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerHandle(Handle);

/// Input-listener registrations held by the input-binding collaborator.
///
/// Events of a kind nobody listens to are dropped by the collaborator, so
/// removing a listener is what actually stops delivery.
#[derive(Debug, Default)]
pub struct InputListeners {
    listeners: Arena<InputKind>,
}

impl InputListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&mut self, kind: InputKind) -> ListenerHandle {
        ListenerHandle(self.listeners.insert(kind))
    }

    /// Returns `true` if the listener was still registered.
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(handle.0).is_some()
    }

    pub fn is_listening(&self, kind: InputKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{InputKind, InputListeners};

    #[test]
    fn listening_tracks_live_registrations() {
        let mut l = InputListeners::new();
        assert!(!l.is_listening(InputKind::Click));

        let a = l.listen(InputKind::Click);
        let b = l.listen(InputKind::Click);
        assert!(l.is_listening(InputKind::Click));
        assert!(!l.is_listening(InputKind::PointerMove));

        assert!(l.remove(a));
        assert!(l.is_listening(InputKind::Click));
        assert!(l.remove(b));
        assert!(!l.is_listening(InputKind::Click));
        assert!(!l.remove(b));
        assert!(l.is_empty());
    }
}
