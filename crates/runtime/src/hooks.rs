use foundation::arena::Arena;
use foundation::handles::Handle;

/// A per-frame callback registration.
///
/// The harness does not store closures: a hook names *what* to run (`kind`)
/// and the owner of the hook dispatches on it each frame. This keeps the
/// mutable state a hook touches explicit at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHook<K> {
    pub id: &'static str,
    /// Smaller values run earlier.
    pub priority: i32,
    pub kind: K,
}

impl<K> FrameHook<K> {
    pub fn new(id: &'static str, kind: K) -> Self {
        Self {
            id,
            priority: 0,
            kind,
        }
    }

    pub fn with_priority(id: &'static str, priority: i32, kind: K) -> Self {
        Self { id, priority, kind }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HookHandle(Handle);

/// Registry of per-frame hooks.
///
/// Ordering contract: hooks run in `(priority, id, registration order)`.
#[derive(Debug)]
pub struct FrameHooks<K> {
    next_order: u64,
    hooks: Arena<(u64, FrameHook<K>)>,
}

impl<K> Default for FrameHooks<K> {
    fn default() -> Self {
        Self {
            next_order: 0,
            hooks: Arena::new(),
        }
    }
}

impl<K: Copy> FrameHooks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: FrameHook<K>) -> HookHandle {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        HookHandle(self.hooks.insert((order, hook)))
    }

    /// Returns `true` if the hook was still registered.
    pub fn unregister(&mut self, handle: HookHandle) -> bool {
        self.hooks.remove(handle.0).is_some()
    }

    pub fn is_registered(&self, handle: HookHandle) -> bool {
        self.hooks.contains(handle.0)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Hook kinds to run this frame, in deterministic order.
    pub fn due(&self) -> Vec<K> {
        let mut due: Vec<&(u64, FrameHook<K>)> = self.hooks.iter().map(|(_, h)| h).collect();
        due.sort_by(|(oa, a), (ob, b)| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.id.cmp(b.id))
                .then_with(|| oa.cmp(ob))
        });
        due.into_iter().map(|(_, h)| h.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameHook, FrameHooks};

    #[test]
    fn runs_hooks_in_priority_then_id_order() {
        let mut hooks = FrameHooks::new();
        hooks.register(FrameHook::new("b", 'b'));
        hooks.register(FrameHook::new("a", 'a'));
        hooks.register(FrameHook::with_priority("z", -1, 'z'));
        assert_eq!(hooks.due(), vec!['z', 'a', 'b']);
    }

    #[test]
    fn duplicate_ids_keep_registration_order() {
        let mut hooks = FrameHooks::new();
        hooks.register(FrameHook::new("same", 1));
        hooks.register(FrameHook::new("same", 2));
        assert_eq!(hooks.due(), vec![1, 2]);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut hooks = FrameHooks::new();
        let h = hooks.register(FrameHook::new("tick", ()));
        assert!(hooks.is_registered(h));
        assert!(hooks.unregister(h));
        assert!(!hooks.unregister(h));
        assert!(hooks.is_empty());
        assert!(hooks.due().is_empty());
    }
}
