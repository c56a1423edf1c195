use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// A GPU object that can live in a [`Registry`].
pub(crate) trait GpuResource {
    /// Human-readable kind, used in log lines and errors.
    const KIND: &'static str;

    /// Releases the underlying GPU memory eagerly.
    ///
    /// Called when an entry is replaced or destroyed. Objects without an explicit
    /// destroy call are freed when their last handle drops.
    fn release(&self) {}
}

impl GpuResource for wgpu::ShaderModule {
    const KIND: &'static str = "shader module";
}

impl GpuResource for wgpu::Buffer {
    const KIND: &'static str = "buffer";

    fn release(&self) {
        self.destroy();
    }
}

impl GpuResource for wgpu::Texture {
    const KIND: &'static str = "texture";

    fn release(&self) {
        self.destroy();
    }
}

impl GpuResource for wgpu::BindGroup {
    const KIND: &'static str = "bind group";
}

/// Name-keyed store for one kind of GPU object.
///
/// Names are unique. Inserting under a taken name replaces the entry and releases the
/// previous handle instead of orphaning it.
pub(crate) struct Registry<T> {
    entries: HashMap<String, T>,
}

impl<T: GpuResource> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Stores `value` under `name` and returns a reference to the stored value.
    pub(crate) fn insert(&mut self, name: &str, value: T) -> &T {
        match self.entries.entry(name.to_string()) {
            Entry::Occupied(mut slot) => {
                log::warn!("replacing {} `{}`; releasing the previous handle", T::KIND, name);
                let previous = slot.insert(value);
                previous.release();
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(value),
        }
    }

    /// Looks up an entry. Unknown names yield `None`.
    pub(crate) fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    /// Removes and releases an entry. Returns `false` (and does nothing) if absent.
    pub(crate) fn destroy(&mut self, name: &str) -> bool {
        match self.entries.remove(name) {
            Some(value) => {
                value.release();
                log::debug!("destroyed {} `{}`", T::KIND, name);
                true
            }
            None => false,
        }
    }
}

impl<T: GpuResource> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Stand-in resource that counts releases.
    struct Tracked {
        id: u32,
        released: Rc<Cell<u32>>,
    }

    impl Tracked {
        fn new(id: u32, released: &Rc<Cell<u32>>) -> Self {
            Self {
                id,
                released: Rc::clone(released),
            }
        }
    }

    impl GpuResource for Tracked {
        const KIND: &'static str = "tracked";

        fn release(&self) {
            self.released.set(self.released.get() + 1);
        }
    }

    #[test]
    fn unknown_name_is_none() {
        let registry: Registry<Tracked> = Registry::new();
        assert!(registry.get("missing").is_none());
        assert!(registry.entries.is_empty());
    }

    #[test]
    fn insert_then_get() {
        let released = Rc::new(Cell::new(0));
        let mut registry = Registry::new();

        let stored = registry.insert("a", Tracked::new(1, &released));
        assert_eq!(stored.id, 1);
        assert_eq!(registry.get("a").map(|p| p.id), Some(1));
        assert_eq!(registry.entries.len(), 1);
        assert_eq!(released.get(), 0);
    }

    #[test]
    fn replacing_releases_previous_handle() {
        let released = Rc::new(Cell::new(0));
        let mut registry = Registry::new();

        registry.insert("a", Tracked::new(1, &released));
        let stored = registry.insert("a", Tracked::new(2, &released));

        assert_eq!(stored.id, 2);
        assert_eq!(released.get(), 1);
        assert_eq!(registry.entries.len(), 1);
        assert_eq!(registry.get("a").map(|p| p.id), Some(2));
    }

    #[test]
    fn destroy_releases_and_removes() {
        let released = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        registry.insert("a", Tracked::new(1, &released));

        assert!(registry.destroy("a"));
        assert_eq!(released.get(), 1);
        assert!(registry.get("a").is_none());
    }

    #[test]
    fn destroy_absent_is_noop() {
        let released = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        registry.insert("a", Tracked::new(1, &released));

        assert!(!registry.destroy("b"));
        assert_eq!(released.get(), 0);
        assert_eq!(registry.entries.len(), 1);
    }
}
