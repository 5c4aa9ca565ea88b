use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational handle to a loaded texture.
    ///
    /// A handle outlives `unload_image` only as a stale key: lookups through it
    /// fail instead of aliasing whatever texture reuses the slot.
    pub struct TextureId;
}

/// Arena of textures keyed by [`TextureId`].
///
/// Backends store their own texture representation (`wgpu` texture + bind
/// group, or a CPU bitmap) in `T`.
#[derive(Debug)]
pub struct TextureStore<T> {
    slots: SlotMap<TextureId, T>,
}

impl<T> Default for TextureStore<T> {
    fn default() -> Self {
        Self { slots: SlotMap::with_key() }
    }
}

impl<T> TextureStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: T) -> TextureId {
        self.slots.insert(texture)
    }

    pub fn get(&self, id: TextureId) -> Option<&T> {
        self.slots.get(id)
    }

    pub fn contains(&self, id: TextureId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn remove(&mut self, id: TextureId) -> Option<T> {
        self.slots.remove(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Removes every texture, yielding them for explicit destruction.
    pub fn drain(&mut self) -> impl Iterator<Item = (TextureId, T)> + '_ {
        self.slots.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_id_does_not_alias_reused_slot() {
        let mut store = TextureStore::new();
        let first = store.insert("first");
        assert_eq!(store.remove(first), Some("first"));

        let second = store.insert("second");
        assert_ne!(first, second);
        assert_eq!(store.get(first), None);
        assert_eq!(store.get(second), Some(&"second"));
    }

    #[test]
    fn double_remove_is_none() {
        let mut store = TextureStore::new();
        let id = store.insert(1u8);
        assert!(store.remove(id).is_some());
        assert!(store.remove(id).is_none());
        assert!(store.is_empty());
    }
}
