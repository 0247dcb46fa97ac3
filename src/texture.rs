//! Shared, reference-counted textures.
//!
//! A [TextureCache] deduplicates textures by name: the first request for a name creates the
//! texture, later requests share it, and the last [release](TextureCache::release) destroys it.

use std::collections::HashMap;

use crate::{RenderBackend, SlotArena, TextureHandle};

geode_common::define_handle! {
    /// An entry of a [TextureCache].
    TextureId,
}

/// Properties of a created texture.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub is_cube_map: bool,
}

/// A texture shared through a [TextureCache].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureResource {
    handle: TextureHandle,
    name: String,
    info: TextureInfo,
    refs: usize,
}

impl TextureResource {
    #[inline]
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn info(&self) -> &TextureInfo {
        &self.info
    }

    /// Number of outstanding references.
    #[inline]
    pub fn refs(&self) -> usize {
        self.refs
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError<E> {
    #[error("texture cache is full ({0} entries)")]
    Full(usize),
    #[error("could not create texture: {0}")]
    Create(E),
}

/// Textures keyed by name, each destroyed once its last reference is released.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: SlotArena<TextureResource>,
    by_name: HashMap<String, TextureId>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a cache holding at most `max_len` textures.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            entries: SlotArena::with_max_len(max_len),
            by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take a reference to the texture named `name`, creating it with `create` if it is not yet
    /// cached.
    ///
    /// # Errors
    ///
    /// * [`Full`](TextureError::Full) if `name` is new and the cache is full; `create` is not called
    /// * [`Create`](TextureError::Create) if `create` fails
    pub fn get_or_insert_with<E, F>(
        &mut self,
        name: &str,
        create: F,
    ) -> Result<TextureId, TextureError<E>>
    where
        F: FnOnce() -> Result<(TextureHandle, TextureInfo), E>,
    {
        if let Some(&id) = self.by_name.get(name) {
            if let Some(entry) = self.entries.get_mut(id.index()) {
                entry.refs += 1;
                return Ok(id);
            }
        }
        if self.entries.is_full() {
            return Err(TextureError::Full(self.entries.max_len()));
        }
        let (handle, info) = create().map_err(TextureError::Create)?;
        let resource = TextureResource {
            handle,
            name: name.to_owned(),
            info,
            refs: 1,
        };
        let id = self
            .entries
            .insert(resource)
            .map(TextureId::new)
            .map_err(|_| TextureError::Full(self.entries.max_len()))?;
        self.by_name.insert(name.to_owned(), id);
        tracing::debug!(name, %handle, width = info.width, height = info.height, "cached texture");
        Ok(id)
    }

    /// Take another reference to a cached texture.
    pub fn acquire(&mut self, id: TextureId) -> Option<TextureHandle> {
        let entry = self.entries.get_mut(id.index())?;
        entry.refs += 1;
        Some(entry.handle)
    }

    /// Drop a reference to a cached texture, destroying it through `backend` if it was the last.
    ///
    /// Returns whether the texture was destroyed.
    pub fn release<B: RenderBackend + ?Sized>(&mut self, id: TextureId, backend: &mut B) -> bool {
        let Some(entry) = self.entries.get_mut(id.index()) else {
            tracing::warn!(%id, "releasing a texture which is not cached");
            return false;
        };
        entry.refs -= 1;
        if entry.refs > 0 {
            return false;
        }
        match self.entries.remove(id.index()) {
            Some(entry) => {
                self.by_name.remove(&entry.name);
                backend.destroy_texture(entry.handle);
                tracing::debug!(name = %entry.name, "destroyed texture");
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: TextureId) -> Option<&TextureResource> {
        self.entries.get(id.index())
    }

    /// Find a cached texture by name, without taking a reference to it.
    pub fn find(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// The GPU handle of a cached texture; invalid if `id` is not cached.
    pub fn handle(&self, id: TextureId) -> TextureHandle {
        self.get(id).map(|e| e.handle).unwrap_or_default()
    }

    /// Destroy every cached texture, regardless of outstanding references.
    pub fn clear<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        self.by_name.clear();
        for (_, entry) in self.entries.drain() {
            if entry.refs > 1 {
                tracing::debug!(name = %entry.name, refs = entry.refs, "clearing shared texture");
            }
            backend.destroy_texture(entry.handle);
        }
    }
}

impl Drop for TextureCache {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            tracing::warn!(
                textures = self.entries.len(),
                "texture cache dropped while holding textures; they are leaked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;

    #[test]
    fn full_cache_does_not_create() {
        let mut backend = RecordingBackend::default();
        let mut cache = TextureCache::with_max_len(1);
        cache
            .get_or_insert_with("a", || backend.create_texture(1, 1).map(|h| (h, TextureInfo::default())))
            .unwrap();
        let res = cache.get_or_insert_with("b", || -> Result<_, ()> {
            panic!("should not be called")
        });
        assert!(matches!(res, Err(TextureError::Full(1))));
        cache.clear(&mut backend);
        assert_eq!(backend.live_textures(), 0);
    }
}
