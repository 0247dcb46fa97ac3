mod group;
pub use group::*;
mod primitive;
pub use primitive::*;
mod state;
pub use state::*;
mod submit;

use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use crate::{
    de::{Chunk, ChunkReader, ChunkTag, ParseError},
    Error, RenderBackend, VertexLayout,
};

/// A set of [Groups](Group) sharing one [VertexLayout], resident on the GPU.
///
/// Meshes own GPU buffers but cannot free them on their own, since that requires the
/// [RenderBackend] they were created with; call [unload](Self::unload) before dropping one.
#[derive(Debug, Default)]
pub struct Mesh {
    layout: VertexLayout,
    groups: Vec<Group>,
}

impl Mesh {
    /// Decode a mesh from `reader` and upload its groups through `backend`.
    ///
    /// With `ram_copy`, each group keeps its vertex & index data after upload (see
    /// [Group::vertices]).
    ///
    /// # Errors
    ///
    /// * [`Parse`](Error::Parse) if the stream is malformed
    /// * [`Resource`](Error::Resource) if the backend refuses a buffer
    ///
    /// Either way, every buffer created during the load has been destroyed by the time this
    /// returns.
    #[tracing::instrument(skip_all, fields(ram_copy = ram_copy))]
    pub fn load<R, B>(reader: R, backend: &mut B, ram_copy: bool) -> Result<Self, Error>
    where
        R: Read + Seek,
        B: RenderBackend + ?Sized,
    {
        let mut mesh = Self::default();
        match mesh.read_groups(reader, backend, ram_copy) {
            Ok(()) => {
                tracing::info!(
                    groups = mesh.groups.len(),
                    vertices = mesh.num_vertices(),
                    indices = mesh.num_indices(),
                    "loaded mesh"
                );
                Ok(mesh)
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    groups = mesh.groups.len(),
                    "mesh load failed; releasing finished groups"
                );
                mesh.unload(backend);
                Err(error)
            }
        }
    }

    /// Open the file at `path` and [load](Self::load) a mesh from it.
    pub fn from_path<B: RenderBackend + ?Sized>(
        path: impl AsRef<Path>,
        backend: &mut B,
        ram_copy: bool,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening mesh");
        let file = File::open(path)?;
        Self::load(BufReader::new(file), backend, ram_copy)
    }

    fn read_groups<R, B>(&mut self, reader: R, backend: &mut B, ram_copy: bool) -> Result<(), Error>
    where
        R: Read + Seek,
        B: RenderBackend + ?Sized,
    {
        let mut chunks = ChunkReader::new(reader)?;
        // the group being read, and whether its indices have been read yet
        let mut open: Option<(Group, bool)> = None;
        while let Some(chunk) = chunks.next_chunk()? {
            match chunk {
                Chunk::VertexLayout(layout) => self.layout = layout,
                Chunk::Vertices { num_vertices, data } => {
                    if open.is_some() {
                        return Err(ParseError::RepeatedChunk(ChunkTag::VERTICES).into());
                    }
                    let mut group = Group::default();
                    group.set_vertices(num_vertices, data);
                    open = Some((group, false));
                }
                Chunk::Indices(indices) => match &mut open {
                    Some((_, true)) => {
                        return Err(ParseError::RepeatedChunk(ChunkTag::INDICES).into())
                    }
                    Some((group, seen)) => {
                        group.set_indices(indices);
                        *seen = true;
                    }
                    None => return Err(ParseError::OrphanChunk(ChunkTag::INDICES).into()),
                },
                Chunk::Primitives {
                    material,
                    primitives,
                } => {
                    let (mut group, _) = open
                        .take()
                        .ok_or(ParseError::OrphanChunk(ChunkTag::PRIMITIVES))?;
                    let index = self.groups.len();
                    group.set_primitives(material, primitives);
                    group.validate(index)?;
                    group.finalize(index, &self.layout, backend, ram_copy)?;
                    tracing::debug!(
                        group = index,
                        material = group.material(),
                        vertices = group.num_vertices(),
                        indices = group.num_indices(),
                        primitives = group.primitives().len(),
                        "finalized group"
                    );
                    self.groups.push(group);
                }
                Chunk::Unknown { tag, offset, .. } => {
                    return Err(ParseError::UnknownChunk { tag, offset }.into())
                }
            }
        }
        if open.is_some() {
            return Err(ParseError::UnterminatedGroup.into());
        }
        if chunks.layout().is_none() {
            return Err(ParseError::MissingLayout.into());
        }
        Ok(())
    }

    /// Destroy every group's GPU buffers and drop any ram copies.
    ///
    /// Does nothing to a mesh which is already unloaded.
    pub fn unload<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if self.groups.is_empty() {
            return;
        }
        tracing::debug!(groups = self.groups.len(), "unloading mesh");
        for group in &mut self.groups {
            group.release(backend);
        }
        self.groups.clear();
        self.layout = VertexLayout::default();
    }

    /// The layout shared by the vertices of every group.
    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// Groups, in stream order.
    #[inline]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Total vertices across every group.
    pub fn num_vertices(&self) -> usize {
        self.groups.iter().map(|g| g.num_vertices() as usize).sum()
    }

    /// Total indices across every group.
    pub fn num_indices(&self) -> usize {
        self.groups.iter().map(|g| g.num_indices() as usize).sum()
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        let resident = self.groups.iter().filter(|g| g.is_resident()).count();
        if resident > 0 {
            tracing::warn!(
                groups = resident,
                "mesh dropped while still loaded; its GPU buffers are leaked"
            );
        }
    }
}
