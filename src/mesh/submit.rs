use nalgebra::Matrix4;

use super::{resolve_state, Mesh, MeshState};
use crate::{Group, ProgramHandle, RenderBackend, RenderState, ViewId};

impl Mesh {
    /// Draw every group with one program, transform & render state.
    ///
    /// `state` of [RenderState::all()] draws with [RenderState::DEFAULT]. Groups without indices
    /// or buffers are skipped, as is everything when `program` is invalid.
    ///
    /// Returns the number of draw calls issued.
    pub fn submit<B: RenderBackend + ?Sized>(
        &self,
        backend: &mut B,
        view: ViewId,
        program: ProgramHandle,
        transform: &Matrix4<f32>,
        state: RenderState,
    ) -> usize {
        if !program.is_valid() {
            tracing::trace!(view, "skipping submit without a program");
            return 0;
        }
        let state = resolve_state(state);
        let mut draws = 0;
        for group in self.drawable_groups() {
            bind_buffers(backend, group, 0, group.num_indices());
            backend.set_transform(transform);
            backend.set_state(state);
            backend.submit(view, program);
            draws += 1;
        }
        draws
    }

    /// Draw a single primitive of one group, with one program, transform & render state.
    ///
    /// Only the primitive's index range is drawn. `state` is treated as in [submit](Self::submit).
    /// Nothing is drawn if `program` is invalid, either index is out of range, the group has no
    /// buffers, or the primitive has no indices.
    ///
    /// Returns whether a draw call was issued.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_primitive<B: RenderBackend + ?Sized>(
        &self,
        backend: &mut B,
        group: usize,
        primitive: usize,
        view: ViewId,
        program: ProgramHandle,
        transform: &Matrix4<f32>,
        state: RenderState,
    ) -> bool {
        if !program.is_valid() {
            tracing::trace!(view, "skipping submit without a program");
            return false;
        }
        let Some(g) = self.groups.get(group).filter(|g| g.is_drawable()) else {
            tracing::trace!(group, "skipping group with nothing to draw");
            return false;
        };
        let Some(prim) = g.primitives().get(primitive).filter(|p| p.num_indices() > 0) else {
            tracing::trace!(group, primitive, "skipping primitive with nothing to draw");
            return false;
        };
        bind_buffers(backend, g, prim.start_index(), prim.num_indices());
        backend.set_transform(transform);
        backend.set_state(resolve_state(state));
        backend.submit(view, program);
        true
    }

    /// Draw every group once per pass and once per transform.
    ///
    /// Passes are applied in order; within each, groups are drawn in order, each once per entry of
    /// `transforms`. An empty `transforms` draws each group once with the identity transform.
    /// Passes with an invalid program are skipped, as are groups without indices or buffers.
    ///
    /// Returns the number of draw calls issued: at most
    /// `states.len() * groups * max(1, transforms.len())`.
    pub fn submit_passes<B: RenderBackend + ?Sized>(
        &self,
        backend: &mut B,
        states: &[&MeshState],
        transforms: &[Matrix4<f32>],
    ) -> usize {
        let identity = [Matrix4::identity()];
        let transforms = match transforms {
            [] => &identity[..],
            t => t,
        };
        let mut draws = 0;
        for (pass, mesh_state) in states.iter().enumerate() {
            if !mesh_state.program.is_valid() {
                tracing::trace!(pass, "skipping pass without a program");
                continue;
            }
            let state = mesh_state.render_state();
            for group in self.drawable_groups() {
                for transform in transforms {
                    bind_buffers(backend, group, 0, group.num_indices());
                    backend.set_transform(transform);
                    for binding in mesh_state.textures() {
                        backend.set_texture(binding);
                    }
                    backend.set_state(state);
                    backend.submit(mesh_state.view, mesh_state.program);
                    draws += 1;
                }
            }
        }
        draws
    }

    fn drawable_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups
            .iter()
            .enumerate()
            .filter_map(|(i, group)| {
                if group.is_drawable() {
                    Some(group)
                } else {
                    tracing::trace!(group = i, "skipping group with nothing to draw");
                    None
                }
            })
    }
}

fn bind_buffers<B: RenderBackend + ?Sized>(
    backend: &mut B,
    group: &Group,
    first_index: u32,
    num_indices: u32,
) {
    backend.set_vertex_buffer(0, group.vertex_buffer());
    backend.set_index_buffer(group.index_buffer(), first_index, num_indices);
}
