use crate::{ProgramHandle, RenderState, TextureBinding, ViewId};

/// Most textures a single [MeshState] may bind.
pub const MAX_TEXTURES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MeshStateError {
    #[error("a mesh state binds at most {max} textures")]
    TooManyTextures { max: usize },
}

/// Everything needed to draw a mesh for one pass: program, textures, render state & view.
///
/// Built by the caller and only ever read by [Mesh::submit_passes](crate::Mesh::submit_passes).
///
/// ```
/// # use geode::{MeshState, ProgramHandle, RenderState, TextureBinding, TextureHandle, UniformHandle};
/// let shadow = MeshState::new(ProgramHandle::new(0), 0)
///     .with_state(RenderState::WRITE_Z | RenderState::DEPTH_TEST_LESS);
/// let color = MeshState::new(ProgramHandle::new(1), 1)
///     .with_texture(TextureBinding {
///         stage: 0,
///         sampler: UniformHandle::new(0),
///         texture: TextureHandle::new(0),
///         flags: 0,
///     })
///     .unwrap();
/// assert!(shadow.textures().is_empty());
/// assert_eq!(color.textures().len(), 1);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshState {
    /// Render state flags; [RenderState::all()] means [RenderState::DEFAULT].
    pub state: RenderState,
    pub program: ProgramHandle,
    pub view: ViewId,
    textures: [TextureBinding; MAX_TEXTURES],
    num_textures: u8,
}

impl MeshState {
    /// A state drawing with `program` into `view` under [RenderState::DEFAULT], binding no textures.
    pub fn new(program: ProgramHandle, view: ViewId) -> Self {
        Self {
            program,
            view,
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: RenderState) -> Self {
        self.state = state;
        self
    }

    pub fn with_texture(mut self, binding: TextureBinding) -> Result<Self, MeshStateError> {
        self.push_texture(binding)?;
        Ok(self)
    }

    /// Bind another texture.
    ///
    /// # Errors
    ///
    /// * [`TooManyTextures`](MeshStateError::TooManyTextures) if [MAX_TEXTURES] are already bound
    pub fn push_texture(&mut self, binding: TextureBinding) -> Result<(), MeshStateError> {
        let slot = self
            .textures
            .get_mut(self.num_textures as usize)
            .ok_or(MeshStateError::TooManyTextures { max: MAX_TEXTURES })?;
        *slot = binding;
        self.num_textures += 1;
        Ok(())
    }

    pub fn clear_textures(&mut self) {
        self.textures = Default::default();
        self.num_textures = 0;
    }

    /// The bound textures, in binding order.
    #[inline]
    pub fn textures(&self) -> &[TextureBinding] {
        &self.textures[..self.num_textures as usize]
    }

    /// The render state draws should use, with [RenderState::all()] standing in for
    /// [RenderState::DEFAULT].
    #[inline]
    pub fn render_state(&self) -> RenderState {
        resolve_state(self.state)
    }
}

/// Map the "use the default" sentinel, [RenderState::all()], to [RenderState::DEFAULT].
#[inline]
pub(crate) fn resolve_state(state: RenderState) -> RenderState {
    if state == RenderState::all() {
        RenderState::DEFAULT
    } else {
        state
    }
}
