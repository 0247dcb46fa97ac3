geode_common::define_handle! {
    /// A GPU vertex buffer.
    VertexBufferHandle,
    /// A GPU index buffer.
    IndexBufferHandle,
    /// A linked shader program.
    ProgramHandle,
    /// A GPU texture.
    TextureHandle,
    /// A shader uniform (e.g. a sampler).
    UniformHandle,
}
