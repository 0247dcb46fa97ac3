bitflags::bitflags! {
    /// Fixed-function render state applied to a draw.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderState: u64 {
        const WRITE_R = 1 << 0;
        const WRITE_G = 1 << 1;
        const WRITE_B = 1 << 2;
        const WRITE_A = 1 << 3;
        const WRITE_Z = 1 << 4;
        const WRITE_RGB = Self::WRITE_R.bits() | Self::WRITE_G.bits() | Self::WRITE_B.bits();

        const DEPTH_TEST_LESS = 1 << 8;
        const DEPTH_TEST_LEQUAL = 1 << 9;
        const DEPTH_TEST_EQUAL = 1 << 10;
        const DEPTH_TEST_ALWAYS = 1 << 11;

        const CULL_CW = 1 << 16;
        const CULL_CCW = 1 << 17;

        const BLEND_ALPHA = 1 << 20;
        const BLEND_ADD = 1 << 21;

        const MSAA = 1 << 24;
    }
}

impl RenderState {
    /// Opaque geometry: color & depth writes, less-than depth test, counter-clockwise culling,
    /// multisampling.
    pub const DEFAULT: Self = Self::WRITE_RGB
        .union(Self::WRITE_A)
        .union(Self::WRITE_Z)
        .union(Self::DEPTH_TEST_LESS)
        .union(Self::CULL_CCW)
        .union(Self::MSAA);
}

impl Default for RenderState {
    fn default() -> Self {
        Self::DEFAULT
    }
}
