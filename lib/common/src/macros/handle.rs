/// Declare opaque 16-bit GPU resource handle types.
///
/// Each generated type is a `#[repr(transparent)]` wrapper around a `u16` slot index, with
/// `u16::MAX` reserved as the `INVALID` sentinel. The [Default] value of a handle is `INVALID`,
/// so freshly-constructed containers never refer to a live resource.
///
/// ```
/// geode_common::define_handle! {
///     /// A buffer.
///     BufferHandle
/// }
///
/// assert!(!BufferHandle::default().is_valid());
/// assert!(BufferHandle::new(3).is_valid());
/// ```
#[macro_export]
macro_rules! define_handle {
    {$($(#[$meta:meta])* $Name:ident),+ $(,)?} => {
        $(
            $(#[$meta])*
            #[repr(transparent)]
            #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $Name(u16);

            impl $Name {
                /// The handle which refers to nothing.
                pub const INVALID: Self = Self(u16::MAX);

                #[inline]
                pub const fn new(index: u16) -> Self {
                    Self(index)
                }

                /// The slot index of this handle.
                #[inline]
                pub const fn index(self) -> u16 {
                    self.0
                }

                #[inline]
                pub const fn is_valid(self) -> bool {
                    self.0 != u16::MAX
                }
            }

            impl Default for $Name {
                #[inline]
                fn default() -> Self {
                    Self::INVALID
                }
            }

            impl std::fmt::Display for $Name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    if self.is_valid() {
                        write!(f, "{}({})", stringify!($Name), self.0)
                    } else {
                        write!(f, "{}(invalid)", stringify!($Name))
                    }
                }
            }
        )+
    };
}
