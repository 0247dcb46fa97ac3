/// Repeat an [item](https://doc.rust-lang.org/nightly/reference/items.html) once for each type in
/// a list, with the current type aliased as `$Alias` inside the item.
///
/// Prefer a blanket impl over this where one is possible.
///
/// ```
/// trait Half {
///     fn half(self) -> Self;
/// }
///
/// geode_common::item_with! {Real: f32, f64 => impl Half for Real {
///     fn half(self) -> Self {
///         self / 2.0
///     }
/// }}
///
/// assert_eq!(3.0f32.half(), 1.5);
/// assert_eq!(3.0f64.half(), 1.5);
/// ```
#[macro_export]
macro_rules! item_with {
    {$Alias:ident: $($Ty:ty),+ $(,)? => $item:item} => {
        $(
            const _: () = {
                type $Alias = $Ty;
                $item
            };
        )+
    };
}
