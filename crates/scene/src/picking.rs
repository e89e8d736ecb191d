use crate::path::PathGeometry;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    /// Index into the drawn path list.
    pub index: usize,
    /// Screen point that was tested.
    pub point: [f64; 2],
}

/// Hit-tests a screen point against paths in draw order.
///
/// Ordering contract:
/// - Paths are painted front to back in slice order, so the last path
///   containing the point is the one the user sees and wins.
/// - Empty (fully hidden) paths never hit.
pub fn pick_topmost<'a, I>(paths: I, point: [f64; 2]) -> Option<PickHit>
where
    I: IntoIterator<Item = &'a PathGeometry>,
{
    let mut hit = None;
    for (index, path) in paths.into_iter().enumerate() {
        if !path.is_empty() && path.contains(point) {
            hit = Some(PickHit { index, point });
        }
    }
    hit
}
