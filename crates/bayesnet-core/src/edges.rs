//! Derivation of descendant edges from ancestor declarations.

use std::collections::BTreeMap;

use crate::error::{NetworkError, NetworkResult};
use crate::event::VertexId;

/// Invert an ancestor map into a descendant map.
///
/// `b` appears in `result[a]` if and only if `a` appears in `ancestors[b]`.
/// Descendants are listed in the order their source vertices are iterated;
/// repeated ancestor entries contribute a single edge. Vertices without
/// descendants have no entry.
///
/// A vertex listing itself as its own ancestor makes the whole map invalid:
/// the call fails with [`NetworkError::InvalidInput`] and no partial result
/// is returned.
pub fn invert<'a, V, I, A>(ancestors: I) -> NetworkResult<BTreeMap<V, Vec<V>>>
where
    V: VertexId + 'a,
    I: IntoIterator<Item = (&'a V, A)>,
    A: IntoIterator<Item = &'a V>,
{
    let mut descendants: BTreeMap<V, Vec<V>> = BTreeMap::new();

    for (vertex, ancestor_list) in ancestors {
        for ancestor in ancestor_list {
            if ancestor == vertex {
                return Err(NetworkError::InvalidInput(format!(
                    "vertex {vertex:?} lists itself as an ancestor"
                )));
            }
            let entry = descendants.entry(ancestor.clone()).or_default();
            if !entry.contains(vertex) {
                entry.push(vertex.clone());
            }
        }
    }

    Ok(descendants)
}
