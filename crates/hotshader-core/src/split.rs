//! Cutting a composite source into per-stage sections.

use tracing::debug;

use crate::stage::{StageKind, StageSlice};

/// Split a composite source at its stage markers.
///
/// For each [`StageKind`] the first occurrence of its keyword marks where that
/// stage's section begins (just past the keyword). A section runs until the
/// next marker's keyword starts, or to the end of the text. Slices come back
/// in the order their markers appear, which need not be the canonical stage
/// order. An empty vector means no marker was found.
///
/// Matching is purely textual: a keyword inside a comment or string literal
/// counts as a marker.
pub fn split_stages(source: &str) -> Vec<StageSlice<'_>> {
    let mut markers: Vec<(usize, StageKind)> = StageKind::ALL
        .iter()
        .filter_map(|&kind| {
            source
                .find(kind.keyword())
                .map(|pos| (pos + kind.keyword().len(), kind))
        })
        .collect();

    markers.sort_by_key(|&(start, _)| start);

    let slices: Vec<_> = markers
        .iter()
        .enumerate()
        .map(|(i, &(start, kind))| {
            let end = match markers.get(i + 1) {
                Some(&(next_start, next_kind)) => {
                    (next_start - next_kind.keyword().len()).max(start)
                }
                None => source.len(),
            };
            StageSlice {
                kind,
                source: &source[start..end],
            }
        })
        .collect();

    debug!(
        stages = ?slices.iter().map(|s| s.kind).collect::<Vec<_>>(),
        "split composite source"
    );

    slices
}
