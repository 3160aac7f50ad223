//! Analysis panel placement and segment selection.
//!
//! At most one segment per turn is selected. Its detail panel is rendered
//! inline, right after the last block whose source line overlaps the segment,
//! so the explanation sits directly beneath the highlighted text.

use crate::resolve::{ResolvedSegment, ResolvedSegmentList};
use crate::splice::{render, Block};

/// An entry in the final render sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderItem {
    Block(Block),
    /// Detail panel for the selected segment.
    Analysis(ResolvedSegment),
}

/// Inserts the analysis panel for `selected_id` into `blocks`.
///
/// Nothing is inserted when `selected_id` is `None`, names no resolved
/// segment, or no block overlaps the segment.
pub fn place_panel(
    blocks: Vec<Block>,
    resolved: &ResolvedSegmentList,
    selected_id: Option<&str>,
) -> Vec<RenderItem> {
    let selected = selected_id.and_then(|id| resolved.get(id));
    let anchor = selected.and_then(|seg| {
        blocks
            .iter()
            .rposition(|b| b.overlaps(seg.range.start, seg.range.end))
    });

    let mut items: Vec<RenderItem> = blocks.into_iter().map(RenderItem::Block).collect();
    if let (Some(seg), Some(index)) = (selected, anchor) {
        items.insert(index + 1, RenderItem::Analysis(seg.clone()));
    }
    items
}

/// Renders `answer` and places the analysis panel in one step.
pub fn render_with_panel(
    answer: &str,
    resolved: &ResolvedSegmentList,
    selected_id: Option<&str>,
) -> Vec<RenderItem> {
    place_panel(render(answer, resolved, selected_id), resolved, selected_id)
}

/// Selection after the user activates the highlight of `clicked`.
///
/// Activating the selected segment clears the selection; activating any other
/// segment replaces it.
pub fn toggle_selection(current: Option<&str>, clicked: &str) -> Option<String> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_clears_and_replaces() {
        assert_eq!(toggle_selection(None, "segment-0").as_deref(), Some("segment-0"));
        assert_eq!(toggle_selection(Some("segment-0"), "segment-0"), None);
        assert_eq!(
            toggle_selection(Some("segment-0"), "segment-1").as_deref(),
            Some("segment-1")
        );
    }
}
