//! Tree rendering
//!
//! Turns flattened rows into display items for one of two modes:
//!
//! - **Inline**: the navigation/editing tree. Expansion comes from the persisted
//!   `ExpandedState`; items are draggable and carry their branch context so a drop
//!   knows which parent it is moving away from.
//! - **Picker**: the parent-selection checklist. Starts fully collapsed, every item
//!   has a checkbox, and the document being edited cannot be checked.

use serde::Serialize;
use std::collections::HashSet;

use super::{ExpandedState, TreeRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Inline,
    Picker,
}

/// Checkbox state of a picker item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Checkbox {
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub id: String,
    pub title: String,
    pub depth: usize,
    pub has_children: bool,
    /// Meaningful only when `has_children`
    pub expanded: bool,
    /// False when any ancestor on this branch is collapsed
    pub visible: bool,
    pub checkbox: Option<Checkbox>,
    pub draggable: bool,
    /// Parent this item is shown under; the source branch of a drag
    pub branch_parent_id: Option<String>,
}

/// Per-mode inputs for `render`
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub mode: RenderMode,
    /// Inline: persisted expansion. Picker: expansion toggled since the picker opened.
    pub expanded: &'a ExpandedState,
    /// Picker: ids to show checked
    pub checked_ids: &'a [String],
    /// Picker: document being edited; its checkbox is disabled
    pub editing_id: Option<&'a str>,
}

impl<'a> RenderOptions<'a> {
    pub fn inline(expanded: &'a ExpandedState) -> Self {
        Self {
            mode: RenderMode::Inline,
            expanded,
            checked_ids: &[],
            editing_id: None,
        }
    }

    pub fn picker(
        expanded: &'a ExpandedState,
        checked_ids: &'a [String],
        editing_id: Option<&'a str>,
    ) -> Self {
        Self {
            mode: RenderMode::Picker,
            expanded,
            checked_ids,
            editing_id,
        }
    }
}

/// Render pre-order rows into display items.
///
/// A row has children when the next row is deeper, so filtered views only offer
/// toggles for branches that still have rows.
pub fn render(rows: &[TreeRow], options: RenderOptions<'_>) -> Vec<TreeItem> {
    let checked: HashSet<&str> = options.checked_ids.iter().map(String::as_str).collect();
    let mut items = Vec::with_capacity(rows.len());
    // Depth of the shallowest collapsed ancestor on the current branch
    let mut hidden_below: Option<usize> = None;

    for (index, row) in rows.iter().enumerate() {
        let has_children = rows
            .get(index + 1)
            .is_some_and(|next| next.depth > row.depth);

        let visible = match hidden_below {
            Some(depth) if row.depth > depth => false,
            _ => {
                hidden_below = None;
                true
            }
        };

        let expanded = options.expanded.is_expanded(&row.id);
        if visible && has_children && !expanded {
            hidden_below = Some(row.depth);
        }

        let (checkbox, draggable) = match options.mode {
            RenderMode::Inline => (None, true),
            RenderMode::Picker => (
                Some(Checkbox {
                    checked: checked.contains(row.id.as_str()),
                    disabled: options.editing_id == Some(row.id.as_str()),
                }),
                false,
            ),
        };

        items.push(TreeItem {
            id: row.id.clone(),
            title: row.title.clone(),
            depth: row.depth,
            has_children,
            expanded,
            visible,
            checkbox,
            draggable,
            branch_parent_id: row.parent_id.clone(),
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::ForestState;
    use crate::models::Document;
    use crate::presentation::flatten;

    fn rows() -> Vec<TreeRow> {
        let forest = ForestState::build(vec![
            Document::new("a", "A", vec![]),
            Document::new("a1", "A1", vec!["a".into()]),
            Document::new("a1x", "A1x", vec!["a1".into()]),
            Document::new("b", "B", vec![]),
        ]);
        flatten(&forest).0
    }

    fn visible_ids(items: &[TreeItem]) -> Vec<&str> {
        items
            .iter()
            .filter(|i| i.visible)
            .map(|i| i.id.as_str())
            .collect()
    }

    #[test]
    fn test_inline_collapsed_by_default() {
        let expanded = ExpandedState::default();

        let items = render(&rows(), RenderOptions::inline(&expanded));

        assert_eq!(visible_ids(&items), vec!["a", "b"]);
        assert!(items[0].has_children);
        assert!(!items[3].has_children);
        assert!(items.iter().all(|i| i.draggable && i.checkbox.is_none()));
    }

    #[test]
    fn test_inline_expansion_reveals_one_level_at_a_time() {
        let mut expanded = ExpandedState::default();
        expanded.toggle("a");

        let items = render(&rows(), RenderOptions::inline(&expanded));
        assert_eq!(visible_ids(&items), vec!["a", "a1", "b"]);

        expanded.toggle("a1");
        let items = render(&rows(), RenderOptions::inline(&expanded));
        assert_eq!(visible_ids(&items), vec!["a", "a1", "a1x", "b"]);
    }

    #[test]
    fn test_expanded_child_under_collapsed_parent_stays_hidden() {
        let mut expanded = ExpandedState::default();
        expanded.toggle("a1");

        let items = render(&rows(), RenderOptions::inline(&expanded));

        assert_eq!(visible_ids(&items), vec!["a", "b"]);
    }

    #[test]
    fn test_picker_checkboxes() {
        let expanded = ExpandedState::default();
        let checked = vec!["b".to_string()];

        let items = render(&rows(), RenderOptions::picker(&expanded, &checked, Some("a")));

        assert_eq!(visible_ids(&items), vec!["a", "b"]);
        let a = &items[0];
        assert_eq!(
            a.checkbox,
            Some(Checkbox {
                checked: false,
                disabled: true
            })
        );
        let b = items.iter().find(|i| i.id == "b").unwrap();
        assert_eq!(
            b.checkbox,
            Some(Checkbox {
                checked: true,
                disabled: false
            })
        );
        assert!(items.iter().all(|i| !i.draggable));
    }

    #[test]
    fn test_branch_context_is_carried() {
        let expanded = ExpandedState::default();

        let items = render(&rows(), RenderOptions::inline(&expanded));

        assert_eq!(items[1].branch_parent_id.as_deref(), Some("a"));
        assert_eq!(items[0].branch_parent_id, None);
    }
}
