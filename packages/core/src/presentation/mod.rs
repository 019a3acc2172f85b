//! Tree Presentation
//!
//! Display-ready views of the forest: pre-order rows, the substring filter used by
//! the parent picker, inline/picker rendering and the persisted expand/collapse set.
//! Nothing here touches the document store.

mod expanded;
mod render;
mod tree;

pub use expanded::{ExpandedState, EXPANDED_STATE_KEY};
pub use render::{render, Checkbox, RenderMode, RenderOptions, TreeItem};
pub use tree::{filter, flatten, TreeRow};
