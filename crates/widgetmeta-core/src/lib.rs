//! Widget meta-state core library.
//!
//! Holds the transient runtime state of every widget mounted on a page
//! (selection, open flags, pane positions, draft text) and the transitions
//! that keep it consistent with the evaluated data tree.

pub mod action;
pub mod merge;
pub mod path;
pub mod reducer;
pub mod state;
pub mod store;
pub mod widget;

pub use action::{ActionError, MetaAction, PageLoadKind, PanePosition};
pub use merge::deep_merge;
pub use path::{PathError, PathSegment, PropertyPath};
pub use reducer::reduce;
pub use state::{MetaState, WidgetId, WidgetMetaProps};
pub use store::{MetaStore, StoreConfig, SubscriptionId};
pub use widget::WidgetMeta;
