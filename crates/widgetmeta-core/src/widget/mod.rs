//! Widget-side view of the meta-state store.
//!
//! Widget instances never see the whole store: they read and write their
//! own entry through a [`WidgetMeta`] bound to their id.

mod meta;

pub use meta::WidgetMeta;
