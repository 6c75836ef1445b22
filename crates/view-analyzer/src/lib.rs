//! Backbone view class analysis.
//!
//! This crate reads the companion view class of a template and provides:
//! - Root element metadata (`tagName()` / `className()` accessors)
//! - The parsed `events()` map
//! - The class body rewritten for `<script setup>`

pub mod descriptor;
pub mod events;
pub mod metadata;
pub mod script;

pub use descriptor::{ComponentDescriptor, DEFAULT_ROOT_TAG};
pub use events::{parse_event_map, read_event_map, DomEvent, EventBinding, EventMap, Selector};
pub use metadata::{extract_metadata, ViewMetadata};
pub use script::{transform_script, ScriptParts};
