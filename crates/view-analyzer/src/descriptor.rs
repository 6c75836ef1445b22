//! Per-component descriptor built from view source.

use crate::events::{read_event_map, EventBinding};
use crate::metadata::extract_metadata;

/// Root tag used when a view does not declare `tagName()`.
pub const DEFAULT_ROOT_TAG: &str = "div";

/// Everything the migration needs to know about a view class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// Declared root tag name.
    pub tag_name: Option<String>,
    /// Declared root class name.
    pub class_name: Option<String>,
    /// Event map entries, in declaration order.
    pub event_bindings: Vec<EventBinding>,
    /// The `events()` object could not be delimited.
    pub unterminated_event_map: bool,
}

impl ComponentDescriptor {
    /// Analyze view source.
    pub fn from_view_source(source: &str) -> Self {
        let metadata = extract_metadata(source);
        let event_map = read_event_map(source);
        Self {
            tag_name: metadata.tag_name,
            class_name: metadata.class_name,
            event_bindings: event_map.bindings,
            unterminated_event_map: event_map.unterminated,
        }
    }

    /// The root tag, falling back to [`DEFAULT_ROOT_TAG`].
    pub fn root_tag(&self) -> &str {
        self.tag_name.as_deref().unwrap_or(DEFAULT_ROOT_TAG)
    }

    /// Bindings whose event can be bound inline.
    pub fn supported_bindings(&self) -> impl Iterator<Item = &EventBinding> {
        self.event_bindings
            .iter()
            .filter(|binding| binding.dom_event().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Selector;

    #[test]
    fn test_empty_source() {
        let descriptor = ComponentDescriptor::from_view_source("");
        assert_eq!(descriptor, ComponentDescriptor::default());
        assert_eq!(descriptor.root_tag(), "div");
    }

    #[test]
    fn test_full_descriptor() {
        let source = r#"import baseVw from '../baseVw';

export default class extends baseVw {
  get tagName() {
    return 'li';
  }

  get className() {
    return 'couponRow';
  }

  events() {
    return {
      'click .js-remove': 'onRemove',
      'dblclick .js-edit': 'onEdit',
    };
  }
}
"#;
        let descriptor = ComponentDescriptor::from_view_source(source);
        assert_eq!(descriptor.root_tag(), "li");
        assert_eq!(descriptor.class_name.as_deref(), Some("couponRow"));
        assert_eq!(descriptor.event_bindings.len(), 2);

        let supported: Vec<_> = descriptor.supported_bindings().collect();
        assert_eq!(supported.len(), 1);
        assert_eq!(supported[0].selector, Selector::Class("js-remove".into()));
    }
}
