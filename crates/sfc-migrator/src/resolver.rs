//! Event binding resolution.
//!
//! Correlates the view's event map with elements of the translated template.
//! A binding whose selector matches is written onto the element as an inline
//! `@event="handler"` attribute, and its entry is deleted from the view
//! source. Bindings that cannot be placed leave both texts untouched.

use crate::tally::EventTally;
use regex::{Captures, Regex};
use tracing::debug;
use view_analyzer::{ComponentDescriptor, DomEvent, EventBinding, Selector};

/// What happened to one event map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOutcome {
    /// Inlined on the given number of elements and removed from the view.
    Applied { elements: usize },
    /// Inlined, but the entry is not on a line of its own and stays in the
    /// view, so the handler is registered twice.
    RegistrationKept { elements: usize },
    /// The event is outside the supported set.
    UnsupportedEvent,
    /// The selector is not a single class or id.
    UnsupportedSelector,
    /// No template element matches the selector.
    UnmatchedSelector,
}

impl BindingOutcome {
    /// Check if the binding was inlined.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. } | Self::RegistrationKept { .. })
    }
}

/// A binding together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingReport {
    pub binding: EventBinding,
    pub outcome: BindingOutcome,
}

/// Result of resolving a component's event bindings.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Template with inline event attributes added.
    pub template: String,
    /// View source with inlined registrations removed.
    pub companion: String,
    /// One report per descriptor binding, in declaration order.
    pub reports: Vec<BindingReport>,
    /// Every event name encountered.
    pub tally: EventTally,
}

/// Resolve the descriptor's bindings against a template and its view source.
pub fn resolve_event_bindings(
    template: &str,
    companion: &str,
    descriptor: &ComponentDescriptor,
) -> Resolution {
    let mut template = template.to_string();
    let mut companion = companion.to_string();
    let mut reports = Vec::with_capacity(descriptor.event_bindings.len());
    let mut tally = EventTally::new();

    for binding in &descriptor.event_bindings {
        tally.record(&binding.event_name);

        let outcome = match binding.dom_event() {
            None => BindingOutcome::UnsupportedEvent,
            Some(event) => match selector_pattern(&binding.selector) {
                None => BindingOutcome::UnsupportedSelector,
                Some(pattern) => {
                    let (rewritten, elements) =
                        bind_inline(&pattern, &template, event, &binding.handler_name);
                    if elements == 0 {
                        BindingOutcome::UnmatchedSelector
                    } else {
                        template = rewritten;
                        let updated = remove_registration(&companion, &binding.raw_text);
                        if updated == companion {
                            BindingOutcome::RegistrationKept { elements }
                        } else {
                            companion = updated;
                            BindingOutcome::Applied { elements }
                        }
                    }
                }
            },
        };

        debug!(
            event = %binding.event_name,
            selector = %binding.selector,
            handler = %binding.handler_name,
            ?outcome,
            "resolved event binding"
        );

        reports.push(BindingReport {
            binding: binding.clone(),
            outcome,
        });
    }

    Resolution {
        template,
        companion,
        reports,
        tally,
    }
}

/// Build the attribute matcher for a selector.
///
/// Classes match as a whole word anywhere in a `class="..."` value; ids match
/// an exact `id="..."`. The match covers the whole attribute.
fn selector_pattern(selector: &Selector) -> Option<Regex> {
    let pattern = match selector {
        Selector::Class(class) => format!(
            r#"\sclass="(?:[^"]*\s)?{}(?:\s[^"]*)?""#,
            regex::escape(class)
        ),
        Selector::Id(id) => format!(r#"\sid="{}""#, regex::escape(id)),
        Selector::Root | Selector::Complex(_) => return None,
    };
    Regex::new(&pattern).ok()
}

/// Append `@event="handler"` after every attribute the pattern matches.
fn bind_inline(pattern: &Regex, template: &str, event: DomEvent, handler: &str) -> (String, usize) {
    let mut elements = 0;
    let rewritten = pattern.replace_all(template, |caps: &Captures<'_>| {
        elements += 1;
        format!("{} @{}=\"{}\"", &caps[0], event, handler)
    });
    (rewritten.into_owned(), elements)
}

/// Delete an event map entry, with or without its trailing comma, ending
/// in either `\r\n` or `\n`.
fn remove_registration(companion: &str, raw_text: &str) -> String {
    ["\r\n", "\n"]
        .iter()
        .fold(companion.to_string(), |text, line_break| {
            text.replace(&format!("{},{}", raw_text, line_break), "")
                .replace(&format!("{}{}", raw_text, line_break), "")
        })
}
