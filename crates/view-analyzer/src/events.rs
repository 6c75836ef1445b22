//! Event map parsing.
//!
//! A Backbone view declares its DOM listeners as an object returned from an
//! `events()` accessor:
//!
//! ```text
//! events() {
//!   return {
//!     'click .js-save': 'onSave',
//!     'keyup #search': 'onSearch',
//!   };
//! }
//! ```
//!
//! Each entry becomes an [`EventBinding`]. The exact source text of the entry
//! is kept so the registration can later be deleted verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

static EVENTS_ACCESSOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\n)[ \t]*(?:get\s*)?events\(\s*\)\s*\{\s*return\s*\{")
        .expect("valid events accessor pattern")
});

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"['"](\w+)(?:\s+([^'"]+?))?\s*['"]\s*:\s*['"]([\w$]+)['"]"#)
        .expect("valid event entry pattern")
});

/// DOM events that can be turned into inline `@event` bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    Click,
    Keydown,
    Keyup,
    Change,
    Focus,
    Mouseleave,
}

impl DomEvent {
    /// Every supported event.
    pub const ALL: [DomEvent; 6] = [
        Self::Click,
        Self::Keydown,
        Self::Keyup,
        Self::Change,
        Self::Focus,
        Self::Mouseleave,
    ];

    /// Look up a supported event by its DOM name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }

    /// Get the DOM event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Keydown => "keydown",
            Self::Keyup => "keyup",
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Mouseleave => "mouseleave",
        }
    }
}

impl fmt::Display for DomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The element part of an event map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `.token`, matched as a whole word inside `class="..."`.
    Class(String),
    /// `#token`, matched as `id="token"`.
    Id(String),
    /// No selector: the listener is on the view's root element.
    Root,
    /// Anything else (tag names, descendant or attribute selectors).
    Complex(String),
}

impl Selector {
    /// Classify a selector as written in the event map key.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::Root;
        }
        if let Some(id) = text.strip_prefix('#') {
            if is_token(id) {
                return Self::Id(id.to_string());
            }
        } else if let Some(class) = text.strip_prefix('.') {
            if is_token(class) {
                return Self::Class(class.to_string());
            }
        }
        Self::Complex(text.to_string())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => write!(f, ".{}", class),
            Self::Id(id) => write!(f, "#{}", id),
            Self::Root => write!(f, "(root)"),
            Self::Complex(text) => write!(f, "{}", text),
        }
    }
}

fn is_token(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// One entry of a view's event map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBinding {
    /// The entry exactly as it appears in the source.
    pub raw_text: String,
    /// The DOM event name, supported or not.
    pub event_name: String,
    /// The element the listener targets.
    pub selector: Selector,
    /// Name of the view method handling the event.
    pub handler_name: String,
}

impl EventBinding {
    /// The event, if it is one that can be bound inline.
    pub fn dom_event(&self) -> Option<DomEvent> {
        DomEvent::from_name(&self.event_name)
    }
}

/// The `events()` map of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMap {
    /// Entries in declaration order.
    pub bindings: Vec<EventBinding>,
    /// The accessor's object has no matching closing brace. Entries were
    /// then collected from the rest of the source.
    pub unterminated: bool,
}

/// Read the event map of a view.
///
/// A view without an `events()` accessor has an empty map. Comments inside
/// the object are skipped.
pub fn read_event_map(source: &str) -> EventMap {
    let Some(accessor) = EVENTS_ACCESSOR.find(source) else {
        return EventMap::default();
    };
    let rest = &source[accessor.end()..];
    let scan = scan_object(rest);
    let body = &rest[..scan.end.unwrap_or(rest.len())];

    EventMap {
        bindings: entries(body, &scan.comments),
        unterminated: scan.end.is_none(),
    }
}

/// Parse the event map entries of a view, in declaration order.
pub fn parse_event_map(source: &str) -> Vec<EventBinding> {
    read_event_map(source).bindings
}

fn entries(body: &str, comments: &[Range<usize>]) -> Vec<EventBinding> {
    let searchable = blank_ranges(body, comments);

    ENTRY
        .captures_iter(&searchable)
        .filter_map(|caps| {
            let raw = caps.get(0)?;
            Some(EventBinding {
                raw_text: body.get(raw.range())?.to_string(),
                event_name: caps.get(1)?.as_str().to_string(),
                selector: Selector::parse(caps.get(2).map(|m| m.as_str()).unwrap_or_default()),
                handler_name: caps.get(3)?.as_str().to_string(),
            })
        })
        .collect()
}

/// Replace the given byte ranges with spaces of the same length, so offsets
/// into the result are offsets into `text`.
fn blank_ranges<'a>(text: &'a str, ranges: &[Range<usize>]) -> Cow<'a, str> {
    if ranges.is_empty() {
        return Cow::Borrowed(text);
    }
    let mut blanked = String::with_capacity(text.len());
    let mut last = 0;
    for range in ranges {
        blanked.push_str(&text[last..range.start]);
        blanked.push_str(&" ".repeat(range.len()));
        last = range.end;
    }
    blanked.push_str(&text[last..]);
    Cow::Owned(blanked)
}

/// Result of scanning an object literal body.
struct ObjectScan {
    /// Offset of the matching closing brace.
    end: Option<usize>,
    /// Byte ranges of `//` and `/* */` comments.
    comments: Vec<Range<usize>>,
}

/// Scan an object literal whose opening brace comes right before `text`,
/// up to its matching closing brace. Braces inside strings and comments do
/// not count.
fn scan_object(text: &str) -> ObjectScan {
    let mut depth = 1usize;
    let mut comments = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let next = chars.peek().map(|&(_, next)| next);
        match c {
            '\'' | '"' | '`' => skip_string(&mut chars, c),
            '/' if next == Some('/') => {
                let end = chars
                    .find(|&(_, c)| c == '\n')
                    .map(|(i, _)| i)
                    .unwrap_or(text.len());
                comments.push(offset..end);
            }
            '/' if next == Some('*') => {
                chars.next();
                let mut end = text.len();
                let mut prev = '\0';
                for (i, c) in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        end = i + 1;
                        break;
                    }
                    prev = c;
                }
                comments.push(offset..end);
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return ObjectScan {
                        end: Some(offset),
                        comments,
                    };
                }
            }
            _ => {}
        }
    }

    ObjectScan {
        end: None,
        comments,
    }
}

fn skip_string(chars: &mut Peekable<CharIndices<'_>>, quote: char) {
    let mut escaped = false;
    for (_, c) in chars.by_ref() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: &str = r#"export default class extends baseVw {
  events() {
    return {
      'click .js-save': 'onSave',
      'keyup #searchInput': 'onSearch',
      'mouseenter .js-card': 'onHover',
      'click': 'onRootClick',
      'change input[type=radio]': 'onPick'
    };
  }
}
"#;

    #[test]
    fn test_parse_event_map() {
        let bindings = parse_event_map(VIEW);
        assert_eq!(bindings.len(), 5);

        assert_eq!(bindings[0].raw_text, "'click .js-save': 'onSave'");
        assert_eq!(bindings[0].event_name, "click");
        assert_eq!(bindings[0].selector, Selector::Class("js-save".into()));
        assert_eq!(bindings[0].handler_name, "onSave");

        assert_eq!(bindings[1].selector, Selector::Id("searchInput".into()));
        assert_eq!(bindings[2].dom_event(), None);
        assert_eq!(bindings[3].selector, Selector::Root);
        assert_eq!(
            bindings[4].selector,
            Selector::Complex("input[type=radio]".into())
        );
    }

    #[test]
    fn test_parse_event_map_snapshot() {
        let source = "  get events() {\n    return {\n      \"focus .js-name\": \"onFocus\",\n    };\n  }\n";
        insta::assert_debug_snapshot!(parse_event_map(source), @r###"
        [
            EventBinding {
                raw_text: "\"focus .js-name\": \"onFocus\"",
                event_name: "focus",
                selector: Class(
                    "js-name",
                ),
                handler_name: "onFocus",
            },
        ]
        "###);
    }

    #[test]
    fn test_no_event_map() {
        assert!(parse_event_map("export default class extends baseVw {}\n").is_empty());
    }

    #[test]
    fn test_unterminated_event_map() {
        let map = read_event_map("\n  events() {\n    return {\n      'click .a': 'b',\n");
        assert!(map.unterminated);
        assert_eq!(map.bindings.len(), 1);
        assert_eq!(map.bindings[0].handler_name, "b");
    }

    #[test]
    fn test_comments_in_event_map() {
        let source = "  events() {\n    return {\n      // don't forget\n      'click .a': 'onA',\n      /* 'click .b': 'onB', } */\n      'keyup .c': 'onC', // it's {\n    };\n  }\n  render() {\n    return 'x';\n  }\n";
        let map = read_event_map(source);
        assert!(!map.unterminated);
        let handlers: Vec<_> = map.bindings.iter().map(|b| b.handler_name.as_str()).collect();
        assert_eq!(handlers, ["onA", "onC"]);
        assert_eq!(map.bindings[1].raw_text, "'keyup .c': 'onC'");
    }

    #[test]
    fn test_scan_skips_braces_in_strings() {
        let text = " 'a}': 'b', nested: { c: 1 } } tail";
        let scan = scan_object(text);
        assert_eq!(scan.end.map(|end| &text[..end]), Some(" 'a}': 'b', nested: { c: 1 } "));
        assert!(scan.comments.is_empty());
    }

    #[test]
    fn test_no_accessor_is_not_unterminated() {
        assert_eq!(read_event_map("const a = { b: 1 };\n"), EventMap::default());
    }

    #[test]
    fn test_dom_event_allow_list() {
        for name in ["click", "keydown", "keyup", "change", "focus", "mouseleave"] {
            assert_eq!(DomEvent::from_name(name).map(|e| e.as_str()), Some(name));
        }
        assert_eq!(DomEvent::from_name("submit"), None);
        assert_eq!(DomEvent::from_name("Click"), None);
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!(Selector::parse(".js-btn"), Selector::Class("js-btn".into()));
        assert_eq!(Selector::parse(" #main "), Selector::Id("main".into()));
        assert_eq!(Selector::parse(""), Selector::Root);
        assert_eq!(Selector::parse("button"), Selector::Complex("button".into()));
        assert_eq!(Selector::parse(".a .b"), Selector::Complex(".a .b".into()));
        assert_eq!(Selector::parse("#"), Selector::Complex("#".into()));
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(Selector::Class("a".into()).to_string(), ".a");
        assert_eq!(Selector::Id("b".into()).to_string(), "#b");
        assert_eq!(Selector::Root.to_string(), "(root)");
    }
}
