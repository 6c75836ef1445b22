//! Scriptlet template to Vue template translation.
//!
//! This crate rewrites templates written with `<% %>` scriptlets into Vue
//! template syntax. The translation is an ordered cascade of flat rewrite
//! rules. Value-level rules run first and consume every `<%=` marker; the
//! structural rules then turn branch and loop scriptlets into container
//! elements. Rule order is part of the contract: changing it changes the
//! output.
//!
//! Nesting is not tracked, and running the translator on its own output is
//! not supported.

pub mod attribute;
pub mod block;
pub mod rule;

pub use rule::{Rule, RuleId, RulePhase};

/// The rewrite cascade, in application order.
pub static CASCADE: [&Rule; 17] = [
    &attribute::PLAIN_ATTRIBUTE_BINDING,
    &attribute::MIXED_ATTRIBUTE_BINDING,
    &attribute::CONDITIONAL_BOOLEAN_ATTRIBUTE,
    &attribute::CONDITIONAL_VISIBILITY,
    &attribute::CONDITIONAL_CLASS_BINDING,
    &attribute::BARE_ATTRIBUTE_BINDING,
    &attribute::MUSTACHE_INTERPOLATION,
    &block::IF_BLOCK_OPEN,
    &block::ELSE_IF_BLOCK,
    &block::ELSE_BLOCK,
    &block::BLOCK_CLOSE_LINE_END,
    &block::BLOCK_CLOSE_END_OF_TEXT,
    &block::LOOP_BLOCK_OPEN,
    &block::LOOP_BLOCK_OPEN_BARE,
    &block::LOOP_BLOCK_OPEN_INDEXED,
    &block::LOOP_CLOSE_LINE_END,
    &block::LOOP_CLOSE_END_OF_TEXT,
];

/// Result of translating a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    /// The translated template text.
    pub code: String,
    /// Rules that matched at least once, in application order.
    pub hits: Vec<RuleHit>,
}

/// How often a rule matched during a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleHit {
    pub rule: RuleId,
    pub count: usize,
}

impl Translation {
    /// Total number of rewrites performed.
    pub fn total_rewrites(&self) -> usize {
        self.hits.iter().map(|h| h.count).sum()
    }

    /// Number of rewrites performed by one rule.
    pub fn count(&self, rule: RuleId) -> usize {
        self.hits
            .iter()
            .find(|h| h.rule == rule)
            .map(|h| h.count)
            .unwrap_or(0)
    }
}

/// Translate a scriptlet template into Vue template syntax.
///
/// Rules work on `\n` line breaks. A template using `\r\n` is translated in
/// `\n` form and every line break of the result is written back as `\r\n`.
pub fn translate(source: &str) -> Translation {
    let crlf = source.contains("\r\n");
    let mut code = if crlf {
        source.replace("\r\n", "\n")
    } else {
        source.to_string()
    };
    let mut hits = Vec::new();

    for rule in CASCADE {
        let (rewritten, count) = rule.apply(&code);
        if count > 0 {
            code = rewritten.into_owned();
            hits.push(RuleHit {
                rule: rule.id(),
                count,
            });
        }
    }

    if crlf {
        code = code.replace('\n', "\r\n");
    }

    Translation { code, hits }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn translate_str(source: &str) -> String {
        translate(source).code
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(translate_str("<%= user.name %>"), "{{ user.name }}");
    }

    #[test]
    fn test_boolean_attribute() {
        assert_eq!(
            translate_str("<option <% if (cur === ob.cur) print('selected'); %>>"),
            r#"<option :selected="cur === ob.cur">"#
        );
    }

    #[test]
    fn test_visibility() {
        assert_eq!(
            translate_str("<div <% if (hidden) print('hide'); %>>"),
            r#"<div :hidden="hidden">"#
        );
    }

    #[test]
    fn test_if_else_close() {
        let source = "  <% if (a) { %>\n    <p>A</p>\n  <% } else { %>\n    <p>B</p>\n  <% } %>\n";
        let expected =
            "  <div v-if=\"a\">\n    <p>A</p>\n  </div>\n  <div v-else>\n    <p>B</p>\n  </div>\n";
        assert_eq!(translate_str(source), expected);
    }

    #[test]
    fn test_crlf_line_breaks_are_kept() {
        let source = "<% if (a) { %>\r\n  <p>A</p>\r\n<% } else { %>\r\n  <p>B</p>\r\n<% } %>\r\n";
        assert_eq!(
            translate_str(source),
            "<div v-if=\"a\">\r\n  <p>A</p>\r\n</div>\r\n<div v-else>\r\n  <p>B</p>\r\n</div>\r\n"
        );
    }

    #[test]
    fn test_if_else_if_chain() {
        let source = "<% if (a) { %>\n<p>A</p>\n<% } else if (b) { %>\n<p>B</p>\n<% } %>";
        let expected = "<div v-if=\"a\">\n<p>A</p>\n</div>\n<div v-else-if=\"b\">\n<p>B</p>\n</div>\n";
        assert_eq!(translate_str(source), expected);
    }

    #[test]
    fn test_single_param_loop() {
        let source = "<ul>\n  <% items.forEach((item) => { %>\n    <li><%= item.label %></li>\n  <% }); %>\n</ul>\n";
        let expected = "<ul>\n  <div v-for=\"(item, j) in items\" :key=\"j\">\n    <li>{{ item.label }}</li>\n  </div>\n</ul>\n";
        assert_eq!(translate_str(source), expected);
    }

    #[test]
    fn test_value_rules_run_before_interpolation() {
        let source = r#"<a class="<%= ob.cls %>" href="/u/<%= ob.id %>"><%= ob.name %></a>"#;
        assert_eq!(
            translate_str(source),
            r#"<a :class="ob.cls" :href="`/u/${ob.id}`">{{ ob.name }}</a>"#
        );
    }

    #[test]
    fn test_hits_are_recorded() {
        let translation = translate("<% if (a) { %>\n<%= a %> <%= b %>\n<% } %>\n");
        assert_eq!(translation.count(RuleId::Interpolation), 2);
        assert_eq!(translation.count(RuleId::IfOpen), 1);
        assert_eq!(translation.count(RuleId::BlockCloseLineEnd), 1);
        assert_eq!(translation.count(RuleId::ElseIf), 0);
        assert_eq!(translation.total_rewrites(), 4);
    }

    #[test]
    fn test_hits_snapshot() {
        let translation = translate("<% rows.forEach(row => { %>\n  <td><%= row %></td>\n<% }); %>");
        insta::assert_debug_snapshot!(translation.hits, @r###"
        [
            RuleHit {
                rule: Interpolation,
                count: 1,
            },
            RuleHit {
                rule: LoopOpenBare,
                count: 1,
            },
            RuleHit {
                rule: LoopCloseEndOfText,
                count: 1,
            },
        ]
        "###);
    }

    #[test]
    fn test_plain_text_is_identity() {
        let source = "<div class=\"card\">\n  <p>No scriptlets here.</p>\n</div>\n";
        for rule in CASCADE {
            let (text, count) = rule.apply(source);
            assert_eq!(count, 0, "rule {} matched plain text", rule.id());
            assert_eq!(text, source);
        }
        let translation = translate(source);
        assert_eq!(translation.code, source);
        assert!(translation.hits.is_empty());
    }

    #[test]
    fn test_cascade_order() {
        let ids: Vec<RuleId> = CASCADE.iter().map(|r| r.id()).collect();
        let value_end = ids
            .iter()
            .position(|id| id.phase() == RulePhase::Structure)
            .unwrap();
        assert_eq!(ids[value_end - 1], RuleId::Interpolation);
        assert!(ids[value_end..]
            .iter()
            .all(|id| id.phase() == RulePhase::Structure));
    }
}
