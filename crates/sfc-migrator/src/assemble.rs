//! Single-file component assembly.

use view_analyzer::{ComponentDescriptor, ScriptParts};

/// Props every migrated component declares.
const PROPS_DECLARATION: &str = "const props = defineProps({\n  phase: String,\n  outdatedHash: String,\n})\n";

/// Calls that replace the view's construction and first render.
const SETUP_CALLS: &str = "loadData(props);\n\nrender();\n";

/// Assemble the `.vue` text for one component.
///
/// The translated template is wrapped in the view's root element, and the
/// script parts go into a `<script setup>` block after the standard props
/// declaration. An empty scoped SCSS style block closes the file.
pub fn assemble(descriptor: &ComponentDescriptor, template: &str, script: &ScriptParts) -> String {
    let root = descriptor.root_tag();
    let mut sfc = String::with_capacity(template.len() + script.body.len() + 256);

    sfc.push_str("<template>\n");
    match descriptor.class_name.as_deref() {
        Some(class) => sfc.push_str(&format!("  <{root} class=\"{class}\">\n")),
        None => sfc.push_str(&format!("  <{root}>\n")),
    }
    sfc.push_str(template.trim_end_matches('\n'));
    sfc.push_str(&format!("\n  </{root}>\n</template>\n\n"));

    sfc.push_str("<script setup>\n");
    sfc.push_str(script.header.trim_end_matches('\n'));
    sfc.push_str("\n\n");
    sfc.push_str(PROPS_DECLARATION);
    sfc.push('\n');
    sfc.push_str(SETUP_CALLS);
    sfc.push('\n');
    sfc.push_str(script.body.trim_end_matches('\n'));
    sfc.push_str("\n</script>\n");

    sfc.push_str("<style lang=\"scss\" scoped>\n</style>\n");
    sfc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assemble_with_metadata() {
        let descriptor = ComponentDescriptor {
            tag_name: Some("li".into()),
            class_name: Some("row".into()),
            ..Default::default()
        };
        let script = ScriptParts {
            header: "import a from 'a';\n\n".into(),
            body: "  function render() {\n  }\n".into(),
        };
        let sfc = assemble(&descriptor, "<p>{{ a }}</p>\n", &script);
        assert_eq!(
            sfc,
            r#"<template>
  <li class="row">
<p>{{ a }}</p>
  </li>
</template>

<script setup>
import a from 'a';

const props = defineProps({
  phase: String,
  outdatedHash: String,
})

loadData(props);

render();

  function render() {
  }
</script>
<style lang="scss" scoped>
</style>
"#
        );
    }

    #[test]
    fn test_assemble_defaults() {
        let sfc = assemble(
            &ComponentDescriptor::default(),
            "",
            &ScriptParts::default(),
        );
        assert!(sfc.starts_with("<template>\n  <div>\n\n  </div>\n</template>\n"));
        assert!(sfc.contains("<script setup>\n\n\nconst props"));
        assert!(sfc.ends_with("render();\n\n\n</script>\n<style lang=\"scss\" scoped>\n</style>\n"));
    }
}
