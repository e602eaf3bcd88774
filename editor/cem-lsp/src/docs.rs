//! Markdown documentation for registry entries

use crate::manifest::{Attribute, Deprecation, Event, Slot};
use crate::registry::ComponentDefinition;

/// Element overview with its attributes, events and slots
pub fn element_markdown(definition: &ComponentDefinition) -> String {
    let mut content = format!("## `<{}>`\n\n", definition.tag_name);

    match definition.description.as_deref() {
        Some(description) => {
            content.push_str(description);
            content.push_str("\n\n");
        }
        None => content.push_str("**Custom Element**\n\n"),
    }

    if !definition.attributes.is_empty() {
        content.push_str("### Attributes\n\n");
        for attr in &definition.attributes {
            push_entry(
                &mut content,
                &attr.name,
                attr.type_text(),
                attr.description.as_deref(),
            );
        }
        content.push('\n');
    }

    if !definition.events.is_empty() {
        content.push_str("### Events\n\n");
        for event in &definition.events {
            push_entry(
                &mut content,
                &event.name,
                event.type_text(),
                event.description.as_deref(),
            );
        }
        content.push('\n');
    }

    if !definition.slots.is_empty() {
        content.push_str("### Slots\n\n");
        for slot in &definition.slots {
            push_entry(&mut content, slot_label(slot), "", slot.description.as_deref());
        }
        content.push('\n');
    }

    content
}

pub fn attribute_markdown(tag: &str, attr: &Attribute) -> String {
    let mut content = format!("## `{}` attribute\n\n", attr.name);
    content.push_str(&format!("**On `<{}>` element**\n\n", tag));

    let type_text = attr.type_text();
    if !type_text.is_empty() {
        content.push_str(&format!("**Type:** `{}`\n\n", type_text));
    }

    if let Some(description) = non_empty(attr.description.as_deref()) {
        content.push_str(description);
        content.push_str("\n\n");
    }

    if let Some(default) = non_empty(attr.default.as_deref()) {
        content.push_str(&format!("**Default:** `{}`\n\n", default));
    }

    push_deprecation(&mut content, attr.deprecated.as_ref());
    content
}

pub fn event_markdown(tag: &str, event: &Event) -> String {
    let mut content = format!("## `{}` event\n\n", event.name);
    content.push_str(&format!("**On `<{}>` element**\n\n", tag));

    let type_text = event.type_text();
    if !type_text.is_empty() {
        content.push_str(&format!("**Type:** `{}`\n\n", type_text));
    }

    if let Some(description) = non_empty(event.description.as_deref()) {
        content.push_str(description);
        content.push_str("\n\n");
    }

    push_deprecation(&mut content, event.deprecated.as_ref());
    content
}

pub fn slot_markdown(tag: &str, slot: &Slot) -> String {
    let mut content = format!("## `{}` slot\n\n", slot_label(slot));
    content.push_str(&format!("**On `<{}>` element**\n\n", tag));

    if let Some(description) = non_empty(slot.description.as_deref()) {
        content.push_str(description);
        content.push_str("\n\n");
    }

    content
}

/// Named slots of an element, for the `slot` attribute itself
pub fn slots_markdown(definition: &ComponentDefinition) -> String {
    let mut content = format!("## Slots of `<{}>`\n\n", definition.tag_name);
    for slot in definition.named_slots() {
        push_entry(&mut content, &slot.name, "", slot.description.as_deref());
    }
    content
}

fn push_entry(content: &mut String, name: &str, type_text: &str, description: Option<&str>) {
    content.push_str(&format!("- **`{}`**", name));
    if !type_text.is_empty() {
        content.push_str(&format!(" _{}_", type_text));
    }
    if let Some(description) = non_empty(description) {
        content.push_str(&format!(" - {}", description));
    }
    content.push('\n');
}

fn push_deprecation(content: &mut String, deprecated: Option<&Deprecation>) {
    let Some(deprecated) = deprecated.filter(|d| d.is_deprecated()) else {
        return;
    };

    match deprecated.reason() {
        Some(reason) => content.push_str(&format!("**Deprecated**: {}\n\n", reason)),
        None => content.push_str("**Deprecated**\n\n"),
    }
}

fn slot_label(slot: &Slot) -> &str {
    if slot.name.is_empty() {
        "(default)"
    } else {
        &slot.name
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completions::fixtures::test_snapshot;

    #[test]
    fn test_element_markdown() {
        let snapshot = test_snapshot();
        let md = element_markdown(snapshot.definition("my-button").unwrap());

        assert!(md.starts_with("## `<my-button>`\n\nA clickable button."));
        assert!(md.contains("### Attributes"));
        assert!(md.contains("- **`size`** _\"small\" | \"medium\" | \"large\"_ - Button size\n"));
        assert!(md.contains("### Events"));
        assert!(md.contains("- **`my-click`** _CustomEvent_ - Fired on click\n"));
        assert!(!md.contains("### Slots"));
    }

    #[test]
    fn test_element_markdown_without_description() {
        let snapshot = test_snapshot();
        let md = element_markdown(snapshot.definition("dialog-element").unwrap());

        assert!(md.contains("**Custom Element**"));
        assert!(md.contains("- **`(default)`**"));
        assert!(md.contains("- **`title`**"));
    }

    #[test]
    fn test_attribute_markdown() {
        let snapshot = test_snapshot();
        let def = snapshot.definition("my-button").unwrap();
        let md = attribute_markdown("my-button", def.attribute("size").unwrap());

        assert!(md.starts_with("## `size` attribute\n\n**On `<my-button>` element**"));
        assert!(md.contains("**Type:** `\"small\" | \"medium\" | \"large\"`"));
        assert!(md.contains("Button size"));
        assert!(md.contains("**Default:** `\"medium\"`"));
        assert!(!md.contains("Deprecated"));
    }

    #[test]
    fn test_deprecated_attribute_markdown() {
        let snapshot = test_snapshot();
        let def = snapshot.definition("my-custom-element").unwrap();
        let md = attribute_markdown("my-custom-element", def.attribute("legacy").unwrap());
        assert!(md.contains("**Deprecated**: Use color instead"));
    }

    #[test]
    fn test_event_markdown() {
        let snapshot = test_snapshot();
        let def = snapshot.definition("my-input").unwrap();
        let md = event_markdown("my-input", def.event("change").unwrap());

        assert!(md.starts_with("## `change` event"));
        assert!(md.contains("**Type:** `Event`"));
    }

    #[test]
    fn test_slot_markdown() {
        let snapshot = test_snapshot();
        let def = snapshot.definition("card-element").unwrap();

        let md = slot_markdown("card-element", def.slot("header").unwrap());
        assert!(md.starts_with("## `header` slot"));
        assert!(md.contains("Card header"));

        let md = slots_markdown(def);
        assert!(md.contains("- **`header`** - Card header\n"));
        assert!(md.contains("- **`actions`**\n"));
        assert!(!md.contains("(default)"));
    }
}
