//! End-to-end completion tests against fixture manifests

use cem_lsp::{
    CompletionEngine, CompletionResult, ComponentRegistry, ContextKind, Document, ResolveKind,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower_lsp::lsp_types::Url;

const MANIFEST: &str = r#"{
  "schemaVersion": "2.1.0",
  "modules": [
    {
      "kind": "javascript-module",
      "path": "src/components.js",
      "declarations": [
        {
          "kind": "class",
          "name": "MyButton",
          "customElement": true,
          "tagName": "my-button",
          "description": "A clickable button.",
          "attributes": [
            { "name": "size", "type": { "text": "'small' | 'medium' | 'large'" }, "default": "'medium'" },
            { "name": "disabled", "type": { "text": "boolean" } }
          ],
          "events": [
            { "name": "my-click", "type": { "text": "CustomEvent" }, "description": "Fired on click" }
          ]
        },
        {
          "kind": "class",
          "name": "MyCard",
          "customElement": true,
          "tagName": "my-card",
          "slots": [
            { "name": "", "description": "Body" },
            { "name": "header" },
            { "name": "footer" },
            { "name": "actions" }
          ]
        },
        {
          "kind": "class",
          "name": "MyChip",
          "customElement": true,
          "tagName": "my-chip"
        },
        {
          "kind": "function",
          "name": "helper"
        }
      ]
    }
  ]
}"#;

fn setup_engine() -> (TempDir, CompletionEngine) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom-elements.json");
    fs::write(&path, MANIFEST).unwrap();

    let registry = Arc::new(ComponentRegistry::new());
    assert_eq!(registry.load_file(&path).unwrap(), 3);

    (dir, CompletionEngine::new(registry, 200))
}

/// Complete at the `|` marker
fn complete(engine: &CompletionEngine, name: &str, marked: &str) -> CompletionResult {
    complete_with_trigger(engine, name, marked, None)
}

fn complete_with_trigger(
    engine: &CompletionEngine,
    name: &str,
    marked: &str,
    trigger: Option<&str>,
) -> CompletionResult {
    let offset = marked.find('|').unwrap();
    let text = marked.replacen('|', "", 1);
    let before = &text[..offset];
    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    let character = before[line_start..].encode_utf16().count() as u32;

    let uri = Url::parse(&format!("file:///workspace/{}", name)).unwrap();
    let document = Document::new(uri, text.clone(), 1);
    engine.complete(&document, line, character, trigger)
}

fn labels(result: &CompletionResult) -> Vec<&str> {
    result.items.iter().map(|item| item.label.as_str()).collect()
}

#[test]
fn test_tag_name_prefix() {
    let (_dir, engine) = setup_engine();
    let result = complete(&engine, "index.html", "<body>\n  <my-c|\n</body>");

    assert_eq!(result.analysis.kind, ContextKind::TagName);
    assert_eq!(labels(&result), vec!["my-card", "my-chip"]);
    assert!(result.items.iter().all(|item| item.replaces_prefix));
}

#[test]
fn test_tag_name_after_trigger() {
    let (_dir, engine) = setup_engine();
    let result = complete_with_trigger(&engine, "index.html", "<div><|</div>", Some("<"));

    assert_eq!(result.analysis.kind, ContextKind::TagName);
    assert_eq!(labels(&result), vec!["my-button", "my-card", "my-chip"]);
}

#[test]
fn test_attribute_names() {
    let (_dir, engine) = setup_engine();
    let result = complete(&engine, "index.html", "<my-button |></my-button>");

    assert_eq!(result.analysis.kind, ContextKind::AttributeName);
    assert_eq!(labels(&result), vec!["disabled", "size"]);
}

#[test]
fn test_attribute_values_from_union_and_default() {
    let (_dir, engine) = setup_engine();
    let result = complete(&engine, "index.html", r#"<my-button size="|"></my-button>"#);

    assert_eq!(result.analysis.kind, ContextKind::AttributeValue);
    assert_eq!(
        labels(&result),
        vec!["medium (default)", "large", "medium", "small"]
    );
}

#[test]
fn test_slot_attribute_inside_slotted_parent() {
    let (_dir, engine) = setup_engine();

    let result = complete(&engine, "index.html", "<my-card>\n  <button |\n</my-card>");
    assert_eq!(labels(&result), vec!["slot"]);

    let result = complete(&engine, "index.html", "<my-card>\n  <button slot=\"|\n</my-card>");
    assert_eq!(labels(&result), vec!["actions", "footer", "header"]);
    assert!(result
        .items
        .iter()
        .all(|item| item.resolve.as_ref().unwrap().kind == ResolveKind::Slot));
}

#[test]
fn test_slot_values_outside_slotted_parent() {
    let (_dir, engine) = setup_engine();

    let result = complete(&engine, "index.html", "<div>\n  <button slot=\"|\n</div>");
    assert_eq!(result.analysis.kind, ContextKind::AttributeValue);
    assert!(result.items.is_empty());

    let result = complete(&engine, "index.html", "<my-chip>\n  <button slot=\"|\n</my-chip>");
    assert!(result.items.is_empty());
}

#[test]
fn test_event_binding_in_tagged_template() {
    let (_dir, engine) = setup_engine();
    let result = complete(
        &engine,
        "button.ts",
        "render() {\n  return html`<my-button @my|></my-button>`;\n}",
    );

    assert_eq!(result.analysis.kind, ContextKind::EventBinding);
    assert_eq!(labels(&result), vec!["@my-click"]);
    assert_eq!(result.items[0].text_to_insert(), "my-click");
}

#[test]
fn test_sigil_in_markup_sink_is_attribute_name() {
    let (_dir, engine) = setup_engine();
    let result = complete(
        &engine,
        "button.ts",
        "el.innerHTML = `<my-button @my|></my-button>`;",
    );

    assert_eq!(result.analysis.kind, ContextKind::AttributeName);
    assert!(result.items.is_empty());
}

#[test]
fn test_boolean_binding() {
    let (_dir, engine) = setup_engine();
    let result = complete(&engine, "button.js", "html`<my-button ?|></my-button>`");

    assert_eq!(result.analysis.kind, ContextKind::BooleanAttributeBinding);
    assert_eq!(labels(&result), vec!["?disabled"]);
}

#[test]
fn test_no_completions_in_plain_text() {
    let (_dir, engine) = setup_engine();
    let result = complete(&engine, "index.html", "<p>hello wor|ld</p>");

    assert_eq!(result.analysis.kind, ContextKind::Unknown);
    assert!(result.items.is_empty());
}

#[test]
fn test_resolve_documentation() {
    let (_dir, engine) = setup_engine();
    let result = complete(&engine, "index.html", "<my-button |></my-button>");

    let size = result
        .items
        .iter()
        .find(|item| item.label == "size")
        .cloned()
        .unwrap();
    assert!(size.documentation.is_none());

    let resolved = engine.resolve(size);
    let doc = resolved.documentation.unwrap();
    assert!(doc.contains("## `size` attribute"));
    assert!(doc.contains("**Default:** `'medium'`"));
}
