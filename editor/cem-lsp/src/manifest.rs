//! Custom Elements Manifest model
//!
//! Only the parts of the public manifest schema that completion and
//! documentation need are modelled. Unknown fields are ignored, so
//! manifests produced by any analyzer version deserialize.

use serde::Deserialize;

/// Top-level manifest document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// A JavaScript module in the manifest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// Any declaration; custom elements are the ones carrying a tag name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub custom_element: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

/// Type annotation as written in source
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TypeRef {
    #[serde(default)]
    pub text: String,
}

/// `deprecated` is either a flag or a reason
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Deprecation {
    Flag(bool),
    Reason(String),
}

impl Deprecation {
    pub fn is_deprecated(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Reason(_) => true,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Reason(reason) if !reason.is_empty() => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_ref: Option<TypeRef>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub deprecated: Option<Deprecation>,
}

impl Attribute {
    /// Declared type text, empty when undeclared
    pub fn type_text(&self) -> &str {
        self.type_ref.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }

    pub fn is_boolean(&self) -> bool {
        self.type_text().trim().eq_ignore_ascii_case("boolean")
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.as_ref().is_some_and(Deprecation::is_deprecated)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_ref: Option<TypeRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: Option<Deprecation>,
}

impl Event {
    pub fn type_text(&self) -> &str {
        self.type_ref.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.as_ref().is_some_and(Deprecation::is_deprecated)
    }
}

/// Slot; an empty name is the default slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Package {
    /// Parse a manifest document
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Custom-element declarations with their tag names
    pub fn custom_elements(&self) -> impl Iterator<Item = (&str, &Declaration)> {
        self.modules
            .iter()
            .flat_map(|module| module.declarations.iter())
            .filter_map(|decl| {
                decl.tag_name
                    .as_deref()
                    .filter(|tag| !tag.is_empty())
                    .map(|tag| (tag, decl))
            })
    }
}

/// Whether `name` has the shape of a custom element tag.
///
/// Lowercase, at least one hyphen, starting with an ASCII letter.
pub fn is_custom_element_tag(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };

    first.is_ascii_lowercase()
        && name.contains('-')
        && !name.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace())
}
