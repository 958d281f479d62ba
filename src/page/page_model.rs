use serde::{Deserialize, Serialize};

use crate::client::error::ActionError;

/// CSS `visibility` of an element. An element with no explicit value is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// CSS `display` of an element, read and written as its plain CSS value
/// (`""` for unset).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Display {
    #[default]
    Unset,
    None,
    Contents,
    Other(String),
}

impl Display {
    pub fn as_css(&self) -> &str {
        match self {
            Display::Unset => "",
            Display::None => "none",
            Display::Contents => "contents",
            Display::Other(value) => value,
        }
    }
}

impl From<String> for Display {
    fn from(value: String) -> Self {
        match value.trim() {
            "" => Display::Unset,
            "none" => Display::None,
            "contents" => Display::Contents,
            other => Display::Other(other.to_string()),
        }
    }
}

impl From<Display> for String {
    fn from(display: Display) -> Self {
        match display {
            Display::Other(value) => value,
            known => known.as_css().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementStyle {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub display: Display,
}

impl ElementStyle {
    pub fn hidden() -> Self {
        Self {
            visibility: Visibility::Hidden,
            display: Display::Unset,
        }
    }

    /// Hidden and removed from layout.
    pub fn collapsed() -> Self {
        Self {
            visibility: Visibility::Hidden,
            display: Display::None,
        }
    }
}

/// Where the page went after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum Navigation {
    Reload,
    Redirect(String),
}

/// Element lookup and style mutation, the part of the hosting page the
/// toggle action needs.
pub trait Document {
    /// Current style of the element, or `None` when no element has this id.
    fn style(&self, element_id: &str) -> Option<ElementStyle>;

    fn set_style(&mut self, element_id: &str, style: ElementStyle) -> Result<(), ActionError>;
}

/// Navigation primitives of the hosting page.
pub trait Navigator {
    fn reload(&mut self);

    fn redirect(&mut self, path: &str);

    /// Blocking user-visible message.
    fn alert(&mut self, message: &str);

    fn navigate(&mut self, navigation: &Navigation) {
        match navigation {
            Navigation::Reload => self.reload(),
            Navigation::Redirect(path) => self.redirect(path),
        }
    }
}

pub trait Page: Document + Navigator {}

impl<T: Document + Navigator> Page for T {}
