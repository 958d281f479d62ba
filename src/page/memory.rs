use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::client::error::ActionError;
use crate::page::page_model::{Document, ElementStyle, Navigation, Navigator};

/// A page held in memory: element styles by id, plus everything the page
/// was asked to do (navigations, alerts).
///
/// Serializes to YAML so the CLI can act on a page file between runs:
///
/// ```yaml
/// url: /movies
/// elements:
///   edit-Inception:
///     visibility: hidden
///     display: none
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPage {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub elements: BTreeMap<String, ElementStyle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Navigation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<String>,
}

fn default_url() -> String {
    "/movies".to_string()
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self {
            url: default_url(),
            elements: BTreeMap::new(),
            history: Vec::new(),
            alerts: Vec::new(),
        }
    }
}

impl MemoryPage {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_element(mut self, id: &str, style: ElementStyle) -> Self {
        self.elements.insert(id.to_string(), style);
        self
    }

    pub fn last_navigation(&self) -> Option<&Navigation> {
        self.history.last()
    }

    /// Load a page from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ActionError> {
        let content = std::fs::read_to_string(path).map_err(|e| page_error(path, e))?;
        serde_yaml::from_str(&content).map_err(|e| page_error(path, e))
    }

    /// Write the page back as YAML.
    pub fn save(&self, path: &Path) -> Result<(), ActionError> {
        let yaml = serde_yaml::to_string(self).map_err(|e| page_error(path, e))?;
        std::fs::write(path, yaml).map_err(|e| page_error(path, e))
    }
}

fn page_error(path: &Path, err: impl std::fmt::Display) -> ActionError {
    ActionError::PageFile {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

impl Document for MemoryPage {
    fn style(&self, element_id: &str) -> Option<ElementStyle> {
        self.elements.get(element_id).cloned()
    }

    fn set_style(&mut self, element_id: &str, style: ElementStyle) -> Result<(), ActionError> {
        match self.elements.get_mut(element_id) {
            Some(current) => {
                *current = style;
                Ok(())
            }
            None => Err(ActionError::ElementNotFound(element_id.to_string())),
        }
    }
}

impl Navigator for MemoryPage {
    fn reload(&mut self) {
        self.history.push(Navigation::Reload);
    }

    fn redirect(&mut self, path: &str) {
        self.url = path.to_string();
        self.history.push(Navigation::Redirect(path.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
