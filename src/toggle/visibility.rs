use serde::{Deserialize, Serialize};

use crate::client::error::ActionError;
use crate::page::page_model::{Display, Document, ElementStyle, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ToggleMode {
    /// Flip `visibility` only; layout is left alone.
    #[default]
    Visibility,
    /// Flip `visibility` and move `display` between `none` and `contents`.
    Layout,
}

/// Whether the element currently counts as hidden under `mode`.
pub fn is_hidden(style: &ElementStyle, mode: ToggleMode) -> bool {
    match mode {
        ToggleMode::Visibility => style.visibility == Visibility::Hidden,
        ToggleMode::Layout => {
            style.visibility == Visibility::Hidden || style.display == Display::None
        }
    }
}

/// The style an element takes after one toggle.
pub fn toggled(style: &ElementStyle, mode: ToggleMode) -> ElementStyle {
    let show = is_hidden(style, mode);
    match mode {
        ToggleMode::Visibility => ElementStyle {
            visibility: if show { Visibility::Visible } else { Visibility::Hidden },
            display: style.display.clone(),
        },
        ToggleMode::Layout if show => ElementStyle {
            visibility: Visibility::Visible,
            display: Display::Contents,
        },
        ToggleMode::Layout => ElementStyle::collapsed(),
    }
}

/// Flip the element between shown and hidden. Returns the new style.
pub fn toggle_visibility<D: Document + ?Sized>(
    document: &mut D,
    element_id: &str,
    mode: ToggleMode,
) -> Result<ElementStyle, ActionError> {
    let current = document
        .style(element_id)
        .ok_or_else(|| ActionError::ElementNotFound(element_id.to_string()))?;

    let next = toggled(&current, mode);
    document.set_style(element_id, next.clone())?;

    tracing::debug!(
        element = element_id,
        visibility = ?next.visibility,
        display = next.display.as_css(),
        "toggled element"
    );
    Ok(next)
}
