//! Outbound chat replies
//!
//! Platform-neutral: a reply is Markdown text, optionally with an inline
//! keyboard or an image URL. Adapters translate these into their own wire
//! format.

use serde::{Deserialize, Serialize};

/// Inline keyboard button; `data` is echoed back as a callback payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Vec<Button>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
            photo_url: None,
        }
    }

    /// Image reply; `caption` becomes the text
    pub fn photo(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            text: caption.into(),
            buttons: Vec::new(),
            photo_url: Some(url.into()),
        }
    }

    /// One button per row
    pub fn with_buttons(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        self.buttons = buttons.into_iter().map(|b| vec![b]).collect();
        self
    }
}
