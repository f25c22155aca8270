//! Chat presentation modes and widget labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown chat mode literal.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid chat mode {0:?} (expected chat, sidebar, or popup)")]
pub struct ParseChatModeError(pub String);

/// Which chat widget presentation is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Inline chat filling the content area.
    #[default]
    Chat,
    /// Panel docked to the edge of the content area.
    Sidebar,
    /// Floating launcher that opens a popup window.
    Popup,
}

impl ChatMode {
    /// All modes, in selector order.
    pub const ALL: [ChatMode; 3] = [ChatMode::Chat, ChatMode::Sidebar, ChatMode::Popup];

    /// The literal used in config and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Sidebar => "sidebar",
            Self::Popup => "popup",
        }
    }

    /// The label shown in the mode selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Sidebar => "Sidebar",
            Self::Popup => "Popup",
        }
    }

    /// Position of this mode in [`ChatMode::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Chat => 0,
            Self::Sidebar => 1,
            Self::Popup => 2,
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = ParseChatModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Self::Chat),
            "sidebar" => Ok(Self::Sidebar),
            "popup" => Ok(Self::Popup),
            other => Err(ParseChatModeError(other.to_string())),
        }
    }
}

/// Static text handed to the chat widget variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLabels {
    /// Placeholder shown in an empty input box.
    pub placeholder: String,
    /// Message shown by the popup variant, pointing at the launcher.
    pub popup_hint: String,
}

impl ChatLabels {
    pub const DEFAULT_PLACEHOLDER: &str = "输入你的问题...";
    pub const DEFAULT_POPUP_HINT: &str = "点击右下角的聊天图标开始对话";
}

impl Default for ChatLabels {
    fn default() -> Self {
        Self {
            placeholder: Self::DEFAULT_PLACEHOLDER.to_owned(),
            popup_hint: Self::DEFAULT_POPUP_HINT.to_owned(),
        }
    }
}
