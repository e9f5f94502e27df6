//! Views and keyboard shortcuts

use serde::Serialize;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Homepage,
    Personal,
    Business,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Personal => "personal",
            Self::Business => "business",
        }
    }
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "homepage" | "home" => Ok(Self::Homepage),
            "personal" => Ok(Self::Personal),
            "business" => Ok(Self::Business),
            _ => Err(format!("Unknown view: {}", s)),
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Modifier state accompanying a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

/// A key press as delivered by the UI surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Key name, e.g. "Escape", "Enter", "2"
    pub key: String,
    pub modifiers: Modifiers,
    /// Whether focus is inside the transaction form
    pub focus_in_form: bool,
}

impl KeyPress {
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers::default(),
            focus_in_form: false,
        }
    }
}

/// Action a key press maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Cancel the active edit
    Cancel,
    /// Submit the focused form
    Submit,
    /// Switch view
    Navigate(View),
}

/// Map a key press to a shortcut
///
/// - Escape cancels
/// - Ctrl/Meta+Enter submits, only when focus is inside the form
/// - Alt+1/2/3 navigate to homepage/personal/business; other digits do nothing
pub fn resolve(press: &KeyPress) -> Option<Shortcut> {
    if press.key == "Escape" {
        return Some(Shortcut::Cancel);
    }

    if (press.modifiers.ctrl || press.modifiers.meta) && press.key == "Enter" {
        return press.focus_in_form.then_some(Shortcut::Submit);
    }

    if press.modifiers.alt {
        return match press.key.as_str() {
            "1" => Some(Shortcut::Navigate(View::Homepage)),
            "2" => Some(Shortcut::Navigate(View::Personal)),
            "3" => Some(Shortcut::Navigate(View::Business)),
            _ => None,
        };
    }

    None
}
