//! Key-code-to-action mapping
//!
//! One key press becomes at most one [`UserAction`]. There is no key repeat
//! handling here; the terminal's own repeat produces repeated presses.

use crate::game::UserAction;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub start: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub terminate: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub down: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        tracing::warn!("Unknown key name in settings: {:?}", s);
                        return None;
                    }
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().filter_map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            start: Self::parse_keys(&settings.keys.start),
            pause: Self::parse_keys(&settings.keys.pause),
            terminate: Self::parse_keys(&settings.keys.terminate),
            left: Self::parse_keys(&settings.keys.left),
            right: Self::parse_keys(&settings.keys.right),
            down: Self::parse_keys(&settings.keys.down),
            rotate: Self::parse_keys(&settings.keys.rotate),
        }
    }

    /// Map a key event to an action. Only presses count; Ctrl+C always terminates.
    pub fn action_for(&self, key: KeyEvent) -> Option<UserAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(UserAction::Terminate);
        }

        let code = normalize_key(key.code);
        let table = [
            (&self.start, UserAction::Start),
            (&self.pause, UserAction::Pause),
            (&self.terminate, UserAction::Terminate),
            (&self.left, UserAction::Left),
            (&self.right, UserAction::Right),
            (&self.down, UserAction::Down),
            (&self.rotate, UserAction::Action),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keys.contains(&code))
            .map(|(_, action)| action)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
