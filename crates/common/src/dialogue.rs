//! Dialogue data model shared by the loader, the layout engine and the scenes.

use serde::{Deserialize, Serialize};

/// One spoken line. `text` may contain emoji markers such as `{smile}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub name: String,
    #[serde(default)]
    pub text: String,
}

impl DialogueLine {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Named emoji image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    pub name: String,
    pub url: String,
}

/// Speaker avatar and the side its bubbles are drawn on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub position: Side,
}

/// Which edge of the viewport a speaker's rows hug.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    /// Sign of the horizontal direction pointing away from the viewport centre.
    pub fn outward(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

impl From<String> for Side {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("right") {
            Side::Right
        } else {
            Side::Left
        }
    }
}

/// Payload served by the dialogue endpoint.
///
/// The `emojies` spelling matches the wire format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueData {
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
    #[serde(default)]
    pub emojies: Vec<Emoji>,
    #[serde(default)]
    pub avatars: Vec<Avatar>,
}

impl DialogueData {
    /// Parse a JSON document.
    pub fn from_json(json: &str) -> crate::ShowcaseResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.dialogue.is_empty()
    }
}
