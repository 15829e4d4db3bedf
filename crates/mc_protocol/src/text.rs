//! Chat text components, in the two shapes this codec needs: JSON (used
//! for the status MOTD and the login-state disconnect) and NBT (used for
//! configuration- and play-state disconnects).

use serde::Serialize;

use crate::nbt;

/// A plain-text chat component. Only a literal string plus an optional
/// color is modeled — enough for MOTDs and disconnect reasons, not the
/// full rich-text component tree.
#[derive(Clone, Debug, Serialize)]
pub struct Text {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Text serializes infallibly")
    }

    pub fn to_nbt(&self) -> Vec<u8> {
        let mut compound = nbt::Compound::new().insert("text", self.text.as_str());
        if let Some(color) = &self.color {
            compound = compound.insert("color", color.as_str());
        }
        let mut buf = Vec::new();
        compound
            .write_root(&mut buf)
            .expect("writing to a Vec cannot fail");
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_contains_the_literal_text() {
        let t = Text::new("Timed out");
        assert!(t.to_json().contains("Timed out"));
    }

    #[test]
    fn nbt_starts_with_a_compound_tag() {
        let t = Text::new("Timed out");
        assert_eq!(t.to_nbt()[0], 0x0a);
    }
}
