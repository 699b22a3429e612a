//! Redaction actions recorded by the event log

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geometry::Rectangle;
use crate::error::RedactError;

/// Which redaction a completed selection produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RedactionKind {
    /// Opaque solid fill
    #[default]
    #[serde(rename = "black-out")]
    BlackOut,
    /// Gaussian smoothing of the region's current content
    #[serde(rename = "blur")]
    Blur,
}

impl RedactionKind {
    pub const ALL: [RedactionKind; 2] = [RedactionKind::BlackOut, RedactionKind::Blur];

    /// Name used by the mode selector and in scripts
    pub fn name(self) -> &'static str {
        match self {
            RedactionKind::BlackOut => "black-out",
            RedactionKind::Blur => "blur",
        }
    }
}

impl fmt::Display for RedactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RedactionKind {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RedactionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| RedactError::UnknownMode(s.to_string()))
    }
}

/// One applied redaction: a kind and the rectangle it covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    kind: RedactionKind,
    rect: Rectangle,
}

impl Action {
    pub fn new(kind: RedactionKind, rect: Rectangle) -> Self {
        Self { kind, rect }
    }

    pub fn black_out(rect: Rectangle) -> Self {
        Self::new(RedactionKind::BlackOut, rect)
    }

    pub fn blur(rect: Rectangle) -> Self {
        Self::new(RedactionKind::Blur, rect)
    }

    pub fn kind(&self) -> RedactionKind {
        self.kind
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!("black-out".parse::<RedactionKind>().unwrap(), RedactionKind::BlackOut);
        assert_eq!("blur".parse::<RedactionKind>().unwrap(), RedactionKind::Blur);
        assert_eq!(RedactionKind::Blur.to_string(), "blur");
    }

    #[test]
    fn test_unknown_mode_fails() {
        let err = "pixelate".parse::<RedactionKind>().unwrap_err();
        assert!(matches!(err, RedactError::UnknownMode(ref m) if m == "pixelate"));

        let json: Result<RedactionKind, _> = serde_json::from_str("\"Blur\"");
        assert!(json.is_err());
    }

    #[test]
    fn test_action_serde_shape() {
        let action = Action::blur(Rectangle::new(1.0, 2.0, 3.0, 4.0));
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"kind":"blur","rect":{"x0":1.0,"y0":2.0,"x1":3.0,"y1":4.0}}"#);
    }
}
