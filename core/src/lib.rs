//! Figma-style design tokens to SCSS custom properties.
//!
//! ```text
//! tokens.json → DesignTokens → categories() → partition → Stylesheets
//! ```
//!
//! Everything in this crate is a pure function over in-memory values.
//! Fetching the document and writing the stylesheets belong to the caller.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use tracing::{debug, trace};

pub mod emit;
pub mod expression;
pub mod extensions;
pub mod flatten;
pub mod name;
pub mod theme;
pub mod utilities;
pub mod validate;
pub mod value;

pub use emit::Stylesheets;
pub use expression::{resolve_references, substitute_references};
pub use flatten::{Categories, Category};
pub use name::normalize;
pub use theme::{partition, Partition, Theme};
pub use validate::dangling_references;
pub use value::{convert, CssValue};

use extensions::Extensions;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token document must be a JSON object of token sets: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}

/// A whole token document: token set name → tree, in document order.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct DesignTokens {
    pub sets: IndexMap<String, TokenOrGroup>,
}
impl DesignTokens {
    pub fn from_json(value: serde_json::Value) -> Result<Self, TokenError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Flattens every token set into its category, keyed by the normalized
    /// set name.
    pub fn categories(&self) -> Categories {
        let mut categories = Categories::default();
        for (name, node) in &self.sets {
            if name.is_empty() || name.starts_with('$') {
                trace!(name, "skipping metadata set");
                continue;
            }
            match node {
                TokenOrGroup::Group(group) => flatten::flatten(group, name, &mut categories, ""),
                TokenOrGroup::Token(_) => debug!(name, "skipping token outside of any group"),
                TokenOrGroup::Other(_) => trace!(name, "skipping non-object token set"),
            }
        }
        categories
    }

    pub fn to_scss(&self) -> Stylesheets {
        emit::render(&self.categories())
    }
}
impl FromStr for DesignTokens {
    type Err = TokenError;
    fn from_str(data: &str) -> Result<Self, TokenError> {
        Ok(serde_json::from_str(data)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenType {
    Color,
    Dimension,
    Spacing,
    BorderRadius,
    Border,
    BoxShadow,
    Typography,
    #[default]
    Other,
}
impl TokenType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "color" => TokenType::Color,
            "dimension" => TokenType::Dimension,
            "spacing" => TokenType::Spacing,
            "borderRadius" => TokenType::BorderRadius,
            "border" => TokenType::Border,
            "boxShadow" => TokenType::BoxShadow,
            "typography" => TokenType::Typography,
            _ => TokenType::Other,
        }
    }
    pub fn from_json(tag: &serde_json::Value) -> Self {
        tag.as_str().map(Self::from_tag).unwrap_or_default()
    }
    /// Types whose bare numbers are pixel lengths.
    pub fn is_dimension(self) -> bool {
        matches!(
            self,
            TokenType::Dimension | TokenType::Spacing | TokenType::BorderRadius
        )
    }
}
impl<'de> Deserialize<'de> for TokenType {
    fn deserialize<D>(deserializer: D) -> Result<TokenType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = serde_json::Value::deserialize(deserializer)?;
        Ok(TokenType::from_json(&tag))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenOrGroup {
    Token(Token),
    Group(IndexMap<String, TokenOrGroup>),
    Other(serde::de::IgnoredAny),
}

#[derive(Debug, Deserialize)]
pub struct Token {
    #[serde(rename = "$value", alias = "value")]
    pub value: serde_json::Value,
    #[serde(rename = "$type", alias = "type", default)]
    pub type_: TokenType,
    #[serde(rename = "$extensions", default)]
    pub extensions: Option<serde_json::Value>,
}
impl Token {
    /// Converts the token value, resolving any placeholders left in plain
    /// strings and applying a Tokens Studio color modifier if one is set.
    /// `None` when the value is null.
    pub fn to_css(&self) -> Option<CssValue> {
        let value = match convert(&self.value, self.type_)? {
            CssValue::Literal(css) if !css.contains("var(--") => {
                CssValue::Literal(resolve_references(&css, self.type_))
            }
            value => value,
        };
        let modifier = self
            .extensions
            .as_ref()
            .and_then(Extensions::from_json)
            .and_then(|ext| ext.modifier());
        Some(match (value, modifier) {
            (CssValue::Literal(css), Some(modifier)) => match modifier.apply(&css) {
                Some(modified) => CssValue::Literal(modified),
                None => {
                    debug!(css, ?modifier, "color modifier not applicable");
                    CssValue::Literal(css)
                }
            },
            (value, _) => value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn untagged_nodes() {
        let tokens = DesignTokens::from_json(json!({
            "Color": {
                "primary": { "$type": "color", "$value": "#ff0000" },
                "legacy": { "type": "color", "value": "#00ff00" },
                "untyped": { "value": 4 },
                "group": { "nested": { "type": "spacing", "value": 8 } },
                "list": [1, 2, 3],
                "note": "not a token"
            }
        }))
        .unwrap();
        let TokenOrGroup::Group(set) = &tokens.sets["Color"] else {
            panic!("expected group");
        };
        assert!(matches!(&set["primary"], TokenOrGroup::Token(t) if t.type_ == TokenType::Color));
        assert!(matches!(&set["legacy"], TokenOrGroup::Token(t) if t.type_ == TokenType::Color));
        assert!(matches!(&set["untyped"], TokenOrGroup::Token(t) if t.type_ == TokenType::Other));
        assert!(matches!(&set["group"], TokenOrGroup::Group(_)));
        assert!(matches!(&set["list"], TokenOrGroup::Other(_)));
        assert!(matches!(&set["note"], TokenOrGroup::Other(_)));
    }

    #[test]
    fn unknown_type_tags_are_lenient() {
        let token: Token = serde_json::from_value(json!({ "type": 42, "value": "x" })).unwrap();
        assert_eq!(token.type_, TokenType::Other);
        let token: Token =
            serde_json::from_value(json!({ "type": "fontFamilies", "value": "x" })).unwrap();
        assert_eq!(token.type_, TokenType::Other);
    }

    #[test]
    fn document_must_be_an_object() {
        assert!(DesignTokens::from_json(json!([1, 2])).is_err());
        assert!("not json".parse::<DesignTokens>().is_err());
        assert!("{}".parse::<DesignTokens>().unwrap().sets.is_empty());
    }

    #[test]
    fn metadata_sets_are_skipped() {
        let tokens = DesignTokens::from_json(json!({
            "$themes": [],
            "$metadata": { "tokenSetOrder": ["Base"] },
            "Base": { "gap": { "type": "spacing", "value": 4 } }
        }))
        .unwrap();
        let categories = tokens.categories();
        assert_eq!(categories.names().collect::<Vec<_>>(), vec!["base"]);
    }

    #[test]
    fn modifier_applies_to_literal_colors() {
        let token: Token = serde_json::from_value(json!({
            "type": "color",
            "value": "#808080",
            "$extensions": {
                "studio.tokens": { "modify": { "type": "alpha", "value": "0.5", "space": "lch" } }
            }
        }))
        .unwrap();
        assert_eq!(token.to_css(), Some(CssValue::Literal("#80808080".to_string())));
    }

    #[test]
    fn null_value_converts_to_nothing() {
        let token: Token = serde_json::from_value(json!({ "type": "color", "value": null })).unwrap();
        assert_eq!(token.to_css(), None);
    }
}
