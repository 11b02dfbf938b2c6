use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use tracing::trace;

use crate::{expression::resolve_references, TokenType};

/// What a single token converts to.
#[derive(Debug, Clone, PartialEq)]
pub enum CssValue {
    Literal(String),
    /// CSS property → value, for tokens that expand to several declarations.
    Properties(IndexMap<String, String>),
}

/// A field of a composite token: a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(Number),
    Text(String),
}
impl Scalar {
    pub fn to_css(&self) -> String {
        match self {
            Scalar::Number(n) => format_number(n),
            Scalar::Text(s) => s.clone(),
        }
    }
    /// Like `to_css`, but appends `unit` when the field is numeric.
    pub fn with_unit(&self, unit: &str) -> String {
        match self {
            Scalar::Number(n) => format!("{}{unit}", format_number(n)),
            Scalar::Text(s) if is_numeric(s) => format!("{}{unit}", s.trim()),
            Scalar::Text(s) => s.clone(),
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => n.as_f64(),
            Scalar::Text(s) if is_numeric(s) => s.trim().parse().ok(),
            Scalar::Text(_) => None,
        }
    }
}

fn is_numeric(s: &str) -> bool {
    s.trim().parse::<f64>().map_or(false, f64::is_finite)
}

/// Integral floats print without a fraction (`16.0` → `16`).
pub fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Resolves placeholders in a field that has not been resolved yet.
fn resolved(css: String, type_: TokenType) -> String {
    if css.contains("var(--") {
        css
    } else {
        resolve_references(&css, type_)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Shadow {
    pub x: Option<Scalar>,
    pub y: Option<Scalar>,
    pub blur: Option<Scalar>,
    pub spread: Option<Scalar>,
    pub color: Option<Scalar>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
impl Shadow {
    fn looks_like(map: &Map<String, Value>) -> bool {
        map.contains_key("x")
            || map.contains_key("y")
            || matches!(
                map.get("type").and_then(Value::as_str),
                Some("dropShadow" | "innerShadow")
            )
    }
    fn length(field: &Option<Scalar>) -> String {
        field.as_ref().map_or_else(
            || "0px".to_string(),
            |v| resolved(v.with_unit("px"), TokenType::Dimension),
        )
    }
    pub fn to_css(&self) -> String {
        let inset = match self.kind.as_deref() {
            Some("innerShadow") => "inset ",
            _ => "",
        };
        let color = self.color.as_ref().map_or_else(
            || "#000".to_string(),
            |c| resolved(c.to_css(), TokenType::Color),
        );
        format!(
            "{inset}{} {} {} {} {color}",
            Self::length(&self.x),
            Self::length(&self.y),
            Self::length(&self.blur),
            Self::length(&self.spread),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Border {
    pub width: Option<Scalar>,
    pub style: Option<Scalar>,
    pub color: Option<Scalar>,
}
impl Border {
    pub fn to_css(&self) -> String {
        let width = self.width.as_ref().map_or_else(
            || "1px".to_string(),
            |w| resolved(w.with_unit("px"), TokenType::Dimension),
        );
        let style = self
            .style
            .as_ref()
            .map_or_else(|| "solid".to_string(), Scalar::to_css);
        let color = self.color.as_ref().map_or_else(
            || "#000".to_string(),
            |c| resolved(c.to_css(), TokenType::Color),
        );
        format!("{width} {style} {color}")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: Option<Scalar>,
    pub font_size: Option<Scalar>,
    pub font_weight: Option<Scalar>,
    pub line_height: Option<Scalar>,
    pub letter_spacing: Option<Scalar>,
    pub text_case: Option<Scalar>,
    pub text_decoration: Option<Scalar>,
}
impl Typography {
    pub fn to_properties(&self) -> IndexMap<String, String> {
        let field = |value: &Option<Scalar>, unit: Option<&str>, default: &str| match value {
            Some(v) => resolved(
                unit.map_or_else(|| v.to_css(), |unit| v.with_unit(unit)),
                TokenType::Typography,
            ),
            None => default.to_string(),
        };
        let mut properties = IndexMap::new();
        properties.insert("font-family".to_string(), field(&self.font_family, None, "inherit"));
        properties.insert("font-size".to_string(), field(&self.font_size, Some("px"), "inherit"));
        properties.insert("font-weight".to_string(), field(&self.font_weight, None, "inherit"));
        properties.insert("line-height".to_string(), field(&self.line_height, None, "inherit"));
        properties.insert(
            "letter-spacing".to_string(),
            field(&self.letter_spacing, Some("px"), "normal"),
        );
        if self.text_case.is_some() {
            properties.insert("text-transform".to_string(), field(&self.text_case, None, ""));
        }
        if self.text_decoration.is_some() {
            properties.insert(
                "text-decoration".to_string(),
                field(&self.text_decoration, None, ""),
            );
        }
        properties
    }
}

/// A token value, classified once by its declared type and its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Missing,
    /// A whole token used as a value: `{ "type": ..., "value": ... }`.
    Nested { type_: TokenType, value: Value },
    Shadows(Vec<Shadow>),
    Border(Border),
    Typography(Typography),
    Number(Number),
    Text(String),
    Raw(Value),
}
impl TokenValue {
    pub fn classify(type_: TokenType, value: &Value) -> TokenValue {
        match value {
            Value::Null => TokenValue::Missing,
            Value::Object(map) => {
                if let Some(nested) = Self::nested(map) {
                    return nested;
                }
                if type_ == TokenType::BoxShadow || Shadow::looks_like(map) {
                    if let Ok(shadow) = serde_json::from_value(value.clone()) {
                        return TokenValue::Shadows(vec![shadow]);
                    }
                }
                let parsed = match type_ {
                    TokenType::Border => serde_json::from_value(value.clone())
                        .ok()
                        .map(TokenValue::Border),
                    TokenType::Typography => serde_json::from_value(value.clone())
                        .ok()
                        .map(TokenValue::Typography),
                    _ => None,
                };
                parsed.unwrap_or_else(|| TokenValue::Raw(value.clone()))
            }
            Value::Array(items) if Self::is_shadow_list(type_, items) => items
                .iter()
                .map(|item| serde_json::from_value(item.clone()))
                .collect::<Result<Vec<Shadow>, _>>()
                .map_or_else(|_| TokenValue::Raw(value.clone()), TokenValue::Shadows),
            Value::Number(n) => TokenValue::Number(n.clone()),
            Value::String(s) => TokenValue::Text(s.clone()),
            other => TokenValue::Raw(other.clone()),
        }
    }

    fn nested(map: &Map<String, Value>) -> Option<TokenValue> {
        let type_ = map.get("$type").or_else(|| map.get("type"))?;
        let value = map.get("$value").or_else(|| map.get("value"))?;
        Some(TokenValue::Nested {
            type_: TokenType::from_json(type_),
            value: value.clone(),
        })
    }

    fn is_shadow_list(type_: TokenType, items: &[Value]) -> bool {
        !items.is_empty()
            && (type_ == TokenType::BoxShadow
                || items
                    .iter()
                    .all(|item| item.as_object().map_or(false, Shadow::looks_like)))
    }

    pub fn to_css(&self, type_: TokenType) -> Option<CssValue> {
        let css = match self {
            TokenValue::Missing => return None,
            TokenValue::Nested { type_, value } => return convert(value, *type_),
            TokenValue::Shadows(shadows) => shadows.iter().map(Shadow::to_css).join(", "),
            TokenValue::Border(border) => border.to_css(),
            TokenValue::Typography(typography) => {
                return Some(CssValue::Properties(typography.to_properties()))
            }
            TokenValue::Number(n) if type_.is_dimension() => format!("{}px", format_number(n)),
            TokenValue::Number(n) => format_number(n),
            TokenValue::Text(s) => resolved(s.clone(), type_),
            TokenValue::Raw(value) => {
                trace!(?type_, "rendering unrecognized value as JSON");
                value.to_string()
            }
        };
        Some(CssValue::Literal(css))
    }
}

/// Converts a token value to CSS. `None` only for null values; every other
/// shape has a rendering, unrecognized ones as compact JSON.
pub fn convert(value: &Value, type_: TokenType) -> Option<CssValue> {
    TokenValue::classify(type_, value).to_css(type_)
}
