use csscolorparser::Color;
use serde::Deserialize;

use crate::value::Scalar;

/// The `$extensions` object of a token. Unknown namespaces are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct Extensions {
    #[serde(rename = "studio.tokens", default)]
    pub studio_tokens: Option<StudioTokens>,
}
impl Extensions {
    /// `None` when the extensions do not have a shape we understand.
    pub fn from_json(value: &serde_json::Value) -> Option<Extensions> {
        serde_json::from_value(value.clone()).ok()
    }
    pub fn modifier(self) -> Option<StudioTokensModifier> {
        self.studio_tokens?.modify
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StudioTokens {
    #[serde(default)]
    pub modify: Option<StudioTokensModifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StudioTokensModify {
    #[serde(rename = "lighten")]
    Lighten,
    #[serde(rename = "darken")]
    Darken,
    #[serde(rename = "alpha")]
    Alpha,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum StudioTokensSpace {
    #[serde(rename = "hsl")]
    Hsl,
    #[serde(rename = "lch")]
    Lch,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StudioTokensModifier {
    #[serde(rename = "type")]
    pub type_: StudioTokensModify,
    pub value: Scalar,
    #[serde(default)]
    pub space: StudioTokensSpace,
}
impl StudioTokensModifier {
    /// Applies the modifier to a converted color.
    ///
    /// Literal colors are computed to a hex string. A color that is itself a
    /// `var(--…)` lookup cannot be computed here, so it becomes a
    /// `color-mix()` the browser evaluates.
    pub fn apply(&self, css: &str) -> Option<String> {
        let amount = self.value.as_f64()?;
        let css = css.trim();
        if css.starts_with("var(--") {
            return self.mix(css, amount);
        }
        let color = csscolorparser::parse(css).ok()?;
        let color = match (self.type_, self.space) {
            (StudioTokensModify::Alpha, _) => {
                Color::new(color.r, color.g, color.b, amount.clamp(0.0, 1.0))
            }
            (StudioTokensModify::Other, _) => return None,
            (_, StudioTokensSpace::Lch) => {
                let (l, c, h, a) = color.to_lch();
                Color::from_lch(self.shift(l, amount, 100.0), c, h, a)
            }
            _ => {
                let (h, s, l, a) = color.to_hsla();
                Color::from_hsla(h, s, self.shift(l, amount, 1.0), a)
            }
        };
        Some(color.to_hex_string())
    }

    fn shift(&self, lightness: f64, amount: f64, max: f64) -> f64 {
        let shifted = match self.type_ {
            StudioTokensModify::Lighten => lightness + lightness * amount,
            StudioTokensModify::Darken => lightness - lightness * amount,
            _ => lightness,
        };
        shifted.clamp(0.0, max)
    }

    fn mix(&self, css: &str, amount: f64) -> Option<String> {
        let percent = ((amount * 100.0).clamp(0.0, 100.0) * 100.0).round() / 100.0;
        let percent = crate::value::format_number(&serde_json::Number::from_f64(percent)?);
        match self.type_ {
            StudioTokensModify::Lighten => {
                Some(format!("color-mix(in srgb, {css}, white {percent}%)"))
            }
            StudioTokensModify::Darken => {
                Some(format!("color-mix(in srgb, {css}, black {percent}%)"))
            }
            StudioTokensModify::Alpha => {
                Some(format!("color-mix(in srgb, {css} {percent}%, transparent)"))
            }
            StudioTokensModify::Other => None,
        }
    }
}
