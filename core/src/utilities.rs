//! Utility classes derived from variable names.
//!
//! Three families, each picked by substrings of the variable name:
//!
//! - color-like (`color`, `background`, or a trailing digit):
//!   `.text-*`, `.bg-*`, `.border-*`
//! - spacing-like (`spacing`, `padding`, `margin`): `.m-*`, `.p-*`
//! - component states (`button-background-hover`): one rule per component
//!   plus one per pseudo-state, e.g. `.button { ... }` and
//!   `.button:hover { ... }`

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::trace;

const STATES: [&str; 6] = ["hover", "active", "focus", "disabled", "checked", "selected"];

const STATE_WORDS: [&str; 8] = [
    "background",
    "border",
    "hover",
    "active",
    "focus",
    "disabled",
    "checked",
    "selected",
];

/// Name segment(s) → CSS property, for component-state variables.
const PROPERTIES: [(&str, &str); 9] = [
    ("background", "background"),
    ("color", "color"),
    ("border-color", "border-color"),
    ("border-radius", "border-radius"),
    ("padding", "padding"),
    ("margin", "margin"),
    ("font-size", "font-size"),
    ("font-weight", "font-weight"),
    ("line-height", "line-height"),
];

pub fn is_color(name: &str) -> bool {
    name.contains("color")
        || name.contains("background")
        || name.ends_with(|c: char| c.is_ascii_digit())
}

pub fn is_spacing(name: &str) -> bool {
    ["spacing", "padding", "margin"]
        .iter()
        .any(|word| name.contains(word))
}

pub fn is_component_state(name: &str) -> bool {
    STATE_WORDS.iter().any(|word| name.contains(word))
}

fn css_property(segments: &str) -> Option<&'static str> {
    PROPERTIES
        .iter()
        .find(|(name, _)| *name == segments)
        .map(|(_, property)| *property)
}

/// A variable read as `<component>-<property>[-<state>]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVariable<'a> {
    pub component: String,
    pub property: &'static str,
    pub state: Option<&'static str>,
    pub variable: &'a str,
}

/// Splits a variable name into component, property and state. Two-segment
/// properties (`border-color`) are tried before one-segment ones. `None`
/// when no known property precedes the state or nothing is left for the
/// component.
pub fn parse_state_variable(name: &str) -> Option<StateVariable<'_>> {
    let segments: Vec<&str> = name.split('-').collect();
    let (last, init) = segments.split_last()?;
    let (state, rest) = match STATES.iter().copied().find(|state| *state == *last) {
        Some(state) => (Some(state), init),
        None => (None, &segments[..]),
    };
    for width in [2, 1] {
        if rest.len() <= width {
            continue;
        }
        let (component, property) = rest.split_at(rest.len() - width);
        if let Some(property) = css_property(&property.join("-")) {
            return Some(StateVariable {
                component: component.join("-"),
                property,
                state,
                variable: name,
            });
        }
    }
    None
}

type StateRules<'a> = IndexMap<Option<&'static str>, Vec<(&'static str, &'a str)>>;

/// Rules for the given variable names (without `--`), in name order with
/// component rules last.
pub fn utility_classes<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut rules = Vec::new();
    let mut components: IndexMap<String, StateRules<'a>> = IndexMap::new();
    for name in names {
        if is_color(name) {
            rules.push(format!(".text-{name} {{ color: var(--{name}); }}"));
            rules.push(format!(".bg-{name} {{ background-color: var(--{name}); }}"));
            rules.push(format!(".border-{name} {{ border-color: var(--{name}); }}"));
        }
        if is_spacing(name) {
            rules.push(format!(".m-{name} {{ margin: var(--{name}); }}"));
            rules.push(format!(".p-{name} {{ padding: var(--{name}); }}"));
        }
        if is_component_state(name) {
            match parse_state_variable(name) {
                Some(var) => components
                    .entry(var.component)
                    .or_default()
                    .entry(var.state)
                    .or_default()
                    .push((var.property, name)),
                None => trace!(name, "no component property in state variable"),
            }
        }
    }
    for (component, states) in &components {
        for state in std::iter::once(None).chain(STATES.iter().copied().map(Some)) {
            let Some(declarations) = states.get(&state) else {
                continue;
            };
            let selector = match state {
                Some(state) => format!(".{component}:{state}"),
                None => format!(".{component}"),
            };
            let body = declarations
                .iter()
                .map(|(property, variable)| format!("  {property}: var(--{variable});"))
                .join("\n");
            rules.push(format!("{selector} {{\n{body}\n}}"));
        }
    }
    rules
}
