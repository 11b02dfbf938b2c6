use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    name::{category_name, join_path},
    value::CssValue,
    Token, TokenOrGroup, TokenType,
};

/// Declarations collected for one token set, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    /// `--name: value;` lines.
    pub variables: Vec<String>,
    /// `@mixin name { ... }` blocks.
    pub mixins: Vec<String>,
}
impl Category {
    /// Variable names without the leading `--`.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables.iter().filter_map(|decl| variable_name(decl))
    }
}

/// Name of the variable declared by a `--name: value;` line.
pub fn variable_name(declaration: &str) -> Option<&str> {
    let (name, _) = declaration.trim().split_once(':')?;
    name.trim_end().strip_prefix("--")
}

/// Categories keyed by normalized set name. Insertion order is output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categories(IndexMap<String, Category>);
impl Categories {
    pub fn entry(&mut self, name: String) -> &mut Category {
        self.0.entry(name).or_default()
    }
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.0.get(name)
    }
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Category> {
        self.0.iter()
    }
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Number of emitted variable declarations across all categories.
    pub fn variable_count(&self) -> usize {
        self.0.values().map(|c| c.variables.len()).sum()
    }
}
impl<'a> IntoIterator for &'a Categories {
    type Item = (&'a String, &'a Category);
    type IntoIter = indexmap::map::Iter<'a, String, Category>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Walks a token group, adding a declaration for every token under it to
/// the category named after `set`. `prefix` is the normalized path so far.
pub fn flatten(
    group: &IndexMap<String, TokenOrGroup>,
    set: &str,
    categories: &mut Categories,
    prefix: &str,
) {
    for (key, node) in group {
        if key.is_empty() || key.starts_with('$') {
            continue;
        }
        let path = join_path(prefix, key);
        match node {
            TokenOrGroup::Token(token) => add_token(token, set, &path, categories),
            TokenOrGroup::Group(children) => flatten(children, set, categories, &path),
            TokenOrGroup::Other(_) => trace!(path, "ignoring value outside of a token"),
        }
    }
}

fn add_token(token: &Token, set: &str, path: &str, categories: &mut Categories) {
    let Some(value) = token.to_css() else {
        debug!(path, "skipping token without a value");
        return;
    };
    let category = categories.entry(category_name(set));
    match value {
        CssValue::Properties(properties) if token.type_ == TokenType::Typography => {
            category.mixins.push(mixin(path, &properties));
            for (property, value) in &properties {
                let suffix = property.strip_prefix("font-").unwrap_or(property);
                category.variables.push(format!("--{path}-{suffix}: {value};"));
            }
        }
        CssValue::Properties(properties) => {
            let json: serde_json::Map<String, serde_json::Value> = properties
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            category
                .variables
                .push(format!("--{path}: {};", serde_json::Value::Object(json)));
        }
        CssValue::Literal(css) => category.variables.push(format!("--{path}: {css};")),
    }
}

fn mixin(name: &str, properties: &IndexMap<String, String>) -> String {
    let body = properties
        .iter()
        .map(|(property, value)| format!("  {property}: {value};"))
        .join("\n");
    format!("@mixin {name} {{\n{body}\n}}")
}
