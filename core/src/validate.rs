use std::collections::HashSet;

use itertools::Itertools;

use crate::{flatten::variable_name, Stylesheets};

/// Variables used through `var(--name)` but declared in none of the
/// documents, sorted and deduplicated.
///
/// References are rewritten lexically, so a typo in a `{path}` placeholder
/// still produces a `var()` call. This finds those.
pub fn dangling_references(sheets: &Stylesheets) -> Vec<String> {
    let declared: HashSet<&str> = sheets
        .iter()
        .flat_map(|(_, content)| content.lines())
        .filter(|line| line.trim_start().starts_with("--"))
        .filter_map(variable_name)
        .collect();
    sheets
        .iter()
        .flat_map(|(_, content)| referenced(content))
        .filter(|name| !declared.contains(name))
        .map(str::to_string)
        .sorted()
        .dedup()
        .collect()
}

/// Names inside every `var(--name ...)` in `content`.
fn referenced(content: &str) -> Vec<&str> {
    content
        .match_indices("var(--")
        .map(|(start, marker)| {
            let rest = &content[start + marker.len()..];
            let end = rest
                .find(|c: char| c == ')' || c == ',' || c.is_whitespace())
                .unwrap_or(rest.len());
            &rest[..end]
        })
        .filter(|name| !name.is_empty())
        .collect()
}
