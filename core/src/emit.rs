//! Rendering of partitioned categories into SCSS documents.
//!
//! ```text
//! base/_variables.scss    :root { every base variable }
//! base/_light.scss        :root { light variables, -light suffix dropped }
//! base/_dark.scss         .dark { dark variables, -dark suffix dropped }
//! components/_<cat>.scss  imports, typography mixins, utility classes
//! index.scss              imports everything above
//! ```

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use itertools::Itertools;

use crate::{
    expression::substitute_references,
    flatten::variable_name,
    theme::{partition, Bucket, Theme},
    utilities::utility_classes,
    Categories, Category,
};

pub const VARIABLES: &str = "base/_variables.scss";
pub const INDEX: &str = "index.scss";

pub fn theme_path(theme: Theme) -> String {
    format!("base/_{}.scss", theme.name())
}

pub fn component_path(category: &str) -> String {
    format!("components/_{category}.scss")
}

/// Generated documents, relative path → content, in write order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheets(IndexMap<String, String>);
impl Stylesheets {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(path, content)| (path.as_str(), content.as_str()))
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }
    fn insert(&mut self, path: String, content: String) {
        self.0.insert(path, sweep(&content));
    }
}

/// Last pass over a rendered document: substitutes any placeholder still
/// left in it. Declaration lines, comments and blank lines were resolved
/// when the token was converted and are left alone.
fn sweep(content: &str) -> String {
    let mut out = content
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.is_empty()
                || trimmed.starts_with("--")
                || trimmed.starts_with("//")
                || !trimmed.contains('{')
            {
                line.to_string()
            } else {
                substitute_references(line)
            }
        })
        .join("\n");
    if content.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn render(categories: &Categories) -> Stylesheets {
    let partition = partition(categories);
    let mut sheets = Stylesheets::default();
    sheets.insert(VARIABLES.to_string(), base_document(&partition.base));

    let themes: Vec<Theme> = Theme::VARIANTS
        .into_iter()
        .filter(|theme| partition.has_variables(*theme))
        .collect();
    for theme in &themes {
        sheets.insert(theme_path(*theme), theme_document(*theme, partition.bucket(*theme)));
    }
    for (name, category) in categories {
        sheets.insert(component_path(name), component_document(name, category, &themes));
    }
    sheets.insert(INDEX.to_string(), index_document(categories, &themes));
    sheets
}

fn title(name: &str) -> String {
    name.to_case(Case::Title)
}

/// Category title with the theme word removed (`color-light` → `Color`).
fn theme_title(name: &str) -> String {
    let stripped = name
        .to_lowercase()
        .replace("light", "")
        .replace("dark", "");
    let stripped = stripped.split('-').filter(|s| !s.is_empty()).join("-");
    if stripped.is_empty() {
        title(name)
    } else {
        title(&stripped)
    }
}

/// `--primary-light: #fff;` → `--primary: #fff;`, so both themes declare
/// the same logical name.
pub fn strip_theme_suffix(declaration: &str) -> String {
    let Some((name, rest)) = declaration.split_once(':') else {
        return declaration.to_string();
    };
    let stripped = name
        .strip_suffix("-light")
        .or_else(|| name.strip_suffix("-dark"))
        .filter(|stripped| stripped.trim_start().len() > 2);
    match stripped {
        Some(stripped) => format!("{stripped}:{rest}"),
        None => declaration.to_string(),
    }
}

fn block(selector: &str, sections: Vec<(String, Vec<String>)>) -> String {
    let body = sections
        .into_iter()
        .filter(|(_, declarations)| !declarations.is_empty())
        .map(|(title, declarations)| {
            let lines = declarations.iter().map(|d| format!("  {d}")).join("\n");
            format!("  // {title}\n{lines}")
        })
        .join("\n\n");
    if body.is_empty() {
        format!("{selector} {{\n}}\n")
    } else {
        format!("{selector} {{\n{body}\n}}\n")
    }
}

fn base_document(bucket: &Bucket) -> String {
    let sections = bucket
        .iter()
        .map(|(name, category)| (title(name), category.variables.clone()))
        .collect();
    block(":root", sections)
}

fn theme_document(theme: Theme, bucket: &Bucket) -> String {
    let sections = bucket
        .iter()
        .map(|(name, category)| {
            let declarations = category
                .variables
                .iter()
                .map(|d| strip_theme_suffix(d))
                .collect();
            (theme_title(name), declarations)
        })
        .collect();
    format!(
        "@import '{}';\n\n{}",
        Theme::Base.name(),
        block(&theme.selector(), sections)
    )
}

fn component_document(name: &str, category: &Category, themes: &[Theme]) -> String {
    let theme = Theme::of(name);
    let mut imports = vec![format!("@import '../base/{}';", Theme::Base.name())];
    if themes.contains(&theme) {
        imports.push(format!("@import '../base/{}';", theme.name()));
    }
    let names: Vec<String> = match theme {
        Theme::Base => category.variable_names().map(str::to_string).collect(),
        _ => category
            .variables
            .iter()
            .map(|d| strip_theme_suffix(d))
            .filter_map(|d| variable_name(&d).map(str::to_string))
            .collect(),
    };

    let mut sections = vec![imports.join("\n")];
    if !category.mixins.is_empty() {
        sections.push(category.mixins.join("\n\n"));
    }
    let rules = utility_classes(names.iter().map(String::as_str));
    if !rules.is_empty() {
        sections.push(format!("// {} utilities\n{}", title(name), rules.join("\n")));
    }
    format!("{}\n", sections.join("\n\n"))
}

fn index_document(categories: &Categories, themes: &[Theme]) -> String {
    let base = std::iter::once(Theme::Base)
        .chain(themes.iter().copied())
        .map(|theme| format!("@import 'base/{}';", theme.name()));
    let components = categories
        .names()
        .map(|name| format!("@import 'components/{name}';"));
    format!("{}\n", base.chain(components).join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DesignTokens;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render_json(value: serde_json::Value) -> Stylesheets {
        DesignTokens::from_json(value).unwrap().to_scss()
    }

    #[test]
    fn theme_suffixes() {
        assert_eq!(strip_theme_suffix("--primary-light: #fff;"), "--primary: #fff;");
        assert_eq!(strip_theme_suffix("--primary-dark: #000;"), "--primary: #000;");
        assert_eq!(strip_theme_suffix("--dark-bg: #000;"), "--dark-bg: #000;");
        assert_eq!(strip_theme_suffix("--light: #fff;"), "--light: #fff;");
        assert_eq!(strip_theme_suffix("no colon"), "no colon");
    }

    #[test]
    fn titles() {
        assert_eq!(title("color-light"), "Color Light");
        assert_eq!(theme_title("color-light"), "Color");
        assert_eq!(theme_title("dark-surface-colors"), "Surface Colors");
        assert_eq!(theme_title("dark"), "Dark");
    }

    #[test]
    fn base_only_document() {
        let sheets = render_json(json!({
            "Spacing": { "spacing": { "sm": { "type": "dimension", "value": 8 } } },
            "Radius": { "radius": { "md": { "type": "borderRadius", "value": 4 } } }
        }));
        assert_eq!(
            sheets.paths().collect::<Vec<_>>(),
            vec![
                "base/_variables.scss",
                "components/_spacing.scss",
                "components/_radius.scss",
                "index.scss",
            ]
        );
        assert_eq!(
            sheets.get(VARIABLES).unwrap(),
            ":root {\n  // Spacing\n  --spacing-sm: 8px;\n\n  // Radius\n  --radius-md: 4px;\n}\n"
        );
        assert_eq!(
            sheets.get(INDEX).unwrap(),
            "@import 'base/variables';\n@import 'components/spacing';\n@import 'components/radius';\n"
        );
        assert_eq!(
            sheets.get("components/_spacing.scss").unwrap(),
            "@import '../base/variables';\n\n// Spacing utilities\n\
             .m-spacing-sm { margin: var(--spacing-sm); }\n\
             .p-spacing-sm { padding: var(--spacing-sm); }\n"
        );
        assert_eq!(
            sheets.get("components/_radius.scss").unwrap(),
            "@import '../base/variables';\n"
        );
    }

    #[test]
    fn light_and_dark_documents() {
        let sheets = render_json(json!({
            "Color Light": { "surface-color-light": { "type": "color", "value": "#ffffff" } },
            "Color Dark": { "surface-color-dark": { "type": "color", "value": "#000000" } }
        }));
        assert_eq!(
            sheets.get("base/_light.scss").unwrap(),
            "@import 'variables';\n\n:root {\n  // Color\n  --surface-color: #ffffff;\n}\n"
        );
        assert_eq!(
            sheets.get("base/_dark.scss").unwrap(),
            "@import 'variables';\n\n.dark {\n  // Color\n  --surface-color: #000000;\n}\n"
        );
        assert_eq!(sheets.get(VARIABLES).unwrap(), ":root {\n}\n");
        assert_eq!(
            sheets.get("components/_color-dark.scss").unwrap(),
            "@import '../base/variables';\n@import '../base/dark';\n\n// Color Dark utilities\n\
             .text-surface-color { color: var(--surface-color); }\n\
             .bg-surface-color { background-color: var(--surface-color); }\n\
             .border-surface-color { border-color: var(--surface-color); }\n"
        );
        assert_eq!(
            sheets.get(INDEX).unwrap(),
            "@import 'base/variables';\n@import 'base/light';\n@import 'base/dark';\n\
             @import 'components/color-light';\n@import 'components/color-dark';\n"
        );
    }

    #[test]
    fn missing_theme_is_absent() {
        let sheets = render_json(json!({
            "Color Light": { "bg": { "type": "color", "value": "#fff" } }
        }));
        assert!(sheets.contains("base/_light.scss"));
        assert!(!sheets.contains("base/_dark.scss"));
        assert!(!sheets.get(INDEX).unwrap().contains("base/dark"));
    }

    #[test]
    fn mixins_in_component_document() {
        let sheets = render_json(json!({
            "Typography": {
                "body": { "type": "typography", "value": { "fontFamily": "{font.base}", "fontSize": 14 } }
            }
        }));
        let component = sheets.get("components/_typography.scss").unwrap();
        assert!(component.contains(
            "@mixin body {\n  font-family: var(--font-base);\n  font-size: 14px;\n  \
             font-weight: inherit;\n  line-height: inherit;\n  letter-spacing: normal;\n}"
        ));
        assert!(sheets
            .get(VARIABLES)
            .unwrap()
            .contains("  --body-family: var(--font-base);\n  --body-size: 14px;"));
    }

    #[test]
    fn sweep_substitutes_leftover_placeholders() {
        assert_eq!(
            sweep("@mixin a {\n  font-family: {font.base};\n}\n  --x: {keep};\n"),
            "@mixin a {\n  font-family: var(--font-base);\n}\n  --x: {keep};\n"
        );
    }
}
