use indexmap::IndexMap;

use crate::{Categories, Category};

/// Which stylesheet a category's variables belong to. Decided from the
/// category name alone: `light` wins over `dark` when both appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Base,
    Light,
    Dark,
}
impl Theme {
    pub const VARIANTS: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn of(category: &str) -> Theme {
        let category = category.to_lowercase();
        if category.contains("light") {
            Theme::Light
        } else if category.contains("dark") {
            Theme::Dark
        } else {
            Theme::Base
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            Theme::Base => "variables",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
    /// Selector the theme's variables are scoped to.
    pub fn selector(self) -> String {
        match self {
            Theme::Base | Theme::Light => ":root".to_string(),
            theme => format!(".{}", theme.name()),
        }
    }
}

pub type Bucket<'a> = IndexMap<&'a str, &'a Category>;

#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub base: Bucket<'a>,
    pub light: Bucket<'a>,
    pub dark: Bucket<'a>,
}
impl<'a> Partition<'a> {
    pub fn bucket(&self, theme: Theme) -> &Bucket<'a> {
        match theme {
            Theme::Base => &self.base,
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }
    /// Whether any category in the theme's bucket declares a variable.
    pub fn has_variables(&self, theme: Theme) -> bool {
        self.bucket(theme).values().any(|c| !c.variables.is_empty())
    }
}

pub fn partition(categories: &Categories) -> Partition<'_> {
    let mut partition = Partition::default();
    for (name, category) in categories {
        let bucket = match Theme::of(name) {
            Theme::Base => &mut partition.base,
            Theme::Light => &mut partition.light,
            Theme::Dark => &mut partition.dark,
        };
        bucket.insert(name.as_str(), category);
    }
    partition
}
