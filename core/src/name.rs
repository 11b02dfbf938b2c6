use itertools::Itertools;

/// Turns a token key into a CSS custom-property segment.
///
/// Every upper-case letter starts a new hyphen-separated word, whitespace
/// becomes a hyphen and anything outside `[a-z0-9-]` is dropped after
/// transliterating to ASCII. Runs of hyphens collapse and the ends are
/// trimmed, so `fontSize` → `font-size` and `Color Light` → `color-light`.
///
/// A key made only of symbols normalizes to an empty string.
pub fn normalize(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 4);
    for c in deunicode::deunicode(name).chars() {
        match c {
            'A'..='Z' => {
                spaced.push('-');
                spaced.push(c.to_ascii_lowercase());
            }
            'a'..='z' | '0'..='9' | '-' => spaced.push(c),
            c if c.is_whitespace() => spaced.push('-'),
            _ => {}
        }
    }
    spaced.split('-').filter(|s| !s.is_empty()).join("-")
}

/// Dotted reference path (`color.primary.500`) as a variable name
/// (`color-primary-500`).
pub fn path_name(path: &str) -> String {
    path.split('.').map(normalize).join("-")
}

/// Category key for a top-level token set. Set names often use `/` as a
/// folder separator (`Color/Light`), which becomes a word break.
pub fn category_name(name: &str) -> String {
    normalize(&name.replace(['/', '\\'], "-"))
}

/// Appends a normalized key to an already-normalized path.
pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    let key = normalize(key);
    if prefix.is_empty() {
        key
    } else {
        format!("{prefix}-{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn camel_case_becomes_kebab() {
        assert_eq!(normalize("fontSize"), "font-size");
        assert_eq!(normalize("borderRadius"), "border-radius");
        assert_eq!(normalize("Primary"), "primary");
    }

    #[test]
    fn whitespace_and_symbols() {
        assert_eq!(normalize("Color Light"), "color-light");
        assert_eq!(normalize("  heading   large "), "heading-large");
        assert_eq!(normalize("gray.100"), "gray100");
        assert_eq!(normalize("50%"), "50");
        assert_eq!(normalize("@@!"), "");
    }

    #[test]
    fn transliterates_before_stripping() {
        assert_eq!(normalize("Größe"), "grosse");
        assert_eq!(normalize("café"), "cafe");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "fontSize",
            "Color Light",
            "HTMLColor",
            "--weird--Name--",
            "spacing/SM",
            "x",
            "",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn paths_and_categories() {
        assert_eq!(path_name("spacing.sm"), "spacing-sm");
        assert_eq!(path_name("colors.brandPrimary.500"), "colors-brand-primary-500");
        assert_eq!(category_name("Color/Light"), "color-light");
        assert_eq!(category_name("Typography"), "typography");
        assert_eq!(join_path("", "fontSize"), "font-size");
        assert_eq!(join_path("heading", "Large"), "heading-large");
    }
}
