//! Command-line side of the converter: configuration, retrieval of the token
//! document and writing of the generated stylesheets.

pub mod config;
pub mod error;
pub mod source;
pub mod writer;

use design_tokens_scss_core::{dangling_references, DesignTokens};
use tracing::{debug, info, warn};

pub use config::{Config, Overrides};
pub use error::{Error, Result};
pub use source::TokenSource;
pub use writer::{write_stylesheets, FsWriter, MemoryWriter, OutputWriter};

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub files: Vec<String>,
    pub categories: usize,
    pub variables: usize,
    /// Variables referenced but never declared. Empty unless the run was
    /// lenient.
    pub dangling: Vec<String>,
}

pub fn run(config: &Config, writer: &mut dyn OutputWriter) -> Result<Report> {
    let source = config.token_source()?;
    info!(%source, "loading tokens");
    let document = source.load()?;
    convert(document, config.strict, writer)
}

/// Converts an already parsed document and writes the stylesheets.
pub fn convert(
    document: serde_json::Value,
    strict: bool,
    writer: &mut dyn OutputWriter,
) -> Result<Report> {
    let tokens = DesignTokens::from_json(document)?;
    let categories = tokens.categories();
    debug!(
        categories = categories.len(),
        variables = categories.variable_count(),
        "flattened token sets"
    );
    let sheets = design_tokens_scss_core::emit::render(&categories);

    let dangling = dangling_references(&sheets);
    for name in &dangling {
        warn!(variable = %format!("--{name}"), "referenced but never declared");
    }
    if strict && !dangling.is_empty() {
        return Err(Error::DanglingReferences(dangling));
    }

    let files = write_stylesheets(writer, &sheets)?;
    info!(files = files.len(), "wrote stylesheets");
    Ok(Report {
        files,
        categories: categories.len(),
        variables: categories.variable_count(),
        dangling,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document() -> serde_json::Value {
        json!({
            "$metadata": { "tokenSetOrder": ["Core", "Color Light"] },
            "Core": {
                "spacing": { "sm": { "type": "dimension", "value": 4 } },
                "link": { "type": "color", "value": "{brand.primary}" }
            },
            "Color Light": { "bg-color-light": { "type": "color", "value": "#fff" } }
        })
    }

    #[test]
    fn lenient_run_reports_dangling() {
        let mut writer = MemoryWriter::default();
        let report = convert(document(), false, &mut writer).unwrap();
        assert_eq!(
            report,
            Report {
                files: vec![
                    "base/_variables.scss".to_string(),
                    "base/_light.scss".to_string(),
                    "components/_core.scss".to_string(),
                    "components/_color-light.scss".to_string(),
                    "index.scss".to_string(),
                ],
                categories: 2,
                variables: 3,
                dangling: vec!["brand-primary".to_string()],
            }
        );
        assert_eq!(
            writer.files.keys().collect::<Vec<_>>(),
            report.files.iter().collect::<Vec<_>>()
        );
        assert!(writer.files["base/_light.scss"].contains("--bg-color: #fff;"));
    }

    #[test]
    fn strict_run_fails_before_writing() {
        let mut writer = MemoryWriter::default();
        let err = convert(document(), true, &mut writer).unwrap_err();
        assert!(matches!(&err, Error::DanglingReferences(names) if names == &["brand-primary"]));
        assert!(writer.files.is_empty());
    }

    #[test]
    fn rejects_non_object_documents() {
        let mut writer = MemoryWriter::default();
        let err = convert(json!([1, 2]), false, &mut writer).unwrap_err();
        assert!(matches!(err, Error::Tokens(_)));
    }

    #[test]
    fn run_without_source() {
        let mut writer = MemoryWriter::default();
        assert!(matches!(
            run(&Config::default(), &mut writer),
            Err(Error::NoSource)
        ));
    }
}
