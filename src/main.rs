use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use design_tokens_scss::{run, Config, FsWriter, Overrides};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "design-tokens")]
#[command(about = "Convert a design-token JSON document into SCSS stylesheets")]
#[command(version)]
struct Cli {
    /// Local token document
    #[arg(short, long, conflicts_with = "repo")]
    file: Option<PathBuf>,

    /// Git repository holding the token document
    #[arg(short, long)]
    repo: Option<String>,

    /// Branch to clone
    #[arg(short, long)]
    branch: Option<String>,

    /// Document path inside the repository
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Remove the output directory before writing
    #[arg(long)]
    clean: bool,

    /// Fail when a variable is referenced but never declared
    #[arg(long)]
    strict: bool,

    /// Config file [default: design-tokens.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// More logging (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::discover(cli.config.as_deref()).context("loading configuration")?;
    config.apply(Overrides {
        file: cli.file,
        repo: cli.repo,
        branch: cli.branch,
        path: cli.path,
        out: cli.out,
        clean: cli.clean,
        strict: cli.strict,
    });

    let mut writer = FsWriter::new(&config.output.dir, config.output.clean);
    let report = run(&config, &mut writer).context("converting design tokens")?;

    println!(
        "Wrote {} files ({} variables in {} categories) to {}",
        report.files.len(),
        report.variables,
        report.categories,
        writer.root().display()
    );
    if !report.dangling.is_empty() {
        println!(
            "{} undeclared variable(s) referenced, see warnings above",
            report.dangling.len()
        );
    }
    Ok(())
}
