#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use tessera::app::App;
use tessera::config::AppConfig;
use tessera::dataset::{Choice, Dataset};
use tessera::render::svg::{SvgFrame, SvgSurface};
use tessera::ui::window;

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    choice: Option<Choice>,
    export_svg: Option<PathBuf>,
}

fn usage() -> &'static str {
    "usage: Tessera [--config FILE] [--dataset kickstarter|movies|games|PATH] [--export-svg OUT]"
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{flag} needs a value\n{}", usage()))
        };
        match arg.as_str() {
            "--config" => options.config = Some(PathBuf::from(value("--config")?)),
            "--dataset" => {
                let name = value("--dataset")?;
                options.choice = Some(match Dataset::from_name(&name) {
                    Some(dataset) => Choice::Builtin(dataset),
                    None => Choice::File(PathBuf::from(name)),
                });
            }
            "--export-svg" => options.export_svg = Some(PathBuf::from(value("--export-svg")?)),
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other => bail!("unexpected argument {other:?}\n{}", usage()),
        }
    }
    Ok(options)
}

fn export_svg(mut app: App, choice: Choice, out: &Path) -> Result<()> {
    // A failed pass still produces a document with the error indicator.
    if let Err(e) = app.load_now(choice) {
        tracing::error!("Exporting error document: {}", e);
    }

    let frame = SvgFrame {
        width: app.chart_width,
        height: app.chart_height,
        margin: app.config.chart.margin,
    };
    let mut surface = SvgSurface::new(&app.title, frame, app.config.legend.clone());
    let stats = app.render_onto(&mut surface);
    surface.save(out)?;

    tracing::info!(
        "Wrote {} ({} tiles, {} legend entries)",
        out.display(),
        stats.tiles,
        stats.legend_entries
    );
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tessera=info".parse()?),
        )
        .init();

    let options = parse_args(std::env::args().skip(1))?;

    let config = match &options.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let mut app = App::new(config)?;
    let choice = options.choice.unwrap_or_default();

    if let Some(out) = &options.export_svg {
        return export_svg(app, choice, out);
    }

    tracing::info!("Tessera starting");
    let initial = app.select(choice);
    window::run(app, initial).context("window event loop failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_builtin_and_file_datasets() {
        let options = parse_args(args(&["--dataset", "games", "--export-svg", "out.svg"])).unwrap();
        assert_eq!(options.choice, Some(Choice::Builtin(Dataset::VideoGames)));
        assert_eq!(options.export_svg, Some(PathBuf::from("out.svg")));

        let options = parse_args(args(&["--dataset", "mine.json"])).unwrap();
        assert_eq!(options.choice, Some(Choice::File(PathBuf::from("mine.json"))));
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--config"])).is_err());
    }
}
