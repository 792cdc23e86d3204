//! Command-line interface for usx-render
//!
//! Usage:
//!   usx-render render `<path>` [--format `<format>`] [render options]  - Render a file and print it
//!   usx-render heading `<path>`                                      - Print the leading major section heading
//!   usx-render view `<path>` [render options]                        - Open an interactive TUI viewer
//!
//! Render options: `--settings <file>`, `--verses N[,M]`, `--no-verses`,
//! `--suppress-leading-ms`, `--break-before-verses`.
mod viewer;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::Level;
use usx_render::pipeline::{default_stages, Stage, StageContext, StageOutcome};
use usx_render::settings::{RenderSettings, SettingsLoader};
use usx_render::{leading_major_section_heading, CancelToken, Renderer, StyledText};

fn main() {
    let matches = Command::new("usx-render")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render USX-style scripture markup into styled text")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every pipeline stage")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Render a file and print the result")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["markup", "plain", "json", "yaml"])
                        .default_value("markup"),
                )
                .arg(
                    Arg::new("cancel-after")
                        .long("cancel-after")
                        .value_name("STAGE")
                        .help("Raise the stop signal once the named stage completes"),
                )
                .args(render_option_args()),
        )
        .subcommand(
            Command::new("heading")
                .about("Print the major section heading that opens a file")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("view")
                .about("Open an interactive TUI viewer")
                .arg(path_arg())
                .args(render_option_args()),
        )
        .get_matches();

    // The viewer owns the terminal; only log for the line-oriented commands
    if !matches!(matches.subcommand_name(), Some("view")) {
        let level = if matches.get_flag("verbose") {
            Level::DEBUG
        } else {
            Level::INFO
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }

    match matches.subcommand() {
        Some(("render", render_matches)) => handle_render_command(render_matches),
        Some(("heading", heading_matches)) => {
            let path = heading_matches.get_one::<String>("path").unwrap();
            handle_heading_command(path);
        }
        Some(("view", view_matches)) => handle_view_command(view_matches),
        _ => unreachable!(),
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the markup file")
        .required(true)
        .index(1)
}

fn render_option_args() -> Vec<Arg> {
    vec![
        Arg::new("settings")
            .long("settings")
            .short('s')
            .value_name("FILE")
            .help("TOML settings file layered over the built-in defaults"),
        Arg::new("verses")
            .long("verses")
            .value_name("N[,M]")
            .help("Verse number, or inclusive range, the output must expose"),
        Arg::new("no-verses")
            .long("no-verses")
            .help("Strip verse markers instead of rendering them")
            .action(ArgAction::SetTrue),
        Arg::new("suppress-leading-ms")
            .long("suppress-leading-ms")
            .help("Drop a major section heading that opens the text")
            .action(ArgAction::SetTrue),
        Arg::new("break-before-verses")
            .long("break-before-verses")
            .help("Start every verse on a new line")
            .action(ArgAction::SetTrue),
    ]
}

/// Layer the settings file and command-line flags over the defaults
fn load_settings(matches: &ArgMatches) -> Result<RenderSettings, String> {
    let mut loader = SettingsLoader::new();
    if let Some(path) = matches.get_one::<String>("settings") {
        loader = loader.settings_file(path);
    }
    if let Some(verses) = matches.get_one::<String>("verses") {
        let bounds = parse_verse_bounds(verses)?;
        loader = loader.expected_verses(&bounds).map_err(|e| e.to_string())?;
    }
    if matches.get_flag("no-verses") {
        loader = loader.render_verses(false).map_err(|e| e.to_string())?;
    }
    if matches.get_flag("suppress-leading-ms") {
        loader = loader
            .suppress_leading_major_section_headings(true)
            .map_err(|e| e.to_string())?;
    }
    if matches.get_flag("break-before-verses") {
        loader = loader.break_before_verses(true).map_err(|e| e.to_string())?;
    }
    let settings = loader.load().map_err(|e| e.to_string())?;
    Ok(settings.render)
}

fn parse_verse_bounds(raw: &str) -> Result<Vec<u32>, String> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid verse number '{}'", part.trim()))
        })
        .collect()
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

/// Handle the render command
fn handle_render_command(matches: &ArgMatches) {
    let path = matches.get_one::<String>("path").unwrap();
    let format = matches.get_one::<String>("format").unwrap();

    let config = load_settings(matches)
        .and_then(|settings| settings.into_config().map_err(|e| e.to_string()))
        .unwrap_or_else(|e| {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        });

    let cancel = CancelToken::new();
    let mut stages = default_stages();
    if let Some(target) = matches.get_one::<String>("cancel-after") {
        let Some(index) = stages.iter().position(|stage| stage.name() == target.as_str()) else {
            let names: Vec<_> = stages.iter().map(|stage| stage.name()).collect();
            eprintln!(
                "Unknown stage '{}'. Stages: {}",
                target,
                names.join(", ")
            );
            std::process::exit(1);
        };
        let inner = stages.remove(index);
        stages.insert(
            index,
            Box::new(CancelAfter {
                inner,
                cancel: cancel.clone(),
            }),
        );
    }

    let source = read_source(path);
    let renderer = Renderer::with_stages(config, stages).with_cancel_token(cancel);
    let report = renderer.render_report(source);

    let output = match format.as_str() {
        "markup" => report.text.to_markup(),
        "plain" => report.text.as_str().to_string(),
        "json" => serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("Serialization error: {}", e);
            std::process::exit(1);
        }),
        "yaml" => serde_yaml::to_string(&report).unwrap_or_else(|e| {
            eprintln!("Serialization error: {}", e);
            std::process::exit(1);
        }),
        _ => unreachable!(),
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

/// Handle the heading command
fn handle_heading_command(path: &str) {
    let source = read_source(path);
    let heading = leading_major_section_heading(&StyledText::plain(source));
    if !heading.is_empty() {
        println!("{}", heading);
    }
}

/// Handle the view command
fn handle_view_command(matches: &ArgMatches) {
    let path = matches.get_one::<String>("path").unwrap();
    let settings = load_settings(matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = viewer::viewer_main::run_viewer(PathBuf::from(path), settings) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Runs a stage, then raises the stop signal
struct CancelAfter {
    inner: Box<dyn Stage>,
    cancel: CancelToken,
}

impl Stage for CancelAfter {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        let outcome = self.inner.apply(input, cx);
        self.cancel.cancel();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verse_bounds() {
        assert_eq!(parse_verse_bounds("3"), Ok(vec![3]));
        assert_eq!(parse_verse_bounds("3, 5"), Ok(vec![3, 5]));
        assert!(parse_verse_bounds("3-5").is_err());
    }

    #[test]
    fn test_cancel_after_stops_later_stages() {
        let cancel = CancelToken::new();
        let mut stages = default_stages();
        let index = stages
            .iter()
            .position(|stage| stage.name() == "section-heading")
            .unwrap();
        let inner = stages.remove(index);
        stages.insert(
            index,
            Box::new(CancelAfter {
                inner,
                cancel: cancel.clone(),
            }),
        );

        let renderer = Renderer::with_stages(Default::default(), stages).with_cancel_token(cancel);
        let report =
            renderer.render_report(r#"<para style="s">Intro</para><para style="p">Hello</para>"#);
        assert_eq!(report.cancelled_stage, Some("paragraph"));
        assert_eq!(
            report.text.to_markup(),
            r#"[bold,center]Intro[/]
<para style="p">Hello</para>"#
        );
    }
}
