use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, eyre};
use tracing_subscriber::EnvFilter;

use enroll::{
    DocumentFormat, OutputDestination, OutputOptions, RegistrationUI, emit_roster,
};

#[derive(Debug, Parser)]
#[command(
    name = "enroll",
    version,
    about = "Run the terminal user-registration form"
)]
struct Cli {
    /// Create-user endpoint receiving the registration record
    #[arg(short = 'e', long = "endpoint", value_name = "URL")]
    endpoint: Option<String>,

    /// Title shown at the top of the form
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Roster destinations written on exit ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact output rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite roster files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    let mut diagnostics = DiagnosticCollector::default();
    let (output_settings, output_paths) = build_output_options(&cli, &mut diagnostics);
    ensure_output_paths_available(&output_paths, cli.force, &mut diagnostics);
    diagnostics.into_result()?;

    let mut ui = RegistrationUI::new();
    if let Some(endpoint) = cli.endpoint.as_ref() {
        ui = ui.with_endpoint(endpoint.clone());
    }
    if let Some(title) = cli.title.as_ref() {
        ui = ui.with_title(title.clone());
    }

    let roster = ui.run().map_err(Report::msg)?;

    if let Some(options) = output_settings {
        emit_roster(&roster, &options).map_err(Report::msg)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_output_options(
    cli: &Cli,
    diagnostics: &mut DiagnosticCollector,
) -> (Option<OutputOptions>, Vec<PathBuf>) {
    let mut destinations = Vec::new();

    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }

    if destinations.is_empty() {
        return (None, Vec::new());
    }

    let file_paths: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();

    let start = diagnostics.len();
    let format = infer_format_from_files(&file_paths, diagnostics).unwrap_or_default();
    if diagnostics.len() > start {
        return (None, file_paths);
    }

    (
        Some(
            OutputOptions::new(format)
                .with_pretty(!cli.no_pretty)
                .with_destinations(destinations),
        ),
        file_paths,
    )
}

fn infer_format_from_files(
    file_paths: &[PathBuf],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match probe_format_from_extension(path) {
            ExtensionFormat::Known(format) => {
                if let Some(existing) = detected {
                    if existing != format {
                        diagnostics.push_output(format!(
                            "roster file {} uses {format} but other destinations use {existing}; align extensions",
                            path.display()
                        ));
                    }
                } else {
                    detected = Some(format);
                }
            }
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => diagnostics.push_output(format!(
                "roster file {} requires {format_name} support, but this build was compiled without the '{feature_flag}' feature",
                path.display()
            )),
            ExtensionFormat::Unknown => diagnostics.push_output(format!(
                "cannot infer format from roster file {}; use .json/.yaml/.toml",
                path.display()
            )),
        }
    }
    detected
}

fn probe_format_from_extension(path: &Path) -> ExtensionFormat {
    let Some(ext) = path.extension() else {
        return ExtensionFormat::Unknown;
    };
    let normalized = ext.to_string_lossy().to_ascii_lowercase();
    match normalized.as_str() {
        "json" => ExtensionFormat::Known(DocumentFormat::Json),
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => ExtensionFormat::Known(DocumentFormat::Yaml),
        #[cfg(not(feature = "yaml"))]
        "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
            format_name: "yaml",
            feature_flag: "yaml",
        },
        #[cfg(feature = "toml")]
        "toml" => ExtensionFormat::Known(DocumentFormat::Toml),
        #[cfg(not(feature = "toml"))]
        "toml" => ExtensionFormat::UnsupportedFeature {
            format_name: "toml",
            feature_flag: "toml",
        },
        _ => ExtensionFormat::Unknown,
    }
}

#[derive(Debug)]
enum ExtensionFormat {
    Known(DocumentFormat),
    #[allow(dead_code)]
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

fn ensure_output_paths_available(
    paths: &[PathBuf],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_json_from_extension() {
        let mut diagnostics = DiagnosticCollector::default();
        let format =
            infer_format_from_files(&[PathBuf::from("roster.json")], &mut diagnostics);
        assert_eq!(format, Some(DocumentFormat::Json));
        assert!(diagnostics.into_result().is_ok());
    }

    #[test]
    fn unknown_extension_is_reported() {
        let mut diagnostics = DiagnosticCollector::default();
        let format = infer_format_from_files(&[PathBuf::from("roster.bin")], &mut diagnostics);
        assert_eq!(format, None);
        assert!(diagnostics.into_result().is_err());
    }

    #[test]
    fn stdout_only_defaults_to_json() {
        let cli = Cli::parse_from(["enroll", "-o", "-"]);
        let mut diagnostics = DiagnosticCollector::default();
        let (options, paths) = build_output_options(&cli, &mut diagnostics);
        assert!(paths.is_empty());
        let options = options.expect("options");
        assert_eq!(options.format, DocumentFormat::Json);
    }

    #[test]
    fn no_outputs_means_no_emit() {
        let cli = Cli::parse_from(["enroll"]);
        let mut diagnostics = DiagnosticCollector::default();
        let (options, _) = build_output_options(&cli, &mut diagnostics);
        assert!(options.is_none());
    }
}
