//! Portrait definition file checker
//!
//! Parses TOML definition files and reports the semantic problems the serde
//! layer cannot catch: malformed dynamic-file templates, impossible HP
//! bounds, out-of-range sprite-sheet indices, scenes without slot
//! positions, and layers that can never show anything. Script predicate
//! names are listed informationally since they only exist once the host
//! registers them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tachie_core::{config, template};
use tachie_types::{PortraitConfig, PortraitLayer, SceneConfig};

#[derive(Parser)]
#[command(version, about = "Validate portrait definition files")]
struct Cli {
    /// TOML definition files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

/// Collected findings for one run
struct Report {
    errors: usize,
    warnings: usize,
    use_color: bool,
}

impl Report {
    fn new() -> Self {
        Self {
            errors: 0,
            warnings: 0,
            use_color: atty::is(atty::Stream::Stdout),
        }
    }

    fn error(&mut self, file: &Path, message: &str) {
        self.errors += 1;
        self.emit("error", "\x1b[31m", file, message);
    }

    fn warn(&mut self, file: &Path, message: &str) {
        self.warnings += 1;
        self.emit("warning", "\x1b[33m", file, message);
    }

    fn note(&self, file: &Path, message: &str) {
        self.emit("note", "\x1b[36m", file, message);
    }

    fn emit(&self, level: &str, color: &str, file: &Path, message: &str) {
        if self.use_color {
            println!("{color}{level}\x1b[0m [{}] {message}", file.display());
        } else {
            println!("{level} [{}] {message}", file.display());
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut report = Report::new();
    let mut script_names = BTreeSet::new();

    for file in &cli.files {
        match config::load_file(file) {
            Ok(doc) => check_document(&doc, file, &mut report, &mut script_names),
            Err(e) => report.error(file, &e.to_string()),
        }
    }

    if !script_names.is_empty() {
        let names: Vec<_> = script_names.into_iter().collect();
        println!(
            "script predicates referenced (must be registered by the host): {}",
            names.join(", ")
        );
    }

    println!(
        "{} file(s) checked: {} error(s), {} warning(s)",
        cli.files.len(),
        report.errors,
        report.warnings
    );

    if report.errors > 0 || (cli.strict && report.warnings > 0) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn check_document(
    doc: &PortraitConfig,
    file: &Path,
    report: &mut Report,
    script_names: &mut BTreeSet<String>,
) {
    if doc.portraits.is_empty() && doc.scenes.is_empty() {
        report.warn(file, "document defines no portraits and no scenes");
    }

    let mut scene_names = BTreeSet::new();
    for scene in &doc.scenes {
        check_scene(scene, file, report);
        if !scene_names.insert(scene.name.as_str()) {
            report.error(file, &format!("scene `{}` defined twice", scene.name));
        }
    }

    for layer in &doc.portraits {
        check_layer(layer, file, report, script_names);
    }
}

fn check_scene(scene: &SceneConfig, file: &Path, report: &mut Report) {
    let label = format!("scene `{}`", scene.name);

    if scene.name.is_empty() {
        report.error(file, "scene with empty name");
    }
    if scene.positions.is_empty() {
        report.error(file, &format!("{label}: no slot positions, nothing can show"));
    }
    for (scale, axis) in [(scene.scale_x, "scale_x"), (scene.scale_y, "scale_y")] {
        if scale > 1000 {
            report.warn(file, &format!("{label}: {axis} of {scale}% is suspiciously large"));
        }
    }
}

fn check_layer(
    layer: &PortraitLayer,
    file: &Path,
    report: &mut Report,
    script_names: &mut BTreeSet<String>,
) {
    let label = if layer.label.is_empty() {
        format!("actor {} layer", layer.actor_id)
    } else {
        format!("actor {} layer `{}`", layer.actor_id, layer.label)
    };

    if layer.files.is_empty() && layer.dynamic_file.is_none() {
        report.warn(file, &format!("{label}: no file rules and no dynamic file"));
    }

    if let Some(sheet) = &layer.sprite_sheet {
        if sheet.max_column == 0 || sheet.max_row == 0 || sheet.column == 0 || sheet.row == 0 {
            report.error(file, &format!("{label}: sprite sheet numbers are 1-based"));
        } else if sheet.column > sheet.max_column || sheet.row > sheet.max_row {
            report.error(
                file,
                &format!(
                    "{label}: sprite sheet cell ({}, {}) outside {}x{} sheet",
                    sheet.column, sheet.row, sheet.max_column, sheet.max_row
                ),
            );
        }
    }

    if let Some(dynamic_file) = &layer.dynamic_file {
        for problem in template::lint(dynamic_file) {
            report.error(file, &format!("{label}: {problem}"));
        }
    }

    for rule in &layer.files {
        if rule.file_name.is_empty() {
            report.error(file, &format!("{label}: rule with empty file_name"));
        }
        if rule.hp_upper > 100 || rule.hp_lower > 100 {
            report.error(file, &format!("{label}: HP bounds are percentages, max 100"));
        }
        if rule.hp_upper != 0 && rule.hp_lower != 0 && rule.hp_lower > rule.hp_upper {
            report.warn(
                file,
                &format!(
                    "{label}: rule `{}` needs HP >= {} and <= {}, it can never match",
                    rule.file_name, rule.hp_lower, rule.hp_upper
                ),
            );
        }
        if !rule.script.is_empty() {
            script_names.insert(rule.script.clone());
        }
    }

    if layer.files.iter().all(is_unconditional) && layer.files.len() > 1 {
        report.note(
            file,
            &format!("{label}: several unconditional rules, only the last ever shows"),
        );
    }
}

fn is_unconditional(rule: &tachie_types::FileRule) -> bool {
    rule.hp_upper == 0
        && rule.hp_lower == 0
        && !rule.damage
        && !rule.action
        && rule.state == 0
        && rule.weapon == 0
        && rule.armor == 0
        && rule.note.is_empty()
        && rule.switch == 0
        && rule.script.is_empty()
}
