// isocss/src/commands/isolate.rs
//! Isolate command implementation.
//!
//! A run has three phases. Settings are resolved from the command line, the
//! configuration file and the working directory, and every precondition is
//! checked before any file is touched. Inputs are then expanded into a plan
//! of `(input, output)` pairs. Finally each planned file is read,
//! transformed and written in its own task; a failing file is reported and
//! does not stop its siblings.

use anyhow::{Context, Result, anyhow, bail};
use is_terminal::IsTerminal;
use log::{debug, info};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

use isocss_core::{
    EngineKind, IsolateConfig, IsolateError, IsolateOptions, LesscEngine, NamespaceEngine,
    PrefixClass, ScratchArea, build_engine, isolate_css,
};

use crate::cli::Cli;
use crate::ui::output_format;
use crate::utils::discovery::{self, FileFilter};
use crate::utils::paths::{self, PathError};
use crate::utils::project;

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

fn success_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Everything a run needs, after merging the command line over the config file.
#[derive(Debug)]
pub struct IsolateSettings {
    /// Canonical working directory.
    pub cwd: PathBuf,
    /// Inputs relative to `cwd`.
    pub inputs: Vec<PathBuf>,
    pub prefix: PrefixClass,
    pub extensions: Vec<String>,
    pub ignore: Option<Regex>,
    /// Absolute output directory.
    pub out_dir: Option<PathBuf>,
    pub up: usize,
    pub engine: EngineKind,
    pub lessc: Option<PathBuf>,
    pub options: IsolateOptions,
    pub force: bool,
    pub quiet: bool,
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

fn load_config(cli: &Cli, cwd: &Path) -> Result<IsolateConfig> {
    if let Some(path) = &cli.config {
        return IsolateConfig::load_from_file(cwd.join(path));
    }
    match IsolateConfig::discover(cwd)? {
        Some((path, config)) => {
            info!("Using configuration file {}", path.display());
            Ok(config)
        }
        None => Ok(IsolateConfig::default()),
    }
}

impl IsolateSettings {
    /// Resolves settings and checks every precondition of the run.
    pub fn resolve(cli: &Cli, cwd: &Path) -> Result<Self> {
        let cwd = cwd
            .canonicalize()
            .with_context(|| format!("Failed to resolve working directory {}", cwd.display()))?;
        let config = load_config(cli, &cwd)?;

        if cli.paths.is_empty() {
            bail!("No input files specified");
        }

        let out_dir = cli.out_dir.clone().or(config.out_dir.clone());
        let up = cli.up.or(config.up);
        if up.is_some() && out_dir.is_none() {
            bail!("--up option cannot be used without --out-dir");
        }
        let up = up.unwrap_or(0);

        let out_dir = match out_dir {
            Some(dir) => {
                let dir = cwd.join(dir);
                if cli.create_out_dir && !dir.exists() {
                    fs::create_dir_all(&dir).with_context(|| {
                        format!("Failed to create output directory {}", dir.display())
                    })?;
                }
                let meta = fs::metadata(&dir)
                    .with_context(|| format!("Output directory {} does not exist", dir.display()))?;
                if !meta.is_dir() {
                    bail!("Specified output directory {} is not a directory", dir.display());
                }
                Some(dir)
            }
            None => None,
        };

        let ignore = match cli.ignore.as_ref().or(config.ignore.as_ref()) {
            Some(pattern) => Some(
                Regex::new(pattern).with_context(|| format!("Invalid --ignore pattern '{}'", pattern))?,
            ),
            None => None,
        };

        let prefix = match cli.prefix_class.as_ref().or(config.prefix_class.as_ref()) {
            Some(class) => PrefixClass::new(class)?,
            None => project::default_prefix_class(&cwd)?,
        };

        let mut inputs = Vec::with_capacity(cli.paths.len());
        for path in &cli.paths {
            inputs.push(check_input(&cwd, path, up)?);
        }

        let extensions = if cli.extensions.is_empty() {
            config.extensions_or_default()
        } else {
            cli.extensions.iter().map(|e| normalize_extension(e)).collect()
        };

        let options = IsolateOptions {
            remove_root_from_selectors: cli.remove_root_selectors
                || config.options.remove_root_from_selectors,
            remove_source_maps: cli.remove_source_maps || config.options.remove_source_maps,
            pretty: cli.pretty || config.options.pretty,
        };

        let engine = cli.engine.map(EngineKind::from).or(config.engine).unwrap_or_default();
        let lessc = cli.lessc.clone().or(config.lessc);
        if engine == EngineKind::Lessc {
            check_lessc(lessc.as_deref())?;
        }

        Ok(Self {
            cwd,
            inputs,
            prefix,
            extensions,
            ignore,
            out_dir,
            up,
            engine,
            lessc,
            options,
            force: cli.force,
            quiet: cli.quiet,
        })
    }
}

/// Fails when the `lessc` backend is selected but its executable cannot be started.
fn check_lessc(program: Option<&Path>) -> Result<()> {
    // Never staged into, so no directory is created.
    let scratch = Arc::new(ScratchArea::new());
    let backend = match program {
        Some(program) => LesscEngine::with_program(program, scratch),
        None => LesscEngine::new(scratch),
    };
    if !backend.is_available() {
        bail!(
            "The {} engine needs '{}', which could not be run; install it or pass --lessc",
            EngineKind::Lessc.as_str(),
            backend.program().display()
        );
    }
    Ok(())
}

/// Validates one input path and returns it relative to `cwd`.
fn check_input(cwd: &Path, path: &Path, up: usize) -> Result<PathBuf> {
    let absolute = cwd.join(path);
    let meta = fs::metadata(&absolute)
        .with_context(|| format!("Input path {} does not exist", path.display()))?;
    if !(meta.is_file() || meta.is_dir()) {
        bail!("Input path {} is neither file nor directory", path.display());
    }

    let canonical = absolute
        .canonicalize()
        .with_context(|| format!("Failed to resolve input path {}", path.display()))?;
    let relative = paths::relative_to(cwd, &canonical)
        .map_err(|_| anyhow!("Files to process must not be outside current working directory: {}", path.display()))?;

    let components = paths::component_count(&relative);
    let too_high = if meta.is_file() { up >= components } else { up > components };
    if too_high {
        return Err(PathError::UpTooHigh { up, path: relative, components }.into());
    }
    Ok(relative)
}

/// One file of the run.
#[derive(Debug, Clone)]
pub struct PlannedFile {
    /// Relative to the working directory.
    pub input: PathBuf,
    /// Relative to the working directory when it lies inside it.
    pub output: PathBuf,
}

/// The per-file work of a run plus the files that failed while planning.
#[derive(Debug, Default)]
pub struct Plan {
    pub files: Vec<PlannedFile>,
    pub failures: Vec<(PathBuf, anyhow::Error)>,
    pub skipped: usize,
}

/// Expands the inputs into `(input, output)` pairs. Two inputs may not share an output.
pub fn plan(settings: &IsolateSettings) -> Plan {
    let filter = FileFilter::new(settings.extensions.clone(), settings.ignore.clone());
    let found = discovery::discover(&settings.cwd, &settings.inputs, &filter);
    debug!("Discovered {} file(s), skipped {}", found.files.len(), found.skipped);
    if found.files.is_empty() && !settings.quiet {
        warn_msg(format!(
            "No {} files found in the given paths",
            settings.extensions.join(", ")
        ));
    }

    let mut plan = Plan { skipped: found.skipped, ..Plan::default() };
    let mut claimed = HashSet::new();
    for candidate in found.files {
        let output = match paths::output_path(
            &candidate.relative,
            &candidate.extension,
            settings.out_dir.as_deref(),
            settings.up,
        ) {
            Ok(output) => output,
            Err(e) => {
                plan.failures.push((candidate.relative, e.into()));
                continue;
            }
        };
        let output = output
            .strip_prefix(&settings.cwd)
            .map(Path::to_path_buf)
            .unwrap_or(output);
        if !claimed.insert(output.clone()) {
            let err = anyhow!("Output {} is already produced by another input", output.display());
            plan.failures.push((candidate.relative, err));
            continue;
        }
        plan.files.push(PlannedFile { input: candidate.relative, output });
    }
    plan
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub isolated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

struct FileContext {
    cwd: PathBuf,
    prefix: PrefixClass,
    options: IsolateOptions,
    force: bool,
    quiet: bool,
    engine: Arc<dyn NamespaceEngine>,
}

async fn process_file(file: PlannedFile, ctx: Arc<FileContext>) -> Result<()> {
    let input = ctx.cwd.join(&file.input);
    let output = ctx.cwd.join(&file.output);

    if !ctx.force && tokio::fs::try_exists(&output).await.unwrap_or(false) {
        bail!("Output for css file '{}' already exists", file.output.display());
    }
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    if !ctx.quiet {
        info_msg(output_format::isolate_line(&file.input, &file.output));
    }

    let source = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {}", file.input.display()))?;

    let worker = Arc::clone(&ctx);
    let label = file.input.display().to_string();
    let css = tokio::task::spawn_blocking(move || {
        isolate_css(worker.engine.as_ref(), &source, &worker.prefix, &worker.options)
            .map_err(|e| e.in_file(label))
    })
    .await
    .context("Isolation task panicked")??;

    tokio::fs::write(&output, css)
        .await
        .with_context(|| format!("Failed to write {}", file.output.display()))?;
    debug!("Wrote {}", output.display());
    Ok(())
}

/// Runs every planned file concurrently and reports failures as they complete.
pub async fn execute(settings: &IsolateSettings, plan: Plan, scratch: Arc<ScratchArea>) -> RunSummary {
    let mut summary = RunSummary { skipped: plan.skipped, ..RunSummary::default() };

    for (path, err) in plan.failures {
        error_msg(format!("{}: {:#}", path.display(), err));
        summary.failed += 1;
    }

    let engine = build_engine(settings.engine, &settings.options, settings.lessc.as_deref(), scratch);
    info!(
        "Isolating {} file(s) under '{}' with the {} engine",
        plan.files.len(),
        settings.prefix.selector(),
        settings.engine.as_str()
    );
    let ctx = Arc::new(FileContext {
        cwd: settings.cwd.clone(),
        prefix: settings.prefix.clone(),
        options: settings.options,
        force: settings.force,
        quiet: settings.quiet,
        engine: Arc::from(engine),
    });

    let mut tasks = JoinSet::new();
    for file in plan.files {
        let ctx = Arc::clone(&ctx);
        tasks.spawn(async move {
            let input = file.input.clone();
            (input, process_file(file, ctx).await)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => summary.isolated += 1,
            Ok((input, Err(err))) => {
                // Core errors already carry the file name and their cause.
                let text = match err.downcast_ref::<IsolateError>() {
                    Some(core) => core.to_string(),
                    None => format!("{:#}", err),
                };
                if text.starts_with(&input.display().to_string()) {
                    error_msg(text);
                } else {
                    error_msg(format!("{}: {}", input.display(), text));
                }
                summary.failed += 1;
            }
            Err(join_err) => {
                error_msg(format!("Isolation task failed: {}", join_err));
                summary.failed += 1;
            }
        }
    }
    summary
}

/// Entry point of the isolate command. Returns `Err` only for failed preconditions.
pub async fn run_isolate(cli: &Cli, cwd: &Path) -> Result<RunSummary> {
    let settings = IsolateSettings::resolve(cli, cwd)?;
    debug!("Resolved settings: {:?}", settings);

    // Owned by the run; removed when this scope ends.
    let scratch = Arc::new(ScratchArea::new());
    let plan = plan(&settings);
    let summary = execute(&settings, plan, Arc::clone(&scratch)).await;

    let line = output_format::summary_line(summary.isolated, summary.skipped, summary.failed);
    if !summary.is_success() {
        error_msg(line);
    } else if !settings.quiet {
        success_msg(line);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["isocss"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn up_requires_out_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.css"), "a{}").unwrap();
        let err = IsolateSettings::resolve(&cli(&["-p", "w", "-u", "1", "a.css"]), dir.path()).unwrap_err();
        assert!(err.to_string().contains("--out-dir"));
    }

    #[test]
    fn out_dir_must_exist_unless_created() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.css"), "a{}").unwrap();
        assert!(IsolateSettings::resolve(&cli(&["-p", "w", "-o", "dist", "a.css"]), dir.path()).is_err());

        let settings =
            IsolateSettings::resolve(&cli(&["-p", "w", "-o", "dist", "-c", "a.css"]), dir.path()).unwrap();
        assert!(dir.path().join("dist").is_dir());
        assert_eq!(settings.inputs, vec![PathBuf::from("a.css")]);

        let err = IsolateSettings::resolve(&cli(&["-p", "w", "-o", "a.css", "a.css"]), dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn up_is_bounded_by_input_depth() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/ui")).unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("src/ui/a.css"), "a{}").unwrap();

        // A file keeps at least its name; a directory may be sliced off entirely.
        assert!(IsolateSettings::resolve(&cli(&["-p", "w", "-o", "dist", "-u", "2", "src/ui/a.css"]), dir.path()).is_ok());
        assert!(IsolateSettings::resolve(&cli(&["-p", "w", "-o", "dist", "-u", "3", "src/ui/a.css"]), dir.path()).is_err());
        assert!(IsolateSettings::resolve(&cli(&["-p", "w", "-o", "dist", "-u", "2", "src/ui"]), dir.path()).is_ok());
        assert!(IsolateSettings::resolve(&cli(&["-p", "w", "-o", "dist", "-u", "3", "src/ui"]), dir.path()).is_err());
    }

    #[test]
    fn rejects_missing_outside_and_invalid_inputs() {
        let dir = tempdir().unwrap();
        let work = dir.path().join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(dir.path().join("outside.css"), "a{}").unwrap();
        fs::write(work.join("a.css"), "a{}").unwrap();

        assert!(IsolateSettings::resolve(&cli(&["-p", "w", "nope.css"]), &work).is_err());
        let err = IsolateSettings::resolve(&cli(&["-p", "w", "../outside.css"]), &work).unwrap_err();
        assert!(err.to_string().contains("outside"));
        assert!(IsolateSettings::resolve(&cli(&["-p", "w", "-i", "(", "a.css"]), &work).is_err());
        assert!(IsolateSettings::resolve(&cli(&["-p", "9bad", "a.css"]), &work).is_err());
        // No prefix and no package.json.
        assert!(IsolateSettings::resolve(&cli(&["a.css"]), &work).is_err());
    }

    #[test]
    fn unavailable_lessc_is_a_precondition_failure() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.css"), "a{}").unwrap();
        let err = IsolateSettings::resolve(
            &cli(&["-p", "w", "--engine", "lessc", "--lessc", "isocss-missing-lessc", "a.css"]),
            dir.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("isocss-missing-lessc"), "{err}");
    }

    #[test]
    fn command_line_overrides_config_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.css"), "a{}").unwrap();
        fs::write(
            dir.path().join(".isocss.yml"),
            "prefix_class: from-file\nextensions: [\".less\"]\noptions:\n  remove_source_maps: true\n",
        )
        .unwrap();

        let settings = IsolateSettings::resolve(&cli(&["a.css"]), dir.path()).unwrap();
        assert_eq!(settings.prefix.as_str(), "from-file");
        assert_eq!(settings.extensions, vec![".less"]);
        assert!(settings.options.remove_source_maps);

        let settings =
            IsolateSettings::resolve(&cli(&["-p", "cli", "-e", "css", "-r", "a.css"]), dir.path()).unwrap();
        assert_eq!(settings.prefix.as_str(), "cli");
        assert_eq!(settings.extensions, vec![".css"]);
        assert!(settings.options.remove_source_maps);
        assert!(settings.options.remove_root_from_selectors);
    }

    #[test_log::test]
    fn plan_reports_colliding_outputs() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("a/x.css"), "a{}").unwrap();
        fs::write(dir.path().join("b/x.css"), "b{}").unwrap();

        let settings =
            IsolateSettings::resolve(&cli(&["-p", "w", "-o", "dist", "-u", "1", "a", "b"]), dir.path()).unwrap();
        let plan = plan(&settings);
        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.failures.len(), 1);
        assert_eq!(plan.files[0].output, PathBuf::from("dist/x.iso.css"));
    }
}
