//! Orchestrator for converting a project tree.

use crate::cli::Args;
use crate::config::{
    Config, HELPER_EXT, MARKUP_EXT, SCRIPT_EXTS, SOURCE_STYLE_EXT, STYLE_EXT, VUE_EXT,
};
use crate::output::{FileEvent, OutputFormatter};
use axml_transformer::ModuleBinding;
use convert_diagnostics::warning_count;
use miette::{IntoDiagnostic, Result, WrapErr};
use rustc_hash::FxHashMap;
use script_parser::{parse_script, ScriptKind};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use vue_codegen::{DECLARE_DTS, DECLARE_DTS_FILE, STYLE_PLACEHOLDER};

/// Result of a conversion run.
#[derive(Debug, Default, Serialize)]
pub struct ConvertSummary {
    /// Files converted to a new form.
    pub converted: usize,
    /// Files copied unchanged.
    pub copied: usize,
    /// Files whose pipeline failed.
    pub failed: usize,
    /// Conversion diagnostics at warning level or above.
    pub warnings: usize,
    /// Time taken.
    pub duration_ms: u64,
}

/// Time spent per kind of work, for `--timings`.
#[derive(Debug, Default)]
struct Timings {
    markup: Duration,
    scripts: Duration,
    copies: Duration,
}

/// A directory entry that survived the ignore filter.
#[derive(Debug)]
struct Entry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

impl Entry {
    fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|e| e.to_str())
    }

    fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    fn has_extension(&self, ext: &str) -> bool {
        !self.is_dir && self.extension() == Some(ext)
    }
}

/// Orchestrator for running axml2vue.
pub struct Orchestrator {
    /// Configuration.
    config: Config,
    /// CLI arguments.
    args: Args,
    /// Output formatter.
    formatter: OutputFormatter,
    timings: Timings,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::load(&args)?;
        let formatter = OutputFormatter::new(args.format, args.is_verbose());

        Ok(Self {
            config,
            args,
            formatter,
            timings: Timings::default(),
        })
    }

    /// Convert the whole input tree.
    pub async fn run(&mut self) -> Result<ConvertSummary> {
        let start = Instant::now();
        let mut summary = ConvertSummary::default();

        if self.args.is_verbose() && self.formatter_is_human() {
            eprintln!(
                "Converting {} -> {}",
                self.config.input.display(),
                self.config.output.display()
            );
        }

        tokio::fs::create_dir_all(&self.config.output)
            .await
            .into_diagnostic()
            .wrap_err_with(|| {
                format!(
                    "failed to create output directory {}",
                    self.config.output.display()
                )
            })?;

        let mut worklist = vec![(self.config.input.clone(), self.config.output.clone())];
        while let Some((input_dir, output_dir)) = worklist.pop() {
            match self
                .convert_directory(&input_dir, &output_dir, &mut summary)
                .await
            {
                Ok(subdirs) => worklist.extend(subdirs.into_iter().rev()),
                Err(error) => {
                    summary.failed += 1;
                    self.formatter.print_failure(&input_dir, &error);
                }
            }
        }

        if self.config.declarations {
            let path = self.config.output.join(DECLARE_DTS_FILE);
            tokio::fs::write(&path, DECLARE_DTS)
                .await
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;

        if self.args.timings {
            eprintln!(
                "\nTiming: markup {}ms, scripts {}ms, copies {}ms, total {}ms",
                self.timings.markup.as_millis(),
                self.timings.scripts.as_millis(),
                self.timings.copies.as_millis(),
                summary.duration_ms
            );
        }

        self.formatter.print_summary(&summary);

        Ok(summary)
    }

    fn formatter_is_human(&self) -> bool {
        matches!(
            self.args.format,
            crate::cli::OutputFormat::Human | crate::cli::OutputFormat::HumanVerbose
        )
    }

    /// Convert one directory and return its subdirectories to visit.
    ///
    /// Markup runs first so that every script sees the module bindings of
    /// its sibling markup file.
    async fn convert_directory(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
        summary: &mut ConvertSummary,
    ) -> Result<Vec<(PathBuf, PathBuf)>> {
        let entries = self.read_entries(input_dir).await?;
        tokio::fs::create_dir_all(output_dir)
            .await
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to create {}", output_dir.display()))?;

        let mut bindings: FxHashMap<String, Vec<ModuleBinding>> = FxHashMap::default();

        let started = Instant::now();
        for entry in entries.iter().filter(|e| e.has_extension(MARKUP_EXT)) {
            match self.convert_markup(entry, input_dir, output_dir, summary).await {
                Ok(module_bindings) => {
                    if !module_bindings.is_empty() {
                        bindings.insert(entry.stem().to_string(), module_bindings);
                    }
                }
                Err(error) => self.fail(summary, &entry.path, &error),
            }
        }
        self.timings.markup += started.elapsed();

        let started = Instant::now();
        for entry in entries.iter().filter(|e| e.has_extension(HELPER_EXT)) {
            if let Err(error) = self.copy_file(entry, output_dir, summary).await {
                self.fail(summary, &entry.path, &error);
            }
        }
        self.timings.copies += started.elapsed();

        let mut subdirs = Vec::new();
        for entry in &entries {
            if entry.is_dir {
                subdirs.push((entry.path.clone(), output_dir.join(&entry.name)));
                continue;
            }
            match entry.extension() {
                Some(ext) if ext == MARKUP_EXT || ext == HELPER_EXT => {}
                Some(ext) if SCRIPT_EXTS.contains(&ext) => {
                    let started = Instant::now();
                    let module_bindings = bindings
                        .get(entry.stem())
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    if let Err(error) = self
                        .convert_script(entry, output_dir, module_bindings, summary)
                        .await
                    {
                        self.fail(summary, &entry.path, &error);
                    }
                    self.timings.scripts += started.elapsed();
                }
                _ => {
                    let started = Instant::now();
                    if let Err(error) = self.copy_file(entry, output_dir, summary).await {
                        self.fail(summary, &entry.path, &error);
                    }
                    self.timings.copies += started.elapsed();
                }
            }
        }

        Ok(subdirs)
    }

    /// List a directory, sorted by name, without ignored entries.
    async fn read_entries(&self, dir: &Path) -> Result<Vec<Entry>> {
        let mut read_dir = tokio::fs::read_dir(dir)
            .await
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read directory {}", dir.display()))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.into_diagnostic()? {
            let path = entry.path();
            let relative = path.strip_prefix(&self.config.input).unwrap_or(&path);
            if self.config.is_ignored(relative) {
                continue;
            }
            let is_dir = entry.file_type().await.into_diagnostic()?.is_dir();
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Convert `<base>.axml` into `<base>.vue` and make sure `<base>.css` exists.
    async fn convert_markup(
        &self,
        entry: &Entry,
        input_dir: &Path,
        output_dir: &Path,
        summary: &mut ConvertSummary,
    ) -> Result<Vec<ModuleBinding>> {
        let source = read_source(&entry.path).await?;
        let root = axml_parser::parse(&source);
        let output = axml_transformer::transform(&root);

        self.formatter
            .print_diagnostics(&entry.path, &source, &output.diagnostics);
        summary.warnings += warning_count(&output.diagnostics);

        let base = entry.stem();
        let target = output_dir.join(format!("{base}.{VUE_EXT}"));
        let vue = vue_codegen::generate_vue_file(&output.template, base);
        write_output(&target, &vue).await?;

        let style = output_dir.join(format!("{base}.{STYLE_EXT}"));
        if !tokio::fs::try_exists(&style).await.unwrap_or(false) {
            let source_style = input_dir.join(format!("{base}.{SOURCE_STYLE_EXT}"));
            let contents = match tokio::fs::read_to_string(&source_style).await {
                Ok(contents) => contents,
                Err(_) => STYLE_PLACEHOLDER.to_string(),
            };
            write_output(&style, &contents).await?;
        }

        summary.converted += 1;
        self.formatter
            .print_file_event(FileEvent::Converted, &entry.path, &target);
        Ok(output.module_bindings)
    }

    /// Convert a component or utility script, or copy it unchanged.
    async fn convert_script(
        &self,
        entry: &Entry,
        output_dir: &Path,
        module_bindings: &[ModuleBinding],
        summary: &mut ConvertSummary,
    ) -> Result<()> {
        let source = read_source(&entry.path).await?;
        let kind = ScriptKind::from_path(&entry.path).unwrap_or(ScriptKind::JavaScript);
        let ast = parse_script(&source, kind)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to parse {}", entry.path.display()))?;

        let target = output_dir.join(&entry.name);
        let (code, event) = if let Some(description) =
            script_transformer::transform_script(&ast, module_bindings)
        {
            self.formatter
                .print_diagnostics(&entry.path, &source, &description.diagnostics);
            summary.warnings += warning_count(&description.diagnostics);
            (
                vue_codegen::generate_component(&description),
                FileEvent::Converted,
            )
        } else if let Some(module) = script_transformer::transform_utility_module(&ast) {
            (vue_codegen::generate_utility(&module), FileEvent::Converted)
        } else {
            (source, FileEvent::Copied)
        };

        write_output(&target, &code).await?;
        match event {
            FileEvent::Converted => summary.converted += 1,
            FileEvent::Copied => summary.copied += 1,
        }
        self.formatter.print_file_event(event, &entry.path, &target);
        Ok(())
    }

    async fn copy_file(
        &self,
        entry: &Entry,
        output_dir: &Path,
        summary: &mut ConvertSummary,
    ) -> Result<()> {
        let target = output_dir.join(&entry.name);
        tokio::fs::copy(&entry.path, &target)
            .await
            .into_diagnostic()
            .wrap_err_with(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path.display(),
                    target.display()
                )
            })?;
        summary.copied += 1;
        self.formatter
            .print_file_event(FileEvent::Copied, &entry.path, &target);
        Ok(())
    }

    fn fail(&self, summary: &mut ConvertSummary, file: &Path, error: &miette::Report) {
        summary.failed += 1;
        self.formatter.print_failure(file, error);
    }
}

async fn read_source(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))
}

async fn write_output(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {}", path.display()))
}
