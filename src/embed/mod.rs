//! Run-level pipeline: walk the input tree, read each directory's index file,
//! copy or convert the images into the output tree and write their tags.
//!
//! Directories are independent of each other and may run on the rayon pool.
//! Within a directory every image is finished before the next one starts.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::diagnostics::{Diagnostic, Severity};
use crate::metadata::{self, Dimensions};
use crate::picasa::{load_image_records, ImageRecord, PicasaIni};
use crate::scanner::{discover_image_directories, image_dimensions, ImageDirectory};
use crate::tools::{self, ToolInvocation};

/// Totals and diagnostics of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmbedSummary {
    pub directories: usize,
    pub directories_skipped: usize,
    pub images: usize,
    pub tagged: usize,
    pub untagged: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Tool commands that would have run, filled in dry-run mode only.
    pub planned: Vec<ToolInvocation>,
}

impl EmbedSummary {
    fn merge(mut self, other: EmbedSummary) -> Self {
        self.directories += other.directories;
        self.directories_skipped += other.directories_skipped;
        self.images += other.images;
        self.tagged += other.tagged;
        self.untagged += other.untagged;
        self.diagnostics.extend(other.diagnostics);
        self.planned.extend(other.planned);
        self
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }

    pub fn warnings(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
            .count()
    }
}

/// Reject the argument combinations that make a run meaningless.
pub fn validate_directories(input: &Path, output: &Path) -> Result<()> {
    if !input.is_dir() {
        bail!("Input {} is not a directory", input.display());
    }
    if !output.is_dir() {
        bail!("Output {} is not a directory", output.display());
    }

    let input_real = input
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", input.display()))?;
    let output_real = output
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", output.display()))?;
    if input_real == output_real {
        bail!("Input and output directories are the same");
    }

    Ok(())
}

pub struct Embedder {
    config: Config,
    dry_run: bool,
}

impl Embedder {
    pub fn new(config: Config, dry_run: bool) -> Self {
        Self { config, dry_run }
    }

    pub fn run(&self, input: &Path, output: &Path) -> Result<EmbedSummary> {
        let directories = discover_image_directories(input, &self.config.scanner.image_extensions)?;
        info!(
            "Found {} directories with images under {}",
            directories.len(),
            input.display()
        );

        let process = |directory: &ImageDirectory| {
            self.process_directory(directory, input, output)
                .unwrap_or_else(|e| {
                    error!("Failed to process {}: {:#}", directory.path.display(), e);
                    EmbedSummary {
                        directories: 1,
                        directories_skipped: 1,
                        ..EmbedSummary::default()
                    }
                })
        };

        let summaries: Vec<EmbedSummary> = if self.config.scanner.parallel {
            directories.par_iter().map(process).collect()
        } else {
            directories.iter().map(process).collect()
        };

        Ok(summaries
            .into_iter()
            .fold(EmbedSummary::default(), EmbedSummary::merge))
    }

    fn process_directory(
        &self,
        directory: &ImageDirectory,
        input_root: &Path,
        output_root: &Path,
    ) -> Result<EmbedSummary> {
        let mut summary = EmbedSummary {
            directories: 1,
            ..EmbedSummary::default()
        };

        info!("Processing directory: {}", directory.path.display());

        let index_path = directory.path.join(&self.config.scanner.index_filename);
        let ini = match PicasaIni::load(&index_path) {
            Ok(ini) => ini,
            Err(e) => {
                summary.directories_skipped = 1;
                summary.report(Diagnostic::IndexUnreadable {
                    path: index_path,
                    reason: e.to_string(),
                });
                return Ok(summary);
            }
        };

        let mut diagnostics = Vec::new();
        let records = load_image_records(
            &ini,
            &index_path,
            &self.config.embed,
            &self.config.scanner,
            |path| path.is_file(),
            &mut diagnostics,
        );
        for diagnostic in diagnostics {
            summary.report(diagnostic);
        }

        let relative = directory
            .path
            .strip_prefix(input_root)
            .context("Directory outside the input tree")?;
        let output_dir = output_root.join(relative);
        if !self.dry_run {
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("Failed to create {}", output_dir.display()))?;
        }

        for file_name in &directory.file_names {
            self.process_image(&directory.path, &output_dir, file_name, &records, &mut summary);
        }

        Ok(summary)
    }

    fn process_image(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        file_name: &str,
        records: &HashMap<String, ImageRecord>,
        summary: &mut EmbedSummary,
    ) {
        summary.images += 1;

        let input_file = input_dir.join(file_name);
        let Some(output_file) = self.place_output(&input_file, output_dir.join(file_name), summary)
        else {
            summary.untagged += 1;
            return;
        };

        let Some(record) = records.get(file_name) else {
            summary.untagged += 1;
            summary.report(Diagnostic::NoIndexEntry { path: input_file });
            return;
        };

        let dimensions = if metadata::needs_dimensions(record, &self.config.embed) {
            self.lookup_dimensions(&input_file, record, summary)
        } else {
            None
        };

        let Some(tag_args) = metadata::serialize(record, dimensions, &self.config.embed) else {
            summary.untagged += 1;
            summary.report(Diagnostic::NothingToEmbed { path: input_file });
            return;
        };

        let invocation = tools::tag_writer(
            &self.config.tools,
            self.config.embed.dialect,
            tag_args,
            &output_file,
        );

        if self.execute(invocation, &output_file, summary) {
            summary.tagged += 1;
        } else {
            summary.untagged += 1;
        }
    }

    /// Copy or convert the image into the output tree. Returns the path the
    /// tags should be written to.
    fn place_output(
        &self,
        input_file: &Path,
        output_file: PathBuf,
        summary: &mut EmbedSummary,
    ) -> Option<PathBuf> {
        // Convert unconditionally, this also re-compresses same-format files
        if let Some(format) = &self.config.output.format {
            let converted = tools::converted_path(&output_file, format);
            let invocation =
                tools::converter(&self.config.tools, &self.config.output.quality, input_file, &converted);
            return self.execute(invocation, input_file, summary).then_some(converted);
        }

        if self.dry_run {
            return Some(output_file);
        }

        match std::fs::copy(input_file, &output_file) {
            Ok(_) => Some(output_file),
            Err(e) => {
                summary.report(Diagnostic::CopyFailed {
                    path: input_file.to_path_buf(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn lookup_dimensions(
        &self,
        input_file: &Path,
        record: &ImageRecord,
        summary: &mut EmbedSummary,
    ) -> Option<Dimensions> {
        match image_dimensions(input_file) {
            Ok(dimensions) => {
                for face in &record.faces {
                    let px = face.rect.pixel_sized(dimensions.width, dimensions.height);
                    debug!(
                        "{}: face rectangle (x: {}, y: {}, w: {}, h: {}): {}",
                        input_file.display(),
                        px.x,
                        px.y,
                        px.w,
                        px.h,
                        face.name
                    );
                }
                Some(dimensions)
            }
            Err(e) => {
                summary.report(Diagnostic::DimensionsUnavailable {
                    path: input_file.to_path_buf(),
                    reason: format!("{:#}", e),
                });
                None
            }
        }
    }

    /// Run a tool, or record it when dry-running. Returns whether it
    /// succeeded.
    fn execute(&self, invocation: ToolInvocation, subject: &Path, summary: &mut EmbedSummary) -> bool {
        if self.dry_run {
            info!("[dry-run] {}", invocation.display());
            summary.planned.push(invocation);
            return true;
        }

        debug!("{}", invocation.display());
        match invocation.run() {
            Ok(()) => true,
            Err(e) => {
                summary.report(Diagnostic::ToolFailed {
                    tool: invocation.program.clone(),
                    path: subject.to_path_buf(),
                    reason: e.to_string(),
                });
                false
            }
        }
    }
}
