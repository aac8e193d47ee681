use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::data::TemplateData;
use crate::engine::TemplateEngine;
use crate::error::DocsError;
use crate::walker;

/// Template file suffix.
pub const DEFAULT_SUFFIX: &str = ".tpl";

/// Permissions of written output files.
pub const OUTPUT_MODE: u32 = 0o644;

/// Renders every template under a root directory next to itself.
pub struct DocsGenerator {
    root: PathBuf,
    suffix: String,
    dry_run: bool,
}

impl DocsGenerator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            dry_run: false,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes every template in traversal order and returns how many
    /// were rendered. Stops at the first failure; outputs written before it
    /// stay on disk.
    pub fn run(&self) -> Result<usize, DocsError> {
        if self.suffix.is_empty() {
            return Err(DocsError::EmptySuffix);
        }
        let templates = walker::find_templates(&self.root, &self.suffix)?;
        for template_path in &templates {
            self.generate_file(template_path)?;
        }
        Ok(templates.len())
    }

    /// Renders one template and writes the result without the suffix.
    pub fn generate_file(&self, template_path: &Path) -> Result<PathBuf, DocsError> {
        let name = self.template_name(template_path);
        info!("Processing {}...", name);

        let source = fs::read_to_string(template_path).map_err(|source| DocsError::Read {
            path: template_path.to_path_buf(),
            source,
        })?;

        let mut engine = TemplateEngine::new()?;
        let data = TemplateData::assemble().map_err(|source| DocsError::Schema {
            name: name.clone(),
            source,
        })?;
        let rendered = engine.render(&name, source, &data)?;

        let output_path = self.output_path(template_path);
        if self.dry_run {
            info!("[DRY RUN] Would write: {:?}", output_path);
        } else {
            write_output(&output_path, rendered.as_bytes()).map_err(|source| {
                DocsError::Write {
                    path: output_path.clone(),
                    source,
                }
            })?;
            info!("{:?}", output_path);
        }
        Ok(output_path)
    }

    /// Name a template is registered under: its path relative to the root.
    fn template_name(&self, template_path: &Path) -> String {
        template_path
            .strip_prefix(&self.root)
            .unwrap_or(template_path)
            .to_string_lossy()
            .into_owned()
    }

    fn output_path(&self, template_path: &Path) -> PathBuf {
        let file_name = template_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stripped = file_name.strip_suffix(&self.suffix).unwrap_or(&file_name);
        template_path.with_file_name(stripped)
    }
}

/// Creates or truncates `path` and writes `contents`; new files get
/// [`OUTPUT_MODE`].
fn write_output(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OUTPUT_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)
}
