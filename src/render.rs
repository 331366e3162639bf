//! Template rendering and legacy output encoding.
//!
//! Templates live in a single directory as `<name>.in` files. The output
//! file is called `<name>` and is written to the output directory.
//!
//! `macros.c.in` holds shared macro definitions. It is loaded so other
//! templates can `{% import "macros.c.in" as macros %}`, but it is never
//! rendered on its own.
//!
//! # Output format
//!
//! The PCAD ASCII importer in Altium Designer only accepts ISO-8859-1 text
//! with CRLF line endings and spins forever on anything else, so every
//! rendered file is converted before it hits the disk.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{GenResult, GenerateError};

/// File extension marking a template.
pub const TEMPLATE_EXTENSION: &str = "in";

/// Template holding shared macros, not directly renderable.
pub const RESERVED_TEMPLATE: &str = "macros.c";

/// Renders named templates into legacy-encoded library files.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
    templates: BTreeSet<String>,
    /// Templates that failed to parse, with the parse error.
    broken: BTreeMap<String, String>,
    output_dir: PathBuf,
    globals: Context,
}

impl Renderer {
    /// Loads every `*.in` file from `template_dir`.
    ///
    /// Each template is parsed on its own, together with `macros.c.in`. A
    /// template that fails to parse is still listed, and the parse error is
    /// returned when it is rendered, so it never blocks the others.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or a template file
    /// cannot be read.
    pub fn discover(
        template_dir: impl AsRef<Path>,
        output_dir: impl Into<PathBuf>,
    ) -> GenResult<Self> {
        let template_dir = template_dir.as_ref();
        if !template_dir.is_dir() {
            return Err(GenerateError::TemplateDirNotFound {
                path: template_dir.to_path_buf(),
            });
        }

        let mut shared = Vec::new();
        let mut renderable = Vec::new();
        for (path, file_name) in template_files(template_dir)? {
            let source =
                std::fs::read_to_string(&path).map_err(|e| GenerateError::file_read(&path, e))?;
            match template_name(&file_name) {
                Some(name) if name == RESERVED_TEMPLATE => shared.push((file_name, source)),
                Some(name) => renderable.push((name, file_name, source)),
                None => {}
            }
        }

        if let Err(e) = Tera::default().add_raw_templates(shared.clone()) {
            tracing::warn!(
                template = RESERVED_TEMPLATE,
                error = %error_chain(&e),
                "Shared macros failed to parse, templates importing them will fail"
            );
            shared.clear();
        }

        let mut templates = BTreeSet::new();
        let mut broken = BTreeMap::new();
        let mut loaded = shared.clone();
        for (name, file_name, source) in renderable {
            let mut candidate = shared.clone();
            candidate.push((file_name.clone(), source.clone()));

            match Tera::default().add_raw_templates(candidate) {
                Ok(()) => loaded.push((file_name, source)),
                Err(e) => {
                    let message = error_chain(&e);
                    tracing::warn!(template = %name, error = %message, "Template failed to parse");
                    broken.insert(name.clone(), message);
                }
            }
            templates.insert(name);
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(loaded)
            .map_err(|e| GenerateError::render(template_dir.display().to_string(), e))?;

        tracing::debug!(
            dir = %template_dir.display(),
            templates = ?templates,
            broken = ?broken.keys().collect::<Vec<_>>(),
            "Templates discovered"
        );

        Ok(Self {
            tera,
            templates,
            broken,
            output_dir: output_dir.into(),
            globals: Context::new(),
        })
    }

    /// Sets variables available to every template.
    #[must_use]
    pub fn with_globals(mut self, globals: &BTreeMap<String, String>) -> Self {
        for (key, value) in globals {
            self.globals.insert(key, value);
        }
        self
    }

    /// Names of the directly renderable templates.
    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(String::as_str)
    }

    /// Returns `true` if `name` can be rendered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains(name)
    }

    /// Directory output files are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders a template to a UTF-8 string.
    ///
    /// `values` must serialise to a map; its keys become template variables
    /// and shadow globals of the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown, failed to parse, or
    /// rendering fails.
    pub fn render_to_string<T: Serialize>(&self, name: &str, values: &T) -> GenResult<String> {
        if !self.contains(name) {
            return Err(GenerateError::template_not_found(name));
        }
        if let Some(message) = self.broken.get(name) {
            return Err(GenerateError::TemplateParse {
                name: name.to_string(),
                message: message.clone(),
            });
        }

        let mut context = self.globals.clone();
        context.extend(Context::from_serialize(values).map_err(|e| GenerateError::render(name, e))?);

        self.tera
            .render(&format!("{name}.{TEMPLATE_EXTENSION}"), &context)
            .map_err(|e| GenerateError::render(name, e))
    }

    /// Renders a template and writes `<output_dir>/<name>`, overwriting it.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails, the output contains characters
    /// outside Windows-1252, or the file cannot be written.
    pub fn render<T: Serialize>(&self, name: &str, values: &T) -> GenResult<PathBuf> {
        let text = self.render_to_string(name, values)?;
        let path = self.output_dir.join(name);

        let bytes = to_legacy_bytes(&text).ok_or_else(|| GenerateError::Encoding {
            path: path.clone(),
        })?;

        std::fs::write(&path, &bytes).map_err(|e| GenerateError::file_write(&path, e))?;

        tracing::info!(
            template = name,
            path = %path.display(),
            bytes = bytes.len(),
            "Library file written"
        );

        Ok(path)
    }
}

/// Lists `(path, file name)` of every template file in `dir`, sorted.
fn template_files(dir: &Path) -> GenResult<Vec<(PathBuf, String)>> {
    let pattern = format!(
        "{}/*.{TEMPLATE_EXTENSION}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let paths = glob::glob(&pattern).map_err(|_| GenerateError::TemplateDirNotFound {
        path: dir.to_path_buf(),
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            GenerateError::file_read(path, e.into_error())
        })?;
        if !path.is_file() {
            continue;
        }
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            let file_name = file_name.to_string();
            files.push((path, file_name));
        }
    }
    Ok(files)
}

/// Strips the template extension: `resistors.lia.in` → `resistors.lia`.
fn template_name(file_name: &str) -> Option<String> {
    file_name
        .strip_suffix(TEMPLATE_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Flattens a Tera error and its causes into one line.
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Converts line endings to CRLF.
///
/// Existing CRLF pairs are kept and lone CR or LF become CRLF.
#[must_use]
pub fn to_crlf(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "\r\n")
}

/// Converts rendered text to the legacy output format: CRLF line endings,
/// Windows-1252 bytes.
///
/// Returns `None` if a character has no Windows-1252 representation.
#[must_use]
pub fn to_legacy_bytes(text: &str) -> Option<Vec<u8>> {
    let text = to_crlf(text);
    let (bytes, _, unmappable) = encoding_rs::WINDOWS_1252.encode(&text);
    if unmappable {
        return None;
    }
    Some(bytes.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_name_strips_marker() {
        assert_eq!(template_name("resistors.lia.in").as_deref(), Some("resistors.lia"));
        assert_eq!(template_name("macros.c.in").as_deref(), Some("macros.c"));
        assert_eq!(template_name("plain.in").as_deref(), Some("plain"));
        assert_eq!(template_name(".in"), None);
        assert_eq!(template_name("resistors.lia"), None);
    }

    #[test]
    fn crlf_conversion() {
        assert_eq!(to_crlf("a\nb\n"), "a\r\nb\r\n");
        assert_eq!(to_crlf("a\r\nb"), "a\r\nb");
        assert_eq!(to_crlf("no newline"), "no newline");
        assert_eq!(to_crlf("old\rmac\r"), "old\r\nmac\r\n");
        assert_eq!(to_crlf("mixed\r\n\r\n"), "mixed\r\n\r\n");
    }

    #[test]
    fn legacy_bytes_are_single_byte() {
        let bytes = to_legacy_bytes("µF é\n").unwrap();
        assert_eq!(bytes, vec![0xB5, b'F', b' ', 0xE9, b'\r', b'\n']);
    }

    #[test]
    fn unmappable_characters_are_rejected() {
        assert!(to_legacy_bytes("Ω").is_none());
        assert!(to_legacy_bytes("日本").is_none());
    }
}
