//! Configuration errors and collected validation diagnostics.

use super::FieldPath;
use owo_colors::{OwoColorize, Stream, Style};
use std::{fmt, io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("config file is not valid TOML")]
    Toml(#[from] toml::de::Error),

    // no #[source]: the diagnostics print themselves in full
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected config key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

/// Problems found by the section validators, reported together.
///
/// Printed grouped by table, in the order the sections were validated:
///
/// ```text
/// invalid syndic.toml (2 problems)
///   [feed]
///     item_link: must contain `{id}`
///       hint: e.g. "{base_url}/content/{id}"
///   [serve]
///     workers: must be greater than 0
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message,
            hint,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        write!(
            f,
            "{} ({count} problem{})",
            "invalid syndic.toml"
                .if_supports_color(Stream::Stderr, |t| t.style(Style::new().red().bold())),
            if count == 1 { "" } else { "s" }
        )?;

        let mut section = None;
        for diag in &self.errors {
            if section != Some(diag.field.section()) {
                section = Some(diag.field.section());
                let header = format!("[{}]", diag.field.section());
                write!(f, "\n  {}", header.if_supports_color(Stream::Stderr, |h| h.dimmed()))?;
            }
            let key = diag.field.key();
            write!(
                f,
                "\n    {}: {}",
                key.if_supports_color(Stream::Stderr, |k| k.cyan()),
                diag.message
            )?;
            if let Some(hint) = &diag.hint {
                let label = "hint:".if_supports_color(Stream::Stderr, |l| l.yellow());
                write!(f, "\n      {label} {hint}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
