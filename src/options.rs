//! Fill run configuration.

use std::path::PathBuf;

/// Output path used when none is given.
pub const DEFAULT_OUTPUT: &str = "output.pptx";

/// Options for [`fill_presentation`](crate::fill_presentation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOptions {
    /// Template presentation to read
    pub template: PathBuf,

    /// JSON or CSV data source
    pub data: PathBuf,

    /// Where the filled presentation is written
    pub output: PathBuf,

    /// Copy the template to `<template>.bak` before filling
    pub backup: bool,
}

impl FillOptions {
    /// Create options writing to `output.pptx` without a backup.
    pub fn new(template: impl Into<PathBuf>, data: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            data: data.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            backup: false,
        }
    }

    /// Set the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Enable or disable the template backup.
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }
}
