//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{OutputFormat, SpamcheckArgs};
use crate::error::{ClassificationError, Result};
use crate::pipeline::ClassificationResult;
use crate::pipeline::config::ArtifactPaths;

/// A command result that can be printed for humans as well as serialized.
pub trait Report: Serialize {
    /// Multi-line human-readable rendering, without a trailing newline.
    fn human(&self) -> String;
}

/// A successful classification.
#[derive(Debug, Serialize)]
pub struct ClassificationReport<'a> {
    pub model_name: &'static str,
    #[serde(flatten)]
    pub result: &'a ClassificationResult,
}

impl<'a> ClassificationReport<'a> {
    pub fn new(result: &'a ClassificationResult) -> Self {
        ClassificationReport {
            model_name: result.model_used.display_name(),
            result,
        }
    }

    fn headline(&self) -> &'static str {
        if self.result.is_spam() {
            "SPAM DETECTED"
        } else {
            "NORMAL MESSAGE"
        }
    }
}

impl Report for ClassificationReport<'_> {
    fn human(&self) -> String {
        format!(
            "{}\nConfidence: {:.1}% ({})\n{} • {} words processed",
            self.headline(),
            self.result.confidence,
            self.result.confidence_tier,
            self.model_name,
            self.result.token_count
        )
    }
}

/// A request that produced no classification.
#[derive(Debug, Serialize)]
pub struct RejectionReport<'a> {
    pub error: &'a ClassificationError,
    pub message: String,
}

impl<'a> RejectionReport<'a> {
    pub fn new(error: &'a ClassificationError) -> Self {
        RejectionReport {
            error,
            message: error.to_string(),
        }
    }
}

impl Report for RejectionReport<'_> {
    fn human(&self) -> String {
        match self.error {
            ClassificationError::VectorizationFailure { diagnostic }
            | ClassificationError::ClassificationFailure { diagnostic } => {
                format!("Classification Error\nError: {diagnostic}...")
            }
            _ => self.message.clone(),
        }
    }
}

/// Normalized form of a message.
#[derive(Debug, Serialize)]
pub struct NormalizationReport {
    pub normalized_text: String,
    pub token_count: usize,
}

impl Report for NormalizationReport {
    fn human(&self) -> String {
        format!(
            "{}\n{} words processed",
            self.normalized_text, self.token_count
        )
    }
}

/// One line of a batch run.
#[derive(Debug, Serialize)]
pub struct BatchEntry<'a> {
    /// 1-based line number in the input file.
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ClassificationReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionReport<'a>>,
}

impl<'a> BatchEntry<'a> {
    pub fn new(line: usize, outcome: &'a std::result::Result<ClassificationResult, ClassificationError>) -> Self {
        match outcome {
            Ok(result) => BatchEntry {
                line,
                result: Some(ClassificationReport::new(result)),
                rejection: None,
            },
            Err(error) => BatchEntry {
                line,
                result: None,
                rejection: Some(RejectionReport::new(error)),
            },
        }
    }
}

impl Report for BatchEntry<'_> {
    fn human(&self) -> String {
        match (&self.result, &self.rejection) {
            (Some(report), _) => format!(
                "{}: {} ({:.1}%)",
                self.line,
                report.headline(),
                report.result.confidence
            ),
            (None, Some(rejection)) => format!("{}: {}", self.line, rejection.message),
            (None, None) => format!("{}:", self.line),
        }
    }
}

/// Description of one loaded model.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub display_name: &'static str,
    pub description: String,
}

/// Loaded artifacts.
#[derive(Debug, Serialize)]
pub struct PipelineInfo {
    pub version: &'static str,
    pub artifacts: ArtifactPaths,
    pub vectorizer: &'static str,
    pub vocabulary_size: usize,
    pub primary: ModelInfo,
    pub secondary: ModelInfo,
}

impl Report for PipelineInfo {
    fn human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "spamcheck {}", self.version);
        let _ = writeln!(out, "════════════════");
        let _ = writeln!(
            out,
            "Vectorizer: {} ({} terms) from {}",
            self.vectorizer,
            self.vocabulary_size,
            self.artifacts.vectorizer.display()
        );
        let _ = writeln!(
            out,
            "Primary:    {} - {} from {}",
            self.primary.display_name,
            self.primary.description,
            self.artifacts.primary_model.display()
        );
        let _ = write!(
            out,
            "Secondary:  {} - {} from {}",
            self.secondary.display_name,
            self.secondary.description,
            self.artifacts.secondary_model.display()
        );
        out
    }
}

/// Render a result in the requested format.
pub fn render<T: Report>(result: &T, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(result.human()),
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Report>(result: &T, args: &SpamcheckArgs) -> Result<()> {
    println!("{}", render(result, args.output_format, args.pretty)?);
    Ok(())
}
