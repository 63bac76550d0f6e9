//! Command implementations for the spamcheck CLI.

use std::fs;
use std::process::ExitCode;
use std::time::Instant;

use crate::analysis::analyzer::MessageNormalizer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::ml::classifier::ModelSelector;
use crate::pipeline::SpamPipeline;

/// Exit status when a message was rejected or could not be classified.
pub const REJECTED_EXIT_CODE: u8 = 2;

/// Execute a CLI command.
pub fn execute_command(args: SpamcheckArgs) -> Result<ExitCode> {
    match &args.command {
        Command::Classify(classify_args) => classify(classify_args.clone(), &args),
        Command::Normalize(normalize_args) => normalize(normalize_args.clone(), &args),
        Command::Batch(batch_args) => batch(batch_args.clone(), &args),
        Command::Info => info(&args),
    }
}

fn load_pipeline(cli_args: &SpamcheckArgs) -> Result<SpamPipeline> {
    let config = cli_args.load_config()?;
    SpamPipeline::from_config(&config)
}

/// Classify a single message.
fn classify(args: ClassifyArgs, cli_args: &SpamcheckArgs) -> Result<ExitCode> {
    let pipeline = load_pipeline(cli_args)?;

    match pipeline.classify_message(args.text(), args.model) {
        Ok(result) => {
            output_result(&ClassificationReport::new(&result), cli_args)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            output_result(&RejectionReport::new(&e), cli_args)?;
            Ok(ExitCode::from(REJECTED_EXIT_CODE))
        }
    }
}

/// Normalize a message. No artifacts are needed.
fn normalize(args: NormalizeArgs, cli_args: &SpamcheckArgs) -> Result<ExitCode> {
    let normalized = MessageNormalizer::new()?.normalize(&args.message);

    output_result(
        &NormalizationReport {
            token_count: normalized.token_count(),
            normalized_text: normalized.into_string(),
        },
        cli_args,
    )?;

    Ok(ExitCode::SUCCESS)
}

/// Classify each line of a file. Rejected lines are reported but do not fail
/// the run.
fn batch(args: BatchArgs, cli_args: &SpamcheckArgs) -> Result<ExitCode> {
    let pipeline = load_pipeline(cli_args)?;
    let content = fs::read_to_string(&args.file)?;
    let messages: Vec<&str> = content.lines().collect();

    let start_time = Instant::now();
    let outcomes = pipeline.classify_batch(&messages, args.model);
    tracing::info!(
        messages = messages.len(),
        model = args.model.as_str(),
        duration_ms = start_time.elapsed().as_millis() as u64,
        "batch classified"
    );

    for (i, outcome) in outcomes.iter().enumerate() {
        output_result(&BatchEntry::new(i + 1, outcome), cli_args)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Show the loaded artifacts.
fn info(cli_args: &SpamcheckArgs) -> Result<ExitCode> {
    let config = cli_args.load_config()?;
    let pipeline = SpamPipeline::from_config(&config)?;

    let model_info = |selector: ModelSelector| ModelInfo {
        display_name: selector.display_name(),
        description: pipeline.classifiers().model(selector).describe(),
    };

    output_result(
        &PipelineInfo {
            version: crate::VERSION,
            artifacts: config.artifacts.clone(),
            vectorizer: pipeline.vectorizer().name(),
            vocabulary_size: pipeline.dimension(),
            primary: model_info(ModelSelector::Primary),
            secondary: model_info(ModelSelector::Secondary),
        },
        cli_args,
    )?;

    Ok(ExitCode::SUCCESS)
}
