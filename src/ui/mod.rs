//! User interface module - run summaries and status output.
//!
//! Stdout carries either the summary or, with `--print-tag`, nothing but the
//! image tag. Logs go to stderr through `tracing`.

use console::style;

use crate::cli::orchestration::PipelineOutcome;

pub mod formatter;

pub use formatter::{
    display_available_services, display_error, display_tag_decision, render_outcome,
    render_tag_decision, render_tag_headline,
};

/// Print the summary of a pipeline run.
pub fn display_outcome(outcome: &PipelineOutcome, dry_run: bool) {
    let heading = if dry_run {
        "Dry run - nothing was built, pushed or tagged:"
    } else {
        "Pipeline decisions:"
    };
    println!("\n{}", style(heading).bold());
    for line in render_outcome(outcome) {
        println!("  {}", line);
    }
    display_tag_decision(&outcome.tag);
}

/// Print only the image tag, for `$(ci-tagger --print-tag ...)` capture.
pub fn print_image_tag(outcome: &PipelineOutcome) {
    println!("{}", outcome.image_tag);
}
