//! Pure formatting functions for UI output.
//!
//! `render_*` functions build text without printing so they can be tested;
//! `display_*` functions print it.

use console::style;

use crate::cli::orchestration::{PipelineOutcome, TagDecision};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display the services configured for releases.
pub fn display_available_services(services: &[String]) {
    println!("{}", style("Configured services:").bold());
    for service in services {
        println!("  - {}", service);
    }
}

/// Human-readable description of a tag decision
pub fn render_tag_decision(decision: &TagDecision) -> String {
    match decision {
        TagDecision::NotApplicable => "none (branch does not mint release tags)".to_string(),
        TagDecision::Created(name) => format!("created {}", name),
        TagDecision::AlreadyExisted(name) => format!("{} already exists", name),
        TagDecision::Skipped { reason } => format!("skipped: {}", reason),
    }
}

/// One-line headline for tag decisions that changed or confirmed a release.
pub fn render_tag_headline(decision: &TagDecision) -> Option<String> {
    match decision {
        TagDecision::Created(name) => Some(format!("Released {}", name)),
        TagDecision::AlreadyExisted(name) => Some(format!("{} is already released", name)),
        TagDecision::NotApplicable | TagDecision::Skipped { .. } => None,
    }
}

/// Print the headline for a tag decision, if it has one.
pub fn display_tag_decision(decision: &TagDecision) {
    let Some(headline) = render_tag_headline(decision) else {
        return;
    };
    match decision {
        TagDecision::Created(_) => display_success(&headline),
        _ => display_status(&headline),
    }
}

/// Summary lines for a finished pipeline run.
pub fn render_outcome(outcome: &PipelineOutcome) -> Vec<String> {
    let publish = match (outcome.should_push, outcome.pushed) {
        (true, true) => "pushed",
        (true, false) => "eligible (not pushed)",
        (false, _) => "not published",
    };

    vec![
        format!("Service:        {}", outcome.service),
        format!("Branch:         {} ({})", outcome.branch, outcome.classification),
        format!("Image tag:      {}", outcome.image_tag),
        format!("Aliases:        {}", outcome.aliases.join(", ")),
        format!("Artifact:       {}", publish),
        format!("Release tag:    {}", render_tag_decision(&outcome.tag)),
    ]
}
