use anyhow::{Context, Result};
use clap::Parser;

use ci_tagger::cli::orchestration::{run_pipeline, PipelineArgs};
use ci_tagger::config;
use ci_tagger::domain::BuildContext;
use ci_tagger::git::Git2TagStore;
use ci_tagger::logging;
use ci_tagger::publish::DockerPublisher;
use ci_tagger::resolver::ReleaseInputs;
use ci_tagger::ui;

#[derive(clap::Parser)]
#[command(
    name = "ci-tagger",
    version,
    about = "Resolve image tags and cut release tags for CI builds"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Service to build (e.g. backend)")]
    service: Option<String>,

    #[arg(short, long, env = "BRANCH_NAME", help = "Branch being built")]
    branch: Option<String>,

    #[arg(long, env = "BUILD_NUMBER", help = "CI build number")]
    build_number: Option<String>,

    #[arg(long, env = "GIT_COMMIT", help = "Commit SHA being built")]
    commit: Option<String>,

    #[arg(long, help = "Resolve everything but build, push and tag nothing")]
    dry_run: bool,

    #[arg(long, help = "Print only the image tag on stdout")]
    print_tag: bool,

    #[arg(long, help = "Show configured services and exit")]
    list: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-vv for trace)")]
    verbose: u8,

    #[arg(short, long, help = "Only log errors")]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(logging::env_filter(args.quiet, args.verbose, "info"));

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    if args.list {
        let services: Vec<String> = config.services.keys().cloned().collect();
        ui::display_available_services(&services);
        return Ok(());
    }

    let service = required(args.service, "--service")?;
    let branch = required(args.branch, "--branch (or BRANCH_NAME)")?;
    let build_number = required(args.build_number, "--build-number (or BUILD_NUMBER)")?;
    let commit = required(args.commit, "--commit (or GIT_COMMIT)")?;

    let service_config = config.service(&service)?.clone();

    let store = Git2TagStore::open(".", config.release.remote.clone())
        .context("Not in a git repository")?;
    let publisher = DockerPublisher::new(service_config, ".");

    let pipeline_args = PipelineArgs {
        service,
        context: BuildContext::new(branch, build_number, &commit),
        release_inputs: ReleaseInputs::from_env(),
        dry_run: args.dry_run,
    };

    let outcome = run_pipeline(&pipeline_args, &config, &store, &publisher)?;

    if args.print_tag {
        ui::print_image_tag(&outcome);
    } else {
        ui::display_outcome(&outcome, args.dry_run);
    }

    Ok(())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing required input {}", name))
}
