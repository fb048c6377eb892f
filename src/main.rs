use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pr_release::cli::orchestration::{
    run_release_workflow, GitHubSettings, WorkflowOptions, WorkflowReport, WorkflowResult,
};
use pr_release::cli::Cli;
use pr_release::config;
use pr_release::git::repository::Git2Repository;
use pr_release::release::Trigger;
use pr_release::ui;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let trigger = cli.trigger()?;
    let config = config::load_config(cli.config.as_deref())?;

    let repo = Git2Repository::open(&cli.repo)?;
    // the URL is only needed to infer the slug; a configured slug needs no remote
    let remote_url = repo.remote_url(&config.release.remote).ok().flatten();
    let settings = GitHubSettings::resolve(&config, remote_url.as_deref())?;
    let repo = repo.with_token(settings.token.clone());
    let github = settings.client()?;

    match &trigger {
        Trigger::Push => ui::display_status(&format!(
            "Releasing {} of {} (push)",
            cli.target, settings.repository
        )),
        Trigger::Manual(numbers) => ui::display_status(&format!(
            "Releasing {} of {} ({} pull requests listed)",
            cli.target,
            settings.repository,
            numbers.len()
        )),
    }

    let options = WorkflowOptions {
        target: cli.target.clone(),
        dry_run: cli.dry_run,
    };
    let report = run_release_workflow(&trigger, &options, &config, &repo, &github)?;
    display_report(&report);
    Ok(())
}

fn display_report(report: &WorkflowReport) {
    for warning in &report.warnings {
        ui::display_boundary_warning(warning);
    }

    ui::display_status(&ui::format_baseline(&report.baseline));
    if !report.change_set.is_empty() {
        ui::display_change_set(&report.change_set);
    }

    let next_version = match &report.result {
        WorkflowResult::NothingToRelease => None,
        WorkflowResult::AlreadyReleased { tag, .. }
        | WorkflowResult::DryRun { tag, .. }
        | WorkflowResult::Released { tag, .. } => Some(tag.version),
    };
    if let (Some(classification), Some(next)) = (&report.classification, next_version) {
        ui::display_version_decision(&report.baseline.version, classification, &next);
    }

    println!();
    match &report.result {
        WorkflowResult::NothingToRelease => {
            ui::display_success("No merged pull requests since the last release; nothing to do");
        }
        WorkflowResult::AlreadyReleased { tag, category } => {
            ui::display_success(&format!(
                "Tag {} ({} release) already exists at {}; skipping release",
                tag.name, category, tag.commit
            ));
        }
        WorkflowResult::DryRun {
            tag,
            category,
            changelog,
        } => {
            ui::display_changelog(changelog);
            println!();
            ui::display_status("Dry run, nothing was changed:");
            ui::display_success(&format!(
                "  Would create {} release tag {} at {}",
                category, tag.name, tag.commit
            ));
        }
        WorkflowResult::Released {
            tag,
            category,
            release,
        } => {
            ui::display_success(&format!(
                "Created and pushed {} release tag {}",
                category, tag.name
            ));
            ui::display_success(&format!("Published release: {}", release.url));
        }
    }
}
