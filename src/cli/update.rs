//! Update command - sync the local commit stack with its pull requests

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::print_stack;
use crate::cli::style::{CHECK, Stylize, arrow, check, spinner_style};
use anstream::println;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use spr::error::{Error, Result};
use spr::stack::{read_local_stack, sort_pull_requests};
use spr::sync::{SyncPlan, execute_sync, fetch_and_snapshot, plan_sync};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Options for the update command
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Dry run - show what would be done without making changes
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before executing
    pub confirm: bool,
    /// Reviewers to request on newly created PRs
    pub reviewers: Vec<String>,
}

/// Run the update command
pub async fn run_update(path: &Path, remote: Option<&str>, options: UpdateOptions) -> Result<()> {
    let ctx = CommandContext::new(path, remote).await?;
    let sync_ctx = ctx.sync_context();

    // Dry runs leave the local branch alone, so no fetch + rebase
    let open_prs = if options.dry_run {
        ctx.platform
            .get_open_pull_requests(&ctx.user, &ctx.local_branch)
            .await?
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!(
            "Rebasing onto {}...",
            ctx.config.remote_trunk().emphasis()
        ));
        spinner.enable_steady_tick(Duration::from_millis(80));

        let prs = fetch_and_snapshot(Arc::clone(&ctx.vcs), ctx.platform.as_ref(), &sync_ctx).await;
        match &prs {
            Ok(_) => spinner.finish_with_message(format!(
                "{} Rebased onto {}",
                check(),
                ctx.config.remote_trunk().emphasis()
            )),
            Err(_) => spinner.finish_and_clear(),
        }
        prs?
    };

    // Rewording to repair commit ids rewrites history, which a dry run must not do
    let commits = read_local_stack(ctx.vcs.as_ref(), &ctx.config, !options.dry_run)?;
    let (order, plan) = plan_sync(&commits, open_prs, &sync_ctx);
    for warning in &order.warnings {
        println!("{}", format!("warning: {warning}").warn());
    }

    if options.dry_run {
        print_sync_preview(&plan);
        println!("{}", "Dry run complete".muted());
        return Ok(());
    }

    if plan.is_empty() {
        println!("{}", "Stack is up to date".muted());
        print_stack(
            &order.pull_requests,
            &ctx.config,
            ctx.user_config.show_pr_link,
        );
        return Ok(());
    }

    if options.confirm {
        print_sync_preview(&plan);
        if !Confirm::new()
            .with_prompt("Proceed with update?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    let mut reviewers = options.reviewers;
    for reviewer in &ctx.user_config.default_reviewers {
        if !reviewers.contains(reviewer) {
            reviewers.push(reviewer.clone());
        }
    }

    let repo = ctx.platform.config();
    println!(
        "{} {} {}",
        "Updating stack:".emphasis(),
        ctx.local_branch.accent(),
        format!("({}/{})", repo.owner, repo.repo).muted()
    );

    let progress = CliProgress::compact(ctx.user_config.show_pr_link);
    let result = execute_sync(
        &plan,
        &sync_ctx,
        ctx.vcs.as_ref(),
        ctx.platform.as_ref(),
        &reviewers,
        &progress,
    )
    .await?;

    let stack = sort_pull_requests(result.pull_requests, &ctx.config);

    println!();
    println!(
        "{} {} closed, {} pushed, {} created, {} updated",
        format!("{CHECK} Update complete:").success(),
        result.closed.len().accent(),
        result.pushed.len().accent(),
        result.created.len().accent(),
        result.updated.len().accent()
    );
    print_stack(
        &stack.pull_requests,
        &ctx.config,
        ctx.user_config.show_pr_link,
    );

    Ok(())
}

/// Print sync preview for --confirm and --dry-run
fn print_sync_preview(plan: &SyncPlan) {
    println!("{}:", "Update plan".emphasis());
    println!();

    if plan.is_empty() {
        println!("  {}", "Already in sync".muted());
        println!();
        return;
    }

    if plan.is_reordering() {
        println!(
            "  {}",
            "Commits were reordered; the stack is flattened onto trunk first".warn()
        );
    }

    println!("  {}:", "Steps".emphasis());
    for step in &plan.steps {
        println!("    {} {}", arrow(), step);
    }

    println!();
}
