//! Merge command - merge the mergeable bottom of the stack

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::print_stack;
use crate::cli::style::{CHECK, Stylize, arrow};
use anstream::println;
use dialoguer::Confirm;
use spr::error::{Error, Result};
use spr::merge::{MergeExecutionResult, MergePlan, MergePlanOptions, create_merge_plan, execute_merge};
use spr::stack::sort_pull_requests;
use std::path::Path;

/// Options for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Dry run - show what would be merged without making changes
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before executing
    pub confirm: bool,
    /// Merge at most this many PRs from the bottom of the stack
    pub count: Option<usize>,
}

/// Run the merge command
pub async fn run_merge(path: &Path, remote: Option<&str>, options: MergeOptions) -> Result<()> {
    let ctx = CommandContext::new(path, remote).await?;

    let open_prs = ctx
        .platform
        .get_open_pull_requests(&ctx.user, &ctx.local_branch)
        .await?;
    let mut stack = sort_pull_requests(open_prs, &ctx.config);
    for warning in &stack.warnings {
        println!("{}", format!("warning: {warning}").warn());
    }

    let plan_options = MergePlanOptions {
        count: options.count,
    };
    let plan = create_merge_plan(&stack.pull_requests, &ctx.config, &plan_options);

    if options.dry_run {
        report_merge_plan(&plan);
        return Ok(());
    }

    if plan.is_empty() {
        println!("{}", "No PRs are ready to merge.".muted());
        print_blocking_summary(&plan);
        return Ok(());
    }

    if options.confirm {
        report_merge_plan(&plan);
        if !Confirm::new()
            .with_prompt("Proceed with merge?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    println!(
        "{} {}",
        "Merging".emphasis(),
        format!("{} PR(s)...", plan.merge_count()).accent()
    );

    let progress = CliProgress::compact(ctx.user_config.show_pr_link);
    let result = execute_merge(
        &plan,
        &mut stack.pull_requests,
        ctx.platform.as_ref(),
        &progress,
    )
    .await;

    print_merge_summary(&result);
    let remaining: Vec<_> = stack
        .pull_requests
        .into_iter()
        .filter(|pr| !pr.merged)
        .collect();
    if !remaining.is_empty() {
        println!();
        print_stack(&remaining, &ctx.config, ctx.user_config.show_pr_link);
    }

    if result.is_success() {
        Ok(())
    } else {
        Err(Error::Platform(
            result
                .error_message
                .unwrap_or_else(|| "merge failed".to_string()),
        ))
    }
}

fn report_merge_plan(plan: &MergePlan) {
    println!("{}:", "Merge plan".emphasis());
    println!();
    if plan.is_empty() {
        println!("  {}", "Nothing to merge".muted());
        print_blocking_summary(plan);
        println!();
        return;
    }
    for step in &plan.steps {
        println!("  {} {}", arrow(), step);
    }
    println!();
}

fn print_blocking_summary(plan: &MergePlan) {
    if let Some(blocked) = &plan.blocked {
        println!(
            "  {} {}: {}",
            format!("#{}", blocked.pr_number).accent(),
            blocked.title,
            blocked.reasons.join(", ").warn()
        );
    }
}

fn print_merge_summary(result: &MergeExecutionResult) {
    println!();
    if result.has_merges() {
        let sha = result.sha.as_deref().unwrap_or("(no sha)");
        println!(
            "{} {} PR(s) landed in {}",
            format!("{CHECK} Merged:").success(),
            result.merged.len().accent(),
            sha.muted()
        );
    }
    if let (Some(pr_number), Some(message)) = (result.failed, &result.error_message) {
        println!(
            "{}",
            format!("Failed at PR #{pr_number}: {message}").error()
        );
    }
    if result.has_merges() {
        println!(
            "{}",
            "Run `spr update` to rebase the rest of the stack.".muted()
        );
    }
}
