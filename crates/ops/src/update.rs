//! Search, select, download and install
//!
//! One call to [`run`] is one pass of the pipeline. The search and download
//! phases retry without bound; anything else that fails is returned to the
//! caller as fatal. The outcome tells the caller whether to reboot and run
//! again.

use crate::reboot::check_reboot_required;
use crate::{OpsCtx, RunState};
use tokio::time::Instant;
use upkeep_errors::Error;
use upkeep_events::{
    AppEvent, DownloadEvent, EventEmitter, FailureContext, InstallEvent, SearchEvent,
    SelectionEvent,
};
use upkeep_filter::{include, matching_rule};
use upkeep_types::{
    DownloadPriority, InstallResult, RebootReason, ResultCode, RunOutcome, RunReport,
    SearchResult, UpdateCollection,
};
use uuid::Uuid;

/// Run the full update pipeline once
///
/// Returns early, before searching, when the host already owes a reboot.
///
/// # Errors
///
/// Returns an error if:
/// - The host has no update service
/// - The host's reboot flag cannot be read
/// - Accepting an update's license terms fails
/// - The install call itself fails
pub async fn run(ctx: &OpsCtx) -> Result<RunReport, Error> {
    ctx.emit_operation_started("update");
    pipeline(ctx)
        .await
        .inspect_err(|e| failed(ctx, "update", e))
}

async fn pipeline(ctx: &OpsCtx) -> Result<RunReport, Error> {
    let start = Instant::now();
    let mut report = RunReport::new(Uuid::new_v4());
    ctx.platform.updates().ensure_available()?;

    if let Some(reason) = check_reboot_required(ctx, None).await? {
        return Ok(finish(ctx, "update", report, Some(reason), start));
    }

    let found = search(ctx).await;
    report.found = found.updates.titles();

    let mut state = RunState::new();
    select(ctx, found.updates, &mut state, &mut report).await?;
    report.total_download_size = state.total_download_size;

    // Older hosts fail a download requested right after the search
    let pause = ctx.config.timing.download_pause();
    ctx.emit(AppEvent::Selection(SelectionEvent::Paused { duration: pause }));
    tokio::time::sleep(pause).await;

    if !state.to_download.is_empty() {
        download(ctx, &mut state, &mut report).await;
    }

    let reason = if state.to_install.is_empty() {
        let forced = state.reboot_required.then_some(RebootReason::DeferredWork);
        let reason = check_reboot_required(ctx, forced).await?;
        if reason.is_none() {
            ctx.emit(AppEvent::Install(InstallEvent::NothingFound));
        }
        reason
    } else {
        let installed = install(ctx, &state, &mut report).await?;
        let forced = if installed.reboot_required {
            Some(RebootReason::InstallResult)
        } else {
            state.reboot_required.then_some(RebootReason::DeferredWork)
        };
        check_reboot_required(ctx, forced).await?
    };

    Ok(finish(ctx, "update", report, reason, start))
}

/// Only decide whether the host owes a reboot
///
/// # Errors
///
/// Returns an error if the host's reboot flag cannot be read.
pub async fn check_reboot_only(ctx: &OpsCtx) -> Result<RunReport, Error> {
    let start = Instant::now();
    let report = RunReport::new(Uuid::new_v4());
    ctx.emit_operation_started("reboot check");

    let reason = check_reboot_required(ctx, None)
        .await
        .inspect_err(|e| failed(ctx, "reboot check", e))?;
    Ok(finish(ctx, "reboot check", report, reason, start))
}

fn failed(ctx: &OpsCtx, operation: &str, error: &Error) {
    ctx.emit_operation_failed(operation, FailureContext::from_error(error));
}

fn finish(
    ctx: &OpsCtx,
    operation: &str,
    mut report: RunReport,
    reason: Option<RebootReason>,
    start: Instant,
) -> RunReport {
    report.outcome = if reason.is_some() {
        RunOutcome::RebootRequired
    } else {
        RunOutcome::Completed
    };
    report.reboot_reason = reason;
    report.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    ctx.emit_operation_completed(operation, true);
    report
}

async fn search(ctx: &OpsCtx) -> SearchResult {
    let criteria = ctx.config.search.criteria.as_str();
    let retry_in = ctx.config.timing.retry_delay();
    let mut attempt: u32 = 0;

    loop {
        attempt = attempt.saturating_add(1);
        ctx.emit(AppEvent::Search(SearchEvent::Started {
            criteria: criteria.to_string(),
            attempt,
        }));

        let (result_code, failure) = match ctx.platform.updates().search(criteria).await {
            Ok(result) if result.result_code == ResultCode::Succeeded => {
                ctx.emit(AppEvent::Search(SearchEvent::Completed {
                    found: result.updates.len(),
                    attempts: attempt,
                }));
                return result;
            }
            Ok(result) => (result.result_code, None),
            Err(e) => (ResultCode::Failed, Some(FailureContext::from_error(&e))),
        };

        ctx.emit(AppEvent::Search(SearchEvent::Failed {
            result_code,
            failure,
            retry_in,
        }));
        tokio::time::sleep(retry_in).await;
    }
}

async fn select(
    ctx: &OpsCtx,
    candidates: UpdateCollection,
    state: &mut RunState,
    report: &mut RunReport,
) -> Result<(), Error> {
    let limit = ctx.config.filter.update_limit;
    let total = candidates.len();

    for (index, update) in candidates.into_iter().enumerate() {
        let rule = matching_rule(&ctx.rules, &update);
        if !include(&ctx.rules, &update) {
            report.skipped.push(update.title.clone());
            ctx.emit(AppEvent::Selection(SelectionEvent::Skipped {
                update: update.summary(),
                rule,
            }));
            continue;
        }

        if update.installation_behavior.can_request_user_input {
            ctx.emit(AppEvent::Selection(SelectionEvent::UserInputWarning {
                update: update.summary(),
            }));
        }

        ctx.platform.updates().accept_eula(&update).await?;

        state.total_download_size = state
            .total_download_size
            .saturating_add(update.max_download_size);
        report.queued.push(update.title.clone());
        ctx.emit(AppEvent::Selection(SelectionEvent::Included {
            update: update.summary(),
            rule,
        }));
        state.to_download.push(update);

        if state.to_download.len() >= limit {
            state.reboot_required = true;
            ctx.emit(AppEvent::Selection(SelectionEvent::LimitReached {
                limit,
                remaining: total - index - 1,
            }));
            break;
        }
    }

    Ok(())
}

async fn download(ctx: &OpsCtx, state: &mut RunState, report: &mut RunReport) {
    let priority = DownloadPriority::for_os_version(ctx.platform.host().os_version());
    let requested = state.to_download.len();
    let retry_in = ctx.config.timing.retry_delay();

    ctx.emit(AppEvent::Download(DownloadEvent::Started {
        count: requested,
        total_bytes: state.total_download_size,
        priority,
    }));

    let result = loop {
        let (result_code, failure) =
            match ctx.platform.updates().download(&state.to_download, priority).await {
                Ok(result) => match result.result_code {
                    ResultCode::Succeeded => break result,
                    ResultCode::SucceededWithErrors => {
                        ctx.emit(AppEvent::Download(DownloadEvent::PartiallySucceeded {
                            downloaded: result.downloaded.len(),
                            requested,
                        }));
                        state.reboot_required = true;
                        break result;
                    }
                    code => (code, None),
                },
                Err(e) => (ResultCode::Failed, Some(FailureContext::from_error(&e))),
            };

        ctx.emit(AppEvent::Download(DownloadEvent::Failed {
            result_code,
            failure,
            retry_in,
        }));
        tokio::time::sleep(retry_in).await;
    };

    report.download_result = Some(result.result_code);
    ctx.emit(AppEvent::Download(DownloadEvent::Completed {
        result_code: result.result_code,
        downloaded: result.downloaded.len(),
    }));

    for update in state.to_download.iter_mut() {
        update.is_downloaded = result.is_downloaded(&update.id);
    }

    for update in state.to_download.iter() {
        if update.is_downloaded {
            report.downloaded.push(update.title.clone());
            ctx.emit(AppEvent::Download(DownloadEvent::UpdateDownloaded {
                update: update.summary(),
            }));
            state.to_install.push(update.clone());
        } else {
            report.not_downloaded.push(update.title.clone());
            ctx.emit(AppEvent::Download(DownloadEvent::UpdateNotDownloaded {
                update: update.summary(),
            }));
        }
    }
}

async fn install(
    ctx: &OpsCtx,
    state: &RunState,
    report: &mut RunReport,
) -> Result<InstallResult, Error> {
    ctx.emit(AppEvent::Install(InstallEvent::Started {
        count: state.to_install.len(),
    }));

    let result = ctx.platform.updates().install(&state.to_install).await?;
    report.install_result = Some(result.result_code);
    ctx.emit(AppEvent::Install(InstallEvent::Completed {
        result_code: result.result_code,
        reboot_required: result.reboot_required,
    }));

    for outcome in &result.update_results {
        let Some(update) = state.to_install.get(&outcome.id) else {
            tracing::debug!(id = %outcome.id, "install reported an update that was not queued");
            continue;
        };
        if outcome.result_code.is_success() {
            report.installed.push(update.title.clone());
            ctx.emit(AppEvent::Install(InstallEvent::UpdateInstalled {
                update: update.summary(),
            }));
        } else {
            ctx.emit(AppEvent::Install(InstallEvent::UpdateFailed {
                update: update.summary(),
                result_code: outcome.result_code,
            }));
        }
    }

    Ok(result)
}
