//! Reboot-pending detection
//!
//! Combines the caller's own reason, the host's reboot flag and the pending
//! servicing count into one decision. When a reboot is owed the check waits
//! until the blocking installer process has stayed gone for the debounce
//! window, so the caller can restart the host without interrupting it.

use crate::debounce::wait_until_stable;
use crate::OpsCtx;
use upkeep_errors::{Error, UserFacingError};
use upkeep_events::{AppEvent, EventEmitter, RebootEvent};
use upkeep_types::RebootReason;

/// Decide whether the host owes a reboot
///
/// `forced` short-circuits the host queries. When a reason is found this
/// returns only after the blocking process has been absent for the configured
/// debounce window.
///
/// # Errors
///
/// Returns an error if the host's reboot flag cannot be read. A failure to
/// count pending servicing packages is reported as a warning and counts as
/// none pending.
pub async fn check_reboot_required(
    ctx: &OpsCtx,
    forced: Option<RebootReason>,
) -> Result<Option<RebootReason>, Error> {
    let Some(reason) = reboot_reason(ctx, forced)? else {
        ctx.emit(AppEvent::Reboot(RebootEvent::NotRequired));
        return Ok(None);
    };

    ctx.emit(AppEvent::Reboot(RebootEvent::Required {
        reason: reason.clone(),
    }));

    let process = ctx.config.reboot.blocking_process.clone();
    let debounce = ctx.config.timing.reboot_debounce();
    ctx.emit(AppEvent::Reboot(RebootEvent::WaitingForProcess {
        process: process.clone(),
        debounce,
    }));

    let probe = ctx.platform.process();
    let waited = wait_until_stable(
        ctx.platform.clock(),
        || probe.is_running(&process).map(|running| !running),
        debounce,
        ctx.config.timing.poll_interval(),
    )
    .await;

    ctx.emit(AppEvent::Reboot(RebootEvent::ProcessSettled { process, waited }));
    Ok(Some(reason))
}

fn reboot_reason(
    ctx: &OpsCtx,
    forced: Option<RebootReason>,
) -> Result<Option<RebootReason>, Error> {
    if forced.is_some() {
        return Ok(forced);
    }

    let source = ctx.platform.reboot_state();
    if source.reboot_required()? {
        return Ok(Some(RebootReason::SystemFlag));
    }

    let count = match source.pending_servicing_count() {
        Ok(count) => count,
        Err(e) => {
            ctx.emit_warning_with_context(
                "could not count pending servicing packages",
                e.user_message(),
            );
            0
        }
    };

    Ok((count > 0).then_some(RebootReason::PendingServicing { count }))
}
