//! Ctrl-C capture for long runs.

use anyhow::{Context, Result};
use billiards::search::CancelToken;

/// Cancels the returned token on the first interrupt; a second interrupt exits
/// immediately with status 130.
pub fn capture_interrupt() -> Result<CancelToken> {
    let token = CancelToken::new();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building signal runtime")?;
    let trigger = token.clone();
    std::thread::Builder::new()
        .name("interrupt".into())
        .spawn(move || {
            rt.block_on(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                tracing::warn!("interrupted; waiting for running points (again to abort)");
                trigger.cancel();
                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(130);
                }
            })
        })
        .context("spawning interrupt listener")?;
    Ok(token)
}
