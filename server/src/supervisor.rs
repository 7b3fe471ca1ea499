use std::future::Future;
use std::time::Duration;

use dlob_sdk::types::SdkResult;

const RESTART_BACKOFF: Duration = Duration::from_secs(15);

/// Restarts `make_attempt` on failure with a fixed backoff, forever. No
/// exponential backoff, no crash counter, no giving up -- the process is
/// expected to run under an external supervisor (systemd, k8s) that handles
/// genuinely unrecoverable failure; this loop only absorbs transient RPC or
/// websocket errors one tier down.
pub async fn run_forever<F, Fut>(mut make_attempt: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SdkResult<()>>,
{
    loop {
        match make_attempt().await {
            Ok(()) => {
                log::warn!("server exited cleanly, restarting in {:?}", RESTART_BACKOFF);
            }
            Err(err) => {
                log::error!("server crashed: {err:?}, restarting in {:?}", RESTART_BACKOFF);
            }
        }
        tokio::time::sleep(RESTART_BACKOFF).await;
    }
}
