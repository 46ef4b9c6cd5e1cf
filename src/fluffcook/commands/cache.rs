use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::offline::origin::{AssetOrigin, AssetRequest};
use crate::offline::storage::CacheStorage;
use crate::offline::{CacheWorker, FetchOutcome};

/// Install followed by immediate activation, since install always skips waiting.
pub async fn install<C: CacheStorage, O: AssetOrigin>(worker: &mut CacheWorker<C, O>) -> Result<CmdResult> {
    worker.install().await?;
    let deleted = worker.activate().await?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Installed {}",
        worker.cache_name()
    )));
    for name in deleted {
        result.add_message(CmdMessage::info(format!("Deleted stale cache {}", name)));
    }
    Ok(result.with_cache_status(worker.status().await?))
}

pub async fn status<C: CacheStorage, O: AssetOrigin>(worker: &CacheWorker<C, O>) -> Result<CmdResult> {
    let status = worker.status().await?;
    let mut result = CmdResult::default();
    if !status.is_installed() {
        result.add_message(CmdMessage::warning(format!(
            "{} is not installed. Run `fluffcook cache install`.",
            status.current
        )));
    }
    Ok(result.with_cache_status(status))
}

pub async fn fetch<C: CacheStorage, O: AssetOrigin>(
    worker: &CacheWorker<C, O>,
    request: &AssetRequest,
) -> Result<CmdResult> {
    let outcome = worker.handle_fetch(request).await?;
    let mut result = CmdResult::default();
    match &outcome {
        FetchOutcome::Passthrough => result.add_message(CmdMessage::info(format!(
            "{} {} is not cached; pass it through",
            request.method, request.path
        ))),
        FetchOutcome::Cache(resp) => result.add_message(CmdMessage::success(format!(
            "{} served from cache ({} bytes)",
            request.path,
            resp.body.len()
        ))),
        FetchOutcome::Network(resp) => result.add_message(CmdMessage::info(format!(
            "{} served from origin with status {} ({} bytes)",
            request.path,
            resp.status,
            resp.body.len()
        ))),
    }
    Ok(result.with_fetch_outcome(outcome))
}
