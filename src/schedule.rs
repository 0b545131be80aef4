/// Batched concurrent extraction.
///
/// The full task list is split into `batch_count` equal slices plus a
/// remainder slice. All tasks within a batch run concurrently; batches
/// run strictly one after another, so the batch size is the cap on
/// concurrent parser processes. A failing task never disturbs its
/// siblings — extraction already degrades failures to the sentinel
/// record, and a panicked task is absorbed the same way here.
use crate::config::ParserConfig;
use crate::extract::{self, ExtractionTask, MatchRecord};
use crate::signals::ShutdownSignal;
use std::ops::Range;
use std::sync::Arc;
use tokio::task::JoinSet;

/// The run was cancelled mid-flight. No partial results survive.
#[derive(Debug, PartialEq, Eq)]
pub struct Interrupted;

impl std::fmt::Display for Interrupted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run interrupted")
    }
}

impl std::error::Error for Interrupted {}

/// Slice `len` items into `batch_count` equal contiguous ranges plus a
/// final remainder range. `batch_count` must be positive. Every index
/// lands in exactly one range; when `batch_count > len` the equal
/// ranges are all empty and the remainder carries everything.
fn partition(len: usize, batch_count: usize) -> Vec<Range<usize>> {
    let batch_size = len / batch_count;
    let mut ranges = Vec::with_capacity(batch_count + 1);
    for batch_id in 0..batch_count {
        ranges.push(batch_id * batch_size..(batch_id + 1) * batch_size);
    }
    ranges.push(batch_count * batch_size..len);
    ranges
}

/// Run every task, `batch_count` sequential batches at a time, and
/// return one record per task. Record order follows batch order;
/// within a batch it is completion order.
pub async fn run_all(
    parser: &ParserConfig,
    tasks: Vec<ExtractionTask>,
    batch_count: usize,
    shutdown: &ShutdownSignal,
) -> Result<Vec<MatchRecord>, Interrupted> {
    let parser = Arc::new(parser.clone());
    let total = tasks.len();
    let mut records = Vec::with_capacity(total);
    let mut pending = tasks.into_iter();

    for (batch_id, range) in partition(total, batch_count).into_iter().enumerate() {
        if shutdown.is_cancelled() {
            return Err(Interrupted);
        }

        let batch: Vec<ExtractionTask> = pending.by_ref().take(range.len()).collect();
        if batch.is_empty() {
            continue;
        }
        tracing::info!(batch = batch_id, size = batch.len(), "running extraction batch");

        let mut set = JoinSet::new();
        for task in batch {
            let parser = Arc::clone(&parser);
            set.spawn(async move { extract::extract(&parser, &task).await });
        }

        loop {
            tokio::select! {
                joined = set.join_next() => match joined {
                    Some(Ok(record)) => records.push(record),
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "extraction task panicked, recording match as Unknown");
                        records.push(MatchRecord::sentinel());
                    }
                    None => break,
                },
                _ = shutdown.cancelled() => {
                    set.abort_all();
                    return Err(Interrupted);
                }
            }
        }
    }

    Ok(records)
}
