//! Fetches a list of months and folds them into one [`AggregatedSeries`].

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

use crate::aggregate::{AggregatedSeries, ingest};
use crate::error::FetchError;
use crate::fetch::SnapshotSource;
use crate::snapshot::{ExtractedEntry, period_key};

/// A month that contributed nothing because its fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedMonth {
    pub period_key: String,
    pub reason: &'static str,
    pub message: String,
}

/// Result of a sweep: the merged series plus what happened to each month.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub series: AggregatedSeries,
    pub fetched: Vec<String>,
    pub skipped: Vec<SkippedMonth>,
    pub cancelled: Vec<String>,
}

enum MonthOutcome {
    Fetched(Vec<ExtractedEntry>),
    Failed(FetchError),
    Cancelled,
}

/// Fetches every `(year, month)` with at most `concurrency` requests in
/// flight and merges the results in the order `months` lists them.
///
/// A failed month is logged and skipped. Once `cancel` fires, months that have
/// not finished fetching are abandoned; whatever completed is still merged.
/// A `concurrency` of zero is treated as one.
#[tracing::instrument(skip(source, months, cancel), fields(months = months.len()))]
pub async fn sweep<S>(
    source: Arc<S>,
    months: &[(String, String)],
    concurrency: usize,
    cancel: &CancellationToken,
) -> SweepReport
where
    S: SnapshotSource + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = Vec::with_capacity(months.len());

    for (year, month) in months {
        let source = source.clone();
        let semaphore = semaphore.clone();
        let cancel = cancel.clone();
        let (task_year, task_month) = (year.clone(), month.clone());
        let span = tracing::info_span!("fetch_month", period = %period_key(year, month));

        let task = tokio::spawn(
            async move {
                let _permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return MonthOutcome::Cancelled,
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return MonthOutcome::Cancelled,
                    },
                };

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => MonthOutcome::Cancelled,
                    result = source.fetch_month(&task_year, &task_month) => match result {
                        Ok(snapshot) => MonthOutcome::Fetched(snapshot.extract()),
                        Err(e) => MonthOutcome::Failed(e),
                    },
                }
            }
            .instrument(span),
        );

        tasks.push(((year.clone(), month.clone()), task));
    }

    // Merge at a single point so appends never interleave.
    let mut report = SweepReport::default();
    for ((year, month), task) in tasks {
        let key = period_key(&year, &month);
        match task.await {
            Ok(MonthOutcome::Fetched(entries)) => {
                debug!(period = %key, entries = entries.len(), "Month fetched");
                report.series = ingest(report.series, &year, &month, entries);
                report.fetched.push(key);
            }
            Ok(MonthOutcome::Failed(e)) => {
                warn!(period = %key, reason = e.reason(), error = %e, "Skipping month");
                report.skipped.push(SkippedMonth {
                    period_key: key,
                    reason: e.reason(),
                    message: e.to_string(),
                });
            }
            Ok(MonthOutcome::Cancelled) => {
                debug!(period = %key, "Month cancelled");
                report.cancelled.push(key);
            }
            Err(e) => {
                warn!(period = %key, error = %e, "Fetch task did not complete");
                report.skipped.push(SkippedMonth {
                    period_key: key,
                    reason: "task",
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        fetched = report.fetched.len(),
        skipped = report.skipped.len(),
        cancelled = report.cancelled.len(),
        entries = report.series.total_points(),
        "Sweep finished"
    );

    report
}
