//! Bounded fan-out over many schedule spreadsheets.
//!
//! One task per reference, admitted through a semaphore. Each task owns its
//! failure: a bad URL or failed export turns into "no schedule" for that
//! reference and never cancels siblings. Completions flow back over a channel
//! so the progress callback runs on the caller's task, once per reference.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};

use crate::schedule::{extract_schedule, Schedule};
use crate::sheets::url::resolve_reference;
use crate::sheets::{SheetError, TableSource};
use crate::table::parse_tsv;
use crate::types::Config;

/// Default ceiling on simultaneous fetches.
pub const DEFAULT_CONCURRENCY: usize = 10;

pub const DEFAULT_SHEET_NAME: &str = "Schedule";

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub concurrency: usize,
    /// Sheet tab to export; `None` uses the `gid` in each URL.
    pub sheet_name: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            sheet_name: Some(DEFAULT_SHEET_NAME.to_string()),
        }
    }
}

impl From<&Config> for FetchOptions {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: config.concurrency,
            sheet_name: Some(config.schedule_sheet_name.clone()).filter(|s| !s.is_empty()),
        }
    }
}

/// Reported after each reference finishes, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchProgress {
    pub completed: usize,
    pub total: usize,
    pub reference: String,
    pub succeeded: bool,
}

/// Fetch and parse a single schedule. Errors go to the caller.
pub async fn fetch_schedule(
    source: &dyn TableSource,
    reference: &str,
    sheet_name: Option<&str>,
) -> Result<Schedule, SheetError> {
    let (document_id, sheet) = resolve_reference(reference, sheet_name)?;
    let raw = source.fetch_raw_table(&document_id, &sheet).await?;
    Ok(extract_schedule(&parse_tsv(&raw)))
}

/// Fetch every reference with at most `options.concurrency` in flight.
///
/// Returns the successfully parsed schedules in input order. `progress` is
/// called exactly once per reference, in completion order.
pub async fn fetch_schedules<F>(
    source: Arc<dyn TableSource>,
    references: &[String],
    options: &FetchOptions,
    mut progress: F,
) -> Vec<Schedule>
where
    F: FnMut(&FetchProgress),
{
    let total = references.len();
    if total == 0 {
        return Vec::new();
    }

    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let (tx, mut rx) = mpsc::channel::<(usize, Option<Schedule>)>(total);

    for (index, reference) in references.iter().cloned().enumerate() {
        let tx = tx.clone();
        let semaphore = semaphore.clone();
        let source = source.clone();
        let sheet_name = options.sheet_name.clone();

        tokio::spawn(async move {
            let schedule = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    match fetch_schedule(source.as_ref(), &reference, sheet_name.as_deref()).await {
                        Ok(schedule) => Some(schedule),
                        Err(e) => {
                            log::warn!("skipping schedule {}: {}", reference, e);
                            None
                        }
                    }
                }
                Err(e) => {
                    log::warn!("skipping schedule {}: {}", reference, e);
                    None
                }
            };
            let _ = tx.send((index, schedule)).await;
        });
    }
    drop(tx);

    let mut slots: Vec<Option<Schedule>> = vec![None; total];
    let mut reported = vec![false; total];
    let mut completed = 0;

    while let Some((index, schedule)) = rx.recv().await {
        completed += 1;
        reported[index] = true;
        progress(&FetchProgress {
            completed,
            total,
            reference: references[index].clone(),
            succeeded: schedule.is_some(),
        });
        slots[index] = schedule;
    }

    // A task that panicked dropped its sender without reporting.
    for index in (0..total).filter(|&i| !reported[i]) {
        completed += 1;
        log::error!("schedule task for {} ended without a result", references[index]);
        progress(&FetchProgress {
            completed,
            total,
            reference: references[index].clone(),
            succeeded: false,
        });
    }

    let schedules: Vec<Schedule> = slots.into_iter().flatten().collect();
    log::info!("fetched {}/{} schedules", schedules.len(), total);
    schedules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::SheetSelector;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Serves a one-row schedule titled with the document id, failing for `fail_ids`.
    struct FakeSheets {
        fail_ids: Vec<String>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
    }

    impl FakeSheets {
        fn new(fail_ids: &[&str], delay: Duration) -> Self {
            Self {
                fail_ids: fail_ids.iter().map(|s| s.to_string()).collect(),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                delay,
            }
        }
    }

    #[async_trait]
    impl TableSource for FakeSheets {
        async fn fetch_raw_table(
            &self,
            document_id: &str,
            _sheet: &SheetSelector,
        ) -> Result<String, SheetError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_ids.iter().any(|id| id == document_id) {
                return Err(SheetError::Api {
                    status: 404,
                    message: "not found".into(),
                });
            }
            Ok(format!(
                "{}\t\t2024-04-01\t\nTime\tPerson\tRoom\tNotes\n9:00-9:30\tAda Lovelace\tCS 1240\t",
                document_id
            ))
        }
    }

    fn references(n: usize) -> Vec<String> {
        (1..=n)
            .map(|i| format!("https://docs.google.com/spreadsheets/d/doc{}/edit#gid=0", i))
            .collect()
    }

    #[tokio::test]
    async fn test_failures_dropped_and_progress_called_per_reference() {
        let source = Arc::new(FakeSheets::new(&["doc3", "doc7"], Duration::from_millis(1)));
        let mut calls = Vec::new();
        let schedules = fetch_schedules(source, &references(12), &FetchOptions::default(), |p| {
            calls.push(p.clone())
        })
        .await;

        assert_eq!(schedules.len(), 10);
        assert_eq!(calls.len(), 12);
        assert_eq!(calls.iter().filter(|p| !p.succeeded).count(), 2);
        assert_eq!(calls.last().map(|p| p.completed), Some(12));
        assert!(calls.iter().all(|p| p.total == 12));
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let source = Arc::new(FakeSheets::new(&["doc2"], Duration::from_millis(1)));
        let schedules =
            fetch_schedules(source, &references(5), &FetchOptions::default(), |_| {}).await;
        let titles: Vec<&str> = schedules.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["doc1", "doc3", "doc4", "doc5"]);
        assert_eq!(schedules[0].rows.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrency_ceiling_respected() {
        let source = Arc::new(FakeSheets::new(&[], Duration::from_millis(20)));
        let schedules = fetch_schedules(
            source.clone(),
            &references(25),
            &FetchOptions::default(),
            |_| {},
        )
        .await;
        assert_eq!(schedules.len(), 25);
        let max = source.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= DEFAULT_CONCURRENCY, "max in flight {}", max);
        assert!(max > 1, "fetches never overlapped");
    }

    #[tokio::test]
    async fn test_malformed_reference_dropped_in_batch() {
        let source = Arc::new(FakeSheets::new(&[], Duration::from_millis(1)));
        let mut refs = references(2);
        refs.push("https://example.com".into());
        refs.push("https://docs.google.com/spreadsheets/d/doc9/edit".into());
        let options = FetchOptions {
            sheet_name: None,
            ..FetchOptions::default()
        };
        let mut failed = Vec::new();
        let schedules = fetch_schedules(source, &refs, &options, |p| {
            if !p.succeeded {
                failed.push(p.reference.clone());
            }
        })
        .await;
        assert_eq!(schedules.len(), 2);
        failed.sort();
        assert_eq!(
            failed,
            vec![
                "https://docs.google.com/spreadsheets/d/doc9/edit".to_string(),
                "https://example.com".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_named_sheet_needs_no_gid() {
        let source = FakeSheets::new(&[], Duration::from_millis(1));
        let schedule = fetch_schedule(
            &source,
            "https://docs.google.com/spreadsheets/d/doc9/edit",
            Some("Schedule"),
        )
        .await
        .unwrap();
        assert_eq!(schedule.title, "doc9");
    }

    #[tokio::test]
    async fn test_single_fetch_propagates_errors() {
        let source = FakeSheets::new(&["doc1"], Duration::from_millis(1));
        let err = fetch_schedule(&source, "https://example.com", None).await.unwrap_err();
        assert!(err.is_malformed_reference());
        let err = fetch_schedule(&source, &references(1)[0], None).await.unwrap_err();
        assert!(matches!(err, SheetError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_empty_reference_list() {
        let source = Arc::new(FakeSheets::new(&[], Duration::from_millis(1)));
        let mut calls = 0;
        let schedules =
            fetch_schedules(source, &[], &FetchOptions::default(), |_| calls += 1).await;
        assert!(schedules.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_options_from_config() {
        let options = FetchOptions::from(&Config::default());
        assert_eq!(options.concurrency, 10);
        assert_eq!(options.sheet_name.as_deref(), Some("Schedule"));
        assert_eq!(FetchOptions::default().sheet_name, options.sheet_name);
    }
}
