use crate::config::Config;
use crate::contamination::detector::{ContaminationDetector, ContaminationResult};
use crate::contamination::splitter::VariantSplitter;
use crate::error::{HaplocheckError, Result};
use crate::haplogroup::classify;
use crate::haplogroup::tree::ReferenceTree;
use crate::types::{ensure_unique_ids, Sample};
use crossbeam_channel::{bounded, unbounded};
use log::{debug, info};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Split, classify and judge one sample.
///
/// Pure in its inputs: the same sample, tree and configuration always give the same result.
pub fn analyze_sample(sample: &Sample, tree: &ReferenceTree, config: &Config) -> Result<ContaminationResult> {
    validate_calls(sample)?;

    let profiles = VariantSplitter::from_config(config).split(sample);
    let major = classify(tree, &profiles.major);
    let minor = classify(tree, &profiles.minor);

    Ok(ContaminationDetector::new(tree, config).detect(sample, &profiles, major, minor))
}

/// Refuses fractions that are not finite or fall outside [0, 1].
pub(crate) fn validate_calls(sample: &Sample) -> Result<()> {
    for call in sample.calls() {
        if !call.fraction.is_finite() || !(0.0..=1.0).contains(&call.fraction) {
            return Err(HaplocheckError::input(format!(
                "sample '{}' position {}: allele fraction {} outside [0, 1]",
                sample.id(),
                call.position,
                call.fraction
            )));
        }
    }
    Ok(())
}

/// Runs every sample through [`analyze_sample`] on a pool of worker threads.
///
/// Results come back in input order, one per sample. The first failing sample stops the run
/// and its error is returned instead of any results.
pub fn run(samples: &[Sample], tree: &ReferenceTree, config: &Config) -> Result<Vec<ContaminationResult>> {
    run_with_progress(samples, tree, config, |_| {})
}

/// Like [`run`], calling `on_result` with the number of finished samples after each one.
pub fn run_with_progress<F>(
    samples: &[Sample],
    tree: &ReferenceTree,
    config: &Config,
    mut on_result: F,
) -> Result<Vec<ContaminationResult>>
where
    F: FnMut(usize),
{
    ensure_unique_ids(samples)?;
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let num_threads = config.worker_threads().clamp(1, samples.len());
    info!(
        "Analysing {} sample(s) on {} thread(s) against {}",
        samples.len(),
        num_threads,
        tree.version()
    );

    let cancelled = AtomicBool::new(false);
    let (job_tx, job_rx) = bounded::<usize>(num_threads * 2);
    let (result_tx, result_rx) = unbounded::<(usize, Result<ContaminationResult>)>();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(num_threads);
        for _ in 0..num_threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let cancelled = &cancelled;
            handles.push(scope.spawn(move || {
                while let Ok(idx) = job_rx.recv() {
                    if cancelled.load(Ordering::Relaxed) {
                        break;
                    }
                    let sample = &samples[idx];
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        analyze_sample(sample, tree, config)
                    }))
                    .unwrap_or_else(|_| {
                        Err(HaplocheckError::Analysis(format!(
                            "analysis of sample '{}' panicked",
                            sample.id()
                        )))
                    });
                    if result_tx.send((idx, result)).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(job_rx);
        drop(result_tx);

        let feeder = scope.spawn(move || {
            for idx in 0..samples.len() {
                if job_tx.send(idx).is_err() {
                    break;
                }
            }
        });

        let mut slots: Vec<Option<ContaminationResult>> = (0..samples.len()).map(|_| None).collect();
        let mut failure = None;
        let mut finished = 0;
        for (idx, result) in result_rx.iter() {
            match result {
                Ok(result) => {
                    slots[idx] = Some(result);
                    finished += 1;
                    on_result(finished);
                }
                Err(e) => {
                    debug!("Cancelling run after failure on sample {}", samples[idx].id());
                    cancelled.store(true, Ordering::Relaxed);
                    failure = Some(e);
                    break;
                }
            }
        }
        // Unblock any worker still sending so the scope can join.
        drop(result_rx);

        for handle in handles {
            handle
                .join()
                .map_err(|_| HaplocheckError::Analysis("worker thread panicked".to_string()))?;
        }
        feeder
            .join()
            .map_err(|_| HaplocheckError::Analysis("feeder thread panicked".to_string()))?;

        if let Some(e) = failure {
            return Err(e);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.ok_or_else(|| {
                    HaplocheckError::Analysis(format!("no result for sample '{}'", samples[idx].id()))
                })
            })
            .collect()
    })
}
