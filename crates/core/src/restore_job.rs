use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::config::RestoreConfig;
use crate::input::{read_input, InputError};
use crate::mapping::{MappingDocument, MappingError};
use crate::path_resolver::{PathResolver, ResolveError};
use crate::source_filter::SourceFilter;
use crate::tree_writer::{SourceSink, WriteFailure};

/// Errors that end the job for one input file. Siblings are unaffected.
#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Why a single accepted source was not restored.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Unresolvable(#[from] ResolveError),
    #[error(transparent)]
    Write(#[from] WriteFailure),
}

#[derive(Debug)]
pub struct SourceFailure {
    pub identifier: String,
    pub reason: SourceError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Loaded,
    Filtering,
    Writing,
    Done,
    Failed,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStage::Loaded => "loaded",
            JobStage::Filtering => "filtering",
            JobStage::Writing => "writing",
            JobStage::Done => "done",
            JobStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What will happen to one recorded source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Rejected,
    NoContent,
    Unresolvable(ResolveError),
    Write { destination: PathBuf },
}

/// One recorded source while a job is working on it.
#[derive(Debug, Clone)]
pub struct SourceEntry<'a> {
    pub identifier: &'a str,
    pub content: Option<&'a str>,
    pub disposition: Disposition,
}

impl SourceEntry<'_> {
    pub fn accepted(&self) -> bool {
        self.disposition != Disposition::Rejected
    }

    pub fn destination(&self) -> Option<&Path> {
        match &self.disposition {
            Disposition::Write { destination } => Some(destination),
            _ => None,
        }
    }
}

/// Outcome of restoring one mapping document.
#[derive(Debug, Default)]
pub struct RestoreResult {
    /// Sources that passed the filter.
    pub accepted: usize,
    pub written: usize,
    /// Accepted sources without embedded content.
    pub skipped: Vec<String>,
    /// Per-source failures, in document order.
    pub failures: Vec<SourceFailure>,
}

impl RestoreResult {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct JobReport {
    pub input: PathBuf,
    pub outcome: Result<RestoreResult, JobError>,
}

impl JobReport {
    pub fn stage(&self) -> JobStage {
        match self.outcome {
            Ok(_) => JobStage::Done,
            Err(_) => JobStage::Failed,
        }
    }

    /// `Processed <n> files for <input>`, or `None` when the job failed.
    pub fn summary_line(&self) -> Option<String> {
        self.outcome.as_ref().ok().map(|result| {
            format!("Processed {} files for {}", result.accepted, self.input.display())
        })
    }
}

/// Decides what happens to each recorded source. Needs no sink, so it also
/// serves listings that write nothing.
#[derive(Debug, Clone)]
pub struct SourcePlanner<'a> {
    output_dir: &'a Path,
    filter: SourceFilter,
    resolver: PathResolver,
}

impl<'a> SourcePlanner<'a> {
    pub fn new(config: &'a RestoreConfig) -> Self {
        Self {
            output_dir: &config.output_dir,
            filter: SourceFilter::new(&config.filter),
            resolver: PathResolver::new(&config.resolver),
        }
    }

    /// Decide the fate of every recorded source without writing anything.
    pub fn plan<'d>(&self, document: &'d MappingDocument) -> Vec<SourceEntry<'d>> {
        document
            .sources()
            .iter()
            .map(|identifier| {
                let identifier = identifier.as_str();
                let content = document.content_for(identifier);
                let disposition = if !self.filter.accepts(identifier) {
                    Disposition::Rejected
                } else if content.is_none() {
                    Disposition::NoContent
                } else {
                    match self.resolver.resolve(identifier, self.output_dir) {
                        Ok(destination) => Disposition::Write { destination },
                        Err(e) => Disposition::Unresolvable(e),
                    }
                };
                SourceEntry {
                    identifier,
                    content,
                    disposition,
                }
            })
            .collect()
    }
}

/// Restores the sources of mapping documents through a [`SourceSink`].
pub struct RestoreJob<'a, S: SourceSink> {
    config: &'a RestoreConfig,
    planner: SourcePlanner<'a>,
    sink: &'a S,
}

impl<'a, S: SourceSink> RestoreJob<'a, S> {
    pub fn new(config: &'a RestoreConfig, sink: &'a S) -> Self {
        Self {
            config,
            planner: SourcePlanner::new(config),
            sink,
        }
    }

    pub fn plan<'d>(&self, document: &'d MappingDocument) -> Vec<SourceEntry<'d>> {
        self.planner.plan(document)
    }

    /// Write every accepted source of an already parsed document.
    ///
    /// Sources sharing a destination are written one after another in
    /// document order, so the last one listed wins. Distinct destinations are
    /// written concurrently.
    pub async fn execute(&self, document: &MappingDocument) -> RestoreResult {
        debug!("{} ({} sources)", JobStage::Filtering, document.sources().len());
        let mut result = RestoreResult::default();
        let mut failures: Vec<(usize, SourceFailure)> = Vec::new();
        let mut groups: Vec<(PathBuf, Vec<(usize, &str, &str)>)> = Vec::new();
        let mut group_of: HashMap<PathBuf, usize> = HashMap::new();

        for (idx, entry) in self.plan(document).into_iter().enumerate() {
            let content = entry.content.unwrap_or_default();
            match entry.disposition {
                Disposition::Rejected => continue,
                Disposition::NoContent => {
                    info!("No embedded content for {}, skipping", entry.identifier);
                    result.skipped.push(entry.identifier.to_string());
                }
                Disposition::Unresolvable(e) => {
                    error!("{e}");
                    failures.push((
                        idx,
                        SourceFailure {
                            identifier: entry.identifier.to_string(),
                            reason: e.into(),
                        },
                    ));
                }
                Disposition::Write { destination } => match group_of.get(&destination) {
                    Some(&g) => {
                        let writes = &mut groups[g].1;
                        warn!(
                            "{} and {} both restore to {}; the later one wins",
                            writes[0].1,
                            entry.identifier,
                            destination.display()
                        );
                        writes.push((idx, entry.identifier, content));
                    }
                    None => {
                        group_of.insert(destination.clone(), groups.len());
                        groups.push((destination, vec![(idx, entry.identifier, content)]));
                    }
                },
            }
            result.accepted += 1;
        }

        debug!("{} ({} destinations)", JobStage::Writing, groups.len());
        let sink = self.sink;
        let outcomes: Vec<Vec<(usize, &str, Result<(), WriteFailure>)>> =
            stream::iter(groups.into_iter().map(move |(path, writes)| async move {
                let mut done = Vec::with_capacity(writes.len());
                for (idx, identifier, content) in writes {
                    let outcome = sink.write(&path, content).await;
                    if outcome.is_ok() {
                        debug!("Wrote {} bytes to {}", content.len(), path.display());
                    }
                    done.push((idx, identifier, outcome));
                }
                done
            }))
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        for (idx, identifier, outcome) in outcomes.into_iter().flatten() {
            match outcome {
                Ok(()) => result.written += 1,
                Err(e) => {
                    error!("{e}");
                    failures.push((
                        idx,
                        SourceFailure {
                            identifier: identifier.to_string(),
                            reason: e.into(),
                        },
                    ));
                }
            }
        }

        failures.sort_by_key(|(idx, _)| *idx);
        result.failures = failures.into_iter().map(|(_, f)| f).collect();
        result
    }

    /// Read, parse and restore one input file.
    pub async fn run(&self, input: &Path) -> Result<RestoreResult, JobError> {
        let raw = read_input(input).await?;
        let document = MappingDocument::parse(&raw)?;
        debug!("{}: {}", input.display(), JobStage::Loaded);
        let result = self.execute(&document).await;

        info!(
            "{}: {} accepted, {} written, {} skipped, {} failed",
            input.display(),
            result.accepted,
            result.written,
            result.skipped.len(),
            result.failed()
        );
        debug!("{}: {}", input.display(), JobStage::Done);
        Ok(result)
    }
}

/// Run one job per input, up to `config.concurrency` at a time. Reports come
/// back in input order; a failed input never stops the others.
pub async fn restore_all<S: SourceSink>(
    inputs: &[PathBuf],
    config: &RestoreConfig,
    sink: &S,
) -> Vec<JobReport> {
    let job = RestoreJob::new(config, sink);
    let job = &job;
    stream::iter(inputs.iter().map(move |input| async move {
        let outcome = job.run(input).await;
        if let Err(e) = &outcome {
            error!("{}: {e}", input.display());
            debug!("{}: {}", input.display(), JobStage::Failed);
        }
        JobReport {
            input: input.clone(),
            outcome,
        }
    }))
    .buffered(config.concurrency.max(1))
    .collect()
    .await
}
