pub mod config;
pub mod input;
pub mod mapping;
pub mod output;
pub mod path_resolver;
pub mod restore_job;
pub mod source_filter;
pub mod tree_writer;

pub use config::{FilterConfig, ResolverConfig, RestoreConfig};
pub use input::{expand_pattern, expand_patterns, read_input, InputError};
pub use mapping::{MappingDocument, MappingError};
pub use output::prepare_output_root;
pub use path_resolver::{PathResolver, ResolveError};
pub use restore_job::{
    restore_all, Disposition, JobError, JobReport, JobStage, RestoreJob, RestoreResult,
    SourceEntry, SourceError, SourceFailure, SourcePlanner,
};
pub use source_filter::SourceFilter;
pub use tree_writer::{MemorySink, SourceSink, TreeWriter, WriteFailure};
