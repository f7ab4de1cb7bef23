//! Error types for contrib-rank

use thiserror::Error;

/// Errors raised by repository access, configuration, and reporting.
///
/// The ranking engine itself never fails; everything here comes from the
/// glue around it.
#[derive(Error, Debug)]
pub enum Error {
    /// A repository entry names a VCS type we have no backend for.
    #[error("{0:?} is an unsupported repository type")]
    UnsupportedType(String),

    /// The URL's host is not listed under any VCS type in `vcs_by_domain`.
    #[error("repository type of {0:?} is unknown")]
    UnknownDomain(String),

    /// No host could be extracted from the URL.
    #[error("cannot determine the host of {0:?}")]
    UnresolvableUrl(String),

    /// A claimed commit id does not exist in the repository log.
    #[error("commit {0:?} not found")]
    CommitNotFound(String),

    /// The VCS executable could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The VCS executable ran but reported failure.
    #[error("{program} {action} failed: {stderr}")]
    Command {
        program: &'static str,
        action: String,
        stderr: String,
    },

    /// A log record could not be parsed into a commit.
    #[error("malformed log record: {0:?}")]
    MalformedLog(String),

    /// A project lists several repositories but has no name.
    #[error("project name not specified but {0} repositories given")]
    AmbiguousProjectName(usize),

    /// The configuration file is unreadable, unparsable, or invalid.
    #[error("{0}")]
    Config(String),

    /// The worker pool could not be started.
    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
