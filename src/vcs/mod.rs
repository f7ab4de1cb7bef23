pub mod git;
pub mod hg;
pub mod log_parser;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use tracing::{debug, info};
use crate::error::{Error, Result};
use crate::types::Commit;

// ─── Backend capability ───────────────────────────────────────────────────────

/// Supported version-control systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    Git,
    Hg,
}

impl std::fmt::Display for VcsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VcsKind::Git => write!(f, "git"),
            VcsKind::Hg  => write!(f, "hg"),
        }
    }
}

impl FromStr for VcsKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "git" => Ok(VcsKind::Git),
            "hg"  => Ok(VcsKind::Hg),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

impl VcsKind {
    /// Creates the backend for a working copy at `directory`.
    pub fn backend(self, directory: &Path) -> Box<dyn Backend> {
        match self {
            VcsKind::Git => Box::new(git::Git::new(directory)),
            VcsKind::Hg  => Box::new(hg::Hg::new(directory)),
        }
    }

    /// Detects the VCS of an existing working copy from its metadata folder.
    pub fn detect(directory: &Path) -> Option<Self> {
        if directory.join(".git").exists() {
            Some(VcsKind::Git)
        } else if directory.join(".hg").exists() {
            Some(VcsKind::Hg)
        } else {
            None
        }
    }
}

/// Operations every VCS backend provides on one working copy.
pub trait Backend: Send {
    fn kind(&self) -> VcsKind;
    /// Creates the working copy from `remote`.
    fn clone_remote(&mut self, remote: &str, branch: Option<&str>) -> Result<()>;
    /// Brings an existing working copy up to date with its remote.
    fn update(&mut self) -> Result<()>;
    /// Every commit reachable in the working copy.
    fn log(&self) -> Result<Vec<Commit>>;
    /// Releases any session held by the backend.
    fn close(&mut self) {}
}

/// Runs a prepared VCS command and returns its stdout.
pub(crate) fn run(mut cmd: Command, program: &'static str, action: &str) -> Result<String> {
    let output = cmd.output().map_err(|source| Error::Spawn { program, source })?;
    if !output.status.success() {
        return Err(Error::Command {
            program,
            action: action.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ─── Checkout ─────────────────────────────────────────────────────────────────

/// A local working copy of one remote plus its materialized log.
#[derive(Debug, Clone)]
pub struct Checkout {
    remote: String,
    kind: VcsKind,
    directory: PathBuf,
    commits: Vec<Commit>,
    claimed: Vec<Commit>,
}

impl Checkout {
    /// Clones `remote` under `parent` (or updates the existing working copy)
    /// and reads its log.
    pub fn fetch(kind: VcsKind, remote: &str, parent: &Path, branch: Option<&str>) -> Result<Self> {
        let directory = parent.join(checkout_dir_name(remote));
        let mut backend = kind.backend(&directory);

        if directory.exists() {
            backend.update()?;
        } else {
            std::fs::create_dir_all(parent)?;
            info!(remote, "cloning");
            backend.clone_remote(remote, branch)?;
        }

        let commits = backend.log();
        backend.close();
        let commits = commits?;
        debug!(remote, kind = %backend.kind(), commits = commits.len(), "log read");

        Ok(Checkout {
            remote: remote.to_string(),
            kind,
            directory,
            commits,
            claimed: Vec::new(),
        })
    }

    /// Reads the log of an existing working copy without touching its remote.
    pub fn open_local(directory: &Path) -> Result<Self> {
        let kind = VcsKind::detect(directory)
            .ok_or_else(|| Error::UnsupportedType(directory.display().to_string()))?;
        let mut backend = kind.backend(directory);
        let commits = backend.log();
        backend.close();

        Ok(Checkout {
            remote: directory.display().to_string(),
            kind,
            directory: directory.to_path_buf(),
            commits: commits?,
            claimed: Vec::new(),
        })
    }

    #[cfg(test)]
    pub fn from_commits(remote: &str, kind: VcsKind, commits: Vec<Commit>) -> Self {
        Checkout {
            remote: remote.to_string(),
            kind,
            directory: PathBuf::from(remote),
            commits,
            claimed: Vec::new(),
        }
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn kind(&self) -> VcsKind {
        self.kind
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// Commits added through [`Checkout::claim_commit`].
    pub fn claimed(&self) -> &[Commit] {
        &self.claimed
    }

    /// Attributes commit `id` to `name` by appending a copy of it with the
    /// same timestamp and the id `<id>-author`.
    pub fn claim_commit(&mut self, name: &str, id: &str) -> Result<()> {
        let original = self
            .commits
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::CommitNotFound(id.to_string()))?;
        let claimed = Commit::new(format!("{id}-author"), original.timestamp, name);
        self.commits.push(claimed.clone());
        self.claimed.push(claimed);
        Ok(())
    }
}

/// Working-copy directory name for a remote: the hex BLAKE3 digest of the URL.
pub fn checkout_dir_name(remote: &str) -> String {
    blake3::hash(remote.as_bytes()).to_hex().to_string()
}

// ─── URL helpers ──────────────────────────────────────────────────────────────

static SCHEME_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://(?:[^@/]+@)?([^/:?#]+)").expect("scheme url regex")
});
static SCP_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[^@/:]+@)?([^/:]{2,}):").expect("scp url regex"));

/// Host part of a remote URL; handles `scheme://` and `user@host:path` forms.
pub fn url_host(url: &str) -> Option<&str> {
    SCHEME_URL
        .captures(url)
        .or_else(|| SCP_URL.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Picks the VCS for `url` from a kind → hosts mapping.
pub fn kind_for_url(domains: &BTreeMap<VcsKind, Vec<String>>, url: &str) -> Result<VcsKind> {
    let host = url_host(url).ok_or_else(|| Error::UnresolvableUrl(url.to_string()))?;
    domains
        .iter()
        .find(|(_, hosts)| hosts.iter().any(|h| h.eq_ignore_ascii_case(host)))
        .map(|(kind, _)| *kind)
        .ok_or_else(|| Error::UnknownDomain(host.to_string()))
}

/// Last path segment of a URL, without a trailing `.git`.
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let path = url.split(&['?', '#'][..]).next().unwrap_or(url).trim_end_matches('/');
    let last = path.rsplit(&['/', ':'][..]).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() { None } else { Some(name.to_string()) }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn checkout() -> Checkout {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Checkout::from_commits(
            "https://example.com/repo",
            VcsKind::Git,
            vec![Commit::new("abc", ts, "unknown"), Commit::new("def", ts, "Bob")],
        )
    }

    #[test]
    fn test_claim_commit_appends_synthetic_record() {
        let mut co = checkout();
        co.claim_commit("Jane Doe", "abc").expect("commit exists");
        assert_eq!(co.commits().len(), 3);
        let claimed = &co.claimed()[0];
        assert_eq!(claimed.id, "abc-author");
        assert_eq!(claimed.author, "Jane Doe");
        assert_eq!(claimed.timestamp, co.commits()[0].timestamp);
        assert_eq!(co.commits()[0].author, "unknown", "original record is kept");
    }

    #[test]
    fn test_claim_unknown_commit_fails() {
        let mut co = checkout();
        let err = co.claim_commit("Jane Doe", "nope").unwrap_err();
        assert!(matches!(err, Error::CommitNotFound(ref id) if id == "nope"));
        assert_eq!(co.commits().len(), 2);
    }

    #[test]
    fn test_url_host() {
        assert_eq!(url_host("https://github.com/rust-lang/rust"), Some("github.com"));
        assert_eq!(url_host("ssh://hg@hg.mozilla.org/mozilla-central"), Some("hg.mozilla.org"));
        assert_eq!(url_host("https://user@gitlab.com:8443/a/b.git"), Some("gitlab.com"));
        assert_eq!(url_host("git@github.com:owner/repo.git"), Some("github.com"));
        assert_eq!(url_host("relative/path"), None);
    }

    #[test]
    fn test_kind_for_url() {
        let mut domains = BTreeMap::new();
        domains.insert(VcsKind::Git, vec!["github.com".to_string()]);
        domains.insert(VcsKind::Hg, vec!["hg.python.org".to_string()]);
        assert_eq!(kind_for_url(&domains, "https://github.com/a/b").unwrap(), VcsKind::Git);
        assert_eq!(kind_for_url(&domains, "https://hg.python.org/cpython").unwrap(), VcsKind::Hg);
        assert!(matches!(
            kind_for_url(&domains, "https://bitbucket.org/a/b"),
            Err(Error::UnknownDomain(ref h)) if h == "bitbucket.org"
        ));
        assert!(matches!(kind_for_url(&domains, "nowhere"), Err(Error::UnresolvableUrl(_))));
    }

    #[test]
    fn test_vcs_kind_from_str() {
        assert_eq!("hg".parse::<VcsKind>().unwrap(), VcsKind::Hg);
        assert!(matches!("svn".parse::<VcsKind>(), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_repo_name_from_url() {
        assert_eq!(repo_name_from_url("https://github.com/owner/repo.git").as_deref(), Some("repo"));
        assert_eq!(repo_name_from_url("https://hg.python.org/cpython/").as_deref(), Some("cpython"));
        assert_eq!(repo_name_from_url("git@github.com:owner/tool.git").as_deref(), Some("tool"));
    }

    #[test]
    fn test_checkout_dir_name_is_stable_hex() {
        let a = checkout_dir_name("https://github.com/owner/repo");
        assert_eq!(a, checkout_dir_name("https://github.com/owner/repo"));
        assert_ne!(a, checkout_dir_name("https://github.com/owner/other"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().map(|o| o.status.success()).unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "Jane Doe")
            .env("GIT_AUTHOR_EMAIL", "jane@example.com")
            .env("GIT_COMMITTER_NAME", "Jane Doe")
            .env("GIT_COMMITTER_EMAIL", "jane@example.com")
            .status()
            .expect("git should run");
        assert!(status.success(), "git {args:?} failed");
    }

    fn commit_to(dir: &Path, message: &str) {
        git(dir, &["commit", "--allow-empty", "--quiet", "-m", message]);
    }

    #[test]
    fn test_fetch_clones_then_updates() {
        if !git_available() {
            eprintln!("Skipping: git executable not available");
            return;
        }
        let tmp = tempfile::tempdir().expect("tempdir");
        let origin = tmp.path().join("origin");
        std::fs::create_dir(&origin).unwrap();
        git(&origin, &["init", "--quiet"]);
        commit_to(&origin, "one");
        let remote = origin.to_str().unwrap();
        let parent = tmp.path().join("checkouts");

        let first = Checkout::fetch(VcsKind::Git, remote, &parent, None).expect("clone");
        assert_eq!(first.commits().len(), 1);
        assert_eq!(first.directory(), parent.join(checkout_dir_name(remote)));
        assert!(first.directory().join(".git").exists());

        commit_to(&origin, "two");
        let second = Checkout::fetch(VcsKind::Git, remote, &parent, None).expect("update");
        assert_eq!(second.commits().len(), 2, "existing working copy is pulled");
        assert_eq!(second.directory(), first.directory());
    }

    #[test]
    fn test_fetch_clones_requested_branch() {
        if !git_available() {
            eprintln!("Skipping: git executable not available");
            return;
        }
        let tmp = tempfile::tempdir().expect("tempdir");
        let origin = tmp.path().join("origin");
        std::fs::create_dir(&origin).unwrap();
        git(&origin, &["init", "--quiet"]);
        commit_to(&origin, "one");
        git(&origin, &["checkout", "--quiet", "-b", "feature"]);
        commit_to(&origin, "two");
        commit_to(&origin, "three");
        git(&origin, &["checkout", "--quiet", "-"]);
        let remote = origin.to_str().unwrap();

        let default = Checkout::fetch(VcsKind::Git, remote, &tmp.path().join("a"), None).expect("clone");
        assert_eq!(default.commits().len(), 1);
        let feature = Checkout::fetch(VcsKind::Git, remote, &tmp.path().join("b"), Some("feature")).expect("clone branch");
        assert_eq!(feature.commits().len(), 3);
    }

    #[test]
    fn test_fetch_empty_remote_has_no_commits() {
        if !git_available() {
            eprintln!("Skipping: git executable not available");
            return;
        }
        let tmp = tempfile::tempdir().expect("tempdir");
        let origin = tmp.path().join("empty");
        std::fs::create_dir(&origin).unwrap();
        git(&origin, &["init", "--quiet"]);

        let co = Checkout::fetch(VcsKind::Git, origin.to_str().unwrap(), &tmp.path().join("co"), None)
            .expect("an empty repository is not a failure");
        assert!(co.commits().is_empty());
    }

    #[test]
    fn test_detect_kind() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert_eq!(VcsKind::detect(tmp.path()), None);
        std::fs::create_dir(tmp.path().join(".hg")).unwrap();
        assert_eq!(VcsKind::detect(tmp.path()), Some(VcsKind::Hg));
    }
}
