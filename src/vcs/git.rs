use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use crate::error::Result;
use crate::types::Commit;
use crate::vcs::log_parser::{parse_git_log, GIT_FORMAT};
use crate::vcs::{run, Backend, VcsKind};

/// Git access through the `git` executable.
pub struct Git {
    directory: PathBuf,
}

impl Git {
    pub fn new(directory: &Path) -> Self {
        Git { directory: directory.to_path_buf() }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.directory);
        cmd
    }
}

impl Backend for Git {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn clone_remote(&mut self, remote: &str, branch: Option<&str>) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.arg("clone");
        if let Some(b) = branch {
            cmd.args(["--branch", b]);
        }
        cmd.arg(remote).arg(&self.directory);
        debug!(remote, directory = %self.directory.display(), "git clone");
        run(cmd, "git", "clone").map(|_| ())
    }

    fn update(&mut self) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["pull", "--quiet"]);
        debug!(directory = %self.directory.display(), "git pull");
        run(cmd, "git", "pull").map(|_| ())
    }

    fn log(&self) -> Result<Vec<Commit>> {
        // `git log` fails on a repository without commits
        let mut head = self.command();
        head.args(["rev-list", "--all", "--max-count=1"]);
        if run(head, "git", "rev-list")?.trim().is_empty() {
            debug!(directory = %self.directory.display(), "repository has no commits");
            return Ok(Vec::new());
        }

        let mut cmd = self.command();
        cmd.args(["log", GIT_FORMAT]);
        parse_git_log(&run(cmd, "git", "log")?)
    }
}
