use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use crate::error::Result;
use crate::types::Commit;
use crate::vcs::log_parser::{parse_hg_log, HG_TEMPLATE};
use crate::vcs::{run, Backend, VcsKind};

/// Mercurial access through the `hg` executable.
///
/// `HGPLAIN` is set on every invocation so user aliases and output tweaks
/// from `.hgrc` cannot change what we parse.
pub struct Hg {
    directory: PathBuf,
}

impl Hg {
    pub fn new(directory: &Path) -> Self {
        Hg { directory: directory.to_path_buf() }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("hg");
        cmd.env("HGPLAIN", "1").arg("--repository").arg(&self.directory);
        cmd
    }
}

impl Backend for Hg {
    fn kind(&self) -> VcsKind {
        VcsKind::Hg
    }

    fn clone_remote(&mut self, remote: &str, branch: Option<&str>) -> Result<()> {
        let mut cmd = Command::new("hg");
        cmd.env("HGPLAIN", "1").args(["clone", "--quiet"]);
        if let Some(b) = branch {
            cmd.args(["--branch", b]);
        }
        cmd.arg(remote).arg(&self.directory);
        debug!(remote, directory = %self.directory.display(), "hg clone");
        run(cmd, "hg", "clone").map(|_| ())
    }

    fn update(&mut self) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["pull", "--update", "--quiet"]);
        debug!(directory = %self.directory.display(), "hg pull --update");
        run(cmd, "hg", "pull").map(|_| ())
    }

    fn log(&self) -> Result<Vec<Commit>> {
        let mut cmd = self.command();
        cmd.args(["log", "--template", HG_TEMPLATE]);
        parse_hg_log(&run(cmd, "hg", "log")?)
    }
}
