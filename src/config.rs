use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};
use crate::vcs::VcsKind;

/// Default config file name looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "contrib-rank.yml";

/// All settings that can be placed in a contrib-rank.yml config file.
/// CLI flags always take precedence over values set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankConfig {
    /// The person whose contributions are ranked. May be left out when
    /// `--name` supplies it.
    #[serde(default)]
    pub name: String,

    /// Parent directory for working copies (default: user cache dir).
    pub checkout_dir: Option<PathBuf>,

    /// VCS type → hosts, used when a repository entry has no `type`.
    #[serde(default)]
    pub vcs_by_domain: BTreeMap<VcsKind, Vec<String>>,

    pub past_year_ranking: Option<bool>,
    pub jobs: Option<usize>,
    pub format: Option<String>,

    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
}

/// One project: a single repository, or several analysed together.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    pub name: Option<String>,
    pub url: Option<String>,
    pub urls: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub branch: Option<String>,
    /// Commit ids to attribute to `name` in every repository of this project.
    #[serde(default)]
    pub commits: Vec<String>,
}

impl RepositoryConfig {
    /// The repository URLs of this project, `urls` taking precedence over `url`.
    pub fn urls(&self) -> Vec<&str> {
        match (&self.urls, &self.url) {
            (Some(urls), _) => urls.iter().map(String::as_str).collect(),
            (None, Some(url)) => vec![url.as_str()],
            (None, None) => Vec::new(),
        }
    }

    /// The explicit `type`, or the one inferred from the URL host.
    pub fn kind_for(&self, url: &str, domains: &BTreeMap<VcsKind, Vec<String>>) -> Result<VcsKind> {
        match &self.kind {
            Some(kind) => kind.parse(),
            None => crate::vcs::kind_for_url(domains, url),
        }
    }
}

impl RankConfig {
    /// Validates semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Missing 'name': set it to the author name to rank".to_string());
        }

        if let Some(fmt) = &self.format {
            match fmt.as_str() {
                "terminal" | "json" => {}
                other => {
                    return Err(format!(
                        "Invalid 'format' value: \"{other}\". \
                         Expected one of: \"terminal\", \"json\""
                    ))
                }
            }
        }

        if let Some(0) = self.jobs {
            return Err("Invalid 'jobs' value: 0. Must be 1 or greater".to_string());
        }

        for (i, repo) in self.repositories.iter().enumerate() {
            let label = repo
                .name
                .clone()
                .or_else(|| repo.url.clone())
                .unwrap_or_else(|| format!("#{}", i + 1));

            match (&repo.url, &repo.urls) {
                (Some(_), Some(_)) => {
                    return Err(format!("Repository {label}: set either 'url' or 'urls', not both"))
                }
                (None, None) => {
                    return Err(format!("Repository {label}: one of 'url' or 'urls' is required"))
                }
                (None, Some(urls)) if urls.is_empty() => {
                    return Err(format!("Repository {label}: 'urls' must not be empty"))
                }
                _ => {}
            }

            if repo.urls().len() > 1 && repo.name.is_none() {
                return Err(format!(
                    "Repository {label}: 'name' is required when more than one url is given"
                ));
            }

            if let Some(kind) = &repo.kind {
                if kind.parse::<VcsKind>().is_err() {
                    return Err(format!(
                        "Repository {label}: invalid 'type' \"{kind}\". Expected \"git\" or \"hg\""
                    ));
                }
            }
        }

        Ok(())
    }

    /// Checkout parent directory, falling back to the user cache directory.
    pub fn checkout_parent(&self) -> PathBuf {
        self.checkout_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(env!("CARGO_PKG_NAME"))
        })
    }
}

/// Reads and parses a YAML config file from `path`.
///
/// Semantic validation is left to the caller so CLI overrides can be applied
/// first; see [`RankConfig::validate`].
pub fn load_config(path: &Path) -> Result<RankConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read config file '{}': {e}", path.display())))?;
    serde_yaml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file '{}': {e}", path.display())))
}

/// Annotated YAML template, printed by `--generate-config`.
pub static TEMPLATE: &str = r#"# contrib-rank configuration file
# Generated by: contrib-rank --generate-config
#
# CLI flags always take precedence over values in this file.
# Save this file as contrib-rank.yml, then run:
#
#   contrib-rank --config contrib-rank.yml

# ── Who ────────────────────────────────────────────────────────────────────────

# Your author name as it appears in commit logs. Spelling variants such as
# "JaneDoe", "jane doe" and "JDoe" are matched automatically.
name: "Jane Doe"

# ── Where ──────────────────────────────────────────────────────────────────────

# Parent directory for working copies. Defaults to the user cache directory.
# checkout_dir: "~/.cache/contrib-rank"

# Repository type by host, used when a repository has no explicit 'type'.
vcs_by_domain:
  git:
    - github.com
    - gitlab.com
  hg:
    - hg.mozilla.org

# One entry per project. A project with several 'urls' needs a 'name';
# its repositories are analysed as a single commit history.
repositories:
  - url: "https://github.com/owner/project"
#   branch: "main"
#   type: git
#   # Commits made under an identity that cannot be matched automatically:
#   commits:
#     - 0123456789abcdef0123456789abcdef01234567
# - name: "Big Project"
#   urls:
#     - "https://hg.mozilla.org/project-a"
#     - "https://hg.mozilla.org/project-b"

# ── Output ─────────────────────────────────────────────────────────────────────

# Output format: terminal, json
# format: "terminal"

# Also rank yourself among the last 12 months of contributors.
# past_year_ranking: false

# Number of repositories fetched in parallel. Defaults to the CPU count.
# jobs: 4
"#;

/// Prints the config template to stdout, or writes it to `output_path` if given.
pub fn print_template(output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => std::fs::write(path, TEMPLATE).map_err(|e| {
            Error::Config(format!("Cannot write config template to '{}': {e}", path.display()))
        }),
        None => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
