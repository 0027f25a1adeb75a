use git2::Repository;

use crate::error::{Result, TagScopeError};

/// Read-only wrapper around git2 Repository.
///
/// git-tagscope never writes to the repository; it only reads the current
/// branch name and the existing tag names.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Creates a new GitRepo instance for the current working directory.
    ///
    /// Discovers the git repository in the current directory or parent
    /// directories.
    ///
    /// # Returns
    /// * `Ok(GitRepo)` - Successfully initialized repository wrapper
    /// * `Err` - If not in a git repository
    pub fn discover() -> Result<Self> {
        let repo = Repository::discover(".")?;
        Ok(GitRepo { repo })
    }

    /// Name of the branch HEAD currently points at.
    ///
    /// # Returns
    /// * `Ok(String)` - Shorthand branch name, e.g. "release/2.5"
    /// * `Err` - If HEAD is detached or the name is not valid UTF-8
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(TagScopeError::branch(
                "HEAD is detached, specify a branch with --branch",
            ));
        }
        head.shorthand()
            .map(|name| name.to_string())
            .ok_or_else(|| TagScopeError::branch("Branch name is not valid UTF-8"))
    }

    /// All tag names in the repository, sorted alphabetically.
    ///
    /// Tags with non-UTF-8 names are skipped.
    pub fn tag_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .repo
            .tag_names(None)?
            .iter()
            .flatten()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        Ok(names)
    }
}
