use anyhow::{Context, Result, anyhow};
use git2::{Repository, Signature, Time};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Git version control for the notes of a vault
///
/// Every operation is a no-op when the vault is not inside a repository.
pub struct GitOps {
    repo: Option<Arc<Mutex<Repository>>>,
}

impl GitOps {
    /// Discover the repository containing the vault directory, if any
    pub fn new(vault_root: &Path) -> Self {
        let repo = Repository::discover(vault_root)
            .ok()
            .map(|r| Arc::new(Mutex::new(r)));
        Self { repo }
    }

    /// Check if the vault is under git version control
    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    fn lock(&self) -> Result<Option<MutexGuard<'_, Repository>>> {
        match &self.repo {
            Some(r) => r
                .lock()
                .map(Some)
                .map_err(|_| anyhow!("Git repository lock poisoned")),
            None => Ok(None),
        }
    }

    /// Fast-forward the current branch from `origin`
    pub fn pull(&self) -> Result<()> {
        let Some(repo) = self.lock()? else {
            return Ok(());
        };

        let head = repo.head().context("Failed to get HEAD")?;
        let branch_name = head
            .shorthand()
            .context("Failed to get branch name")?
            .to_string();

        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        remote
            .fetch(&[&branch_name], None, None)
            .context("Failed to fetch from origin")?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }
        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{}", branch_name);
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(fetch_commit.id(), "Fast-forward")?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
            return Ok(());
        }

        Err(anyhow!(
            "Vault has diverged from origin and needs a manual merge"
        ))
    }

    /// Commit one note of the vault
    pub fn commit(&self, note_path: &Path, message: &str) -> Result<()> {
        let Some(repo) = self.lock()? else {
            return Ok(());
        };

        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?;
        let canonical_workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
        let canonical_note = note_path
            .canonicalize()
            .unwrap_or_else(|_| note_path.to_path_buf());
        let relative = canonical_note
            .strip_prefix(&canonical_workdir)
            .context("Note is not in the repository")?;

        let mut index = repo.index()?;
        index.add_path(relative)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let parent_commit = match repo.head() {
            Ok(head) => {
                let oid = head.target().context("HEAD has no target")?;
                Some(repo.find_commit(oid)?)
            }
            // Unborn branch: this is the initial commit
            Err(_) => None,
        };
        let parents: Vec<_> = parent_commit.iter().collect();

        let signature = Self::signature(&repo)?;
        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        Ok(())
    }

    /// Push the current branch to `origin`
    pub fn push(&self) -> Result<()> {
        let Some(repo) = self.lock()? else {
            return Ok(());
        };

        let head = repo.head().context("Failed to get HEAD")?;
        let branch_name = head
            .shorthand()
            .context("Failed to get branch name")?
            .to_string();

        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        let refspec = format!("refs/heads/{}", branch_name);
        remote.push(&[&refspec], None)?;
        Ok(())
    }

    fn signature(repo: &Repository) -> Result<Signature<'static>> {
        let config = repo.config()?;
        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| "Focus MCP Server".to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| "focus-mcp@localhost".to_string());

        match Signature::now(&name, &email) {
            Ok(sig) => Ok(sig),
            Err(_) => {
                let time = Time::new(1_700_000_000, 0);
                Signature::new(&name, &email, &time)
                    .context("Failed to create signature with fixed time")
            }
        }
    }
}
