//! Branch store access
//!
//! The core only needs three operations from a repository, captured by
//! [`BranchStore`]. [`GitCliStore`] implements them by shelling out to `git`.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::branch::LOCAL_BRANCH_PREFIX;
use crate::error::GiraError;

/// Local branch references of one repository
pub trait BranchStore {
    /// Every local branch reference, fully qualified, in listing order
    fn list_local_branch_references(&self) -> Result<Vec<String>, GiraError>;

    /// Delete one reference
    fn remove_reference(&self, reference_name: &str) -> Result<(), GiraError>;

    /// Reference HEAD points at, or `None` when HEAD is detached
    fn head_reference(&self) -> Result<Option<String>, GiraError>;
}

/// Git CLI backed branch store
#[derive(Debug, Clone)]
pub struct GitCliStore {
    repo_root: PathBuf,
}

impl GitCliStore {
    /// Open the repository containing `dir`
    pub fn open(dir: &Path) -> Result<Self, GiraError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GiraError::NotAGitRepository
                } else {
                    GiraError::Git(format!("failed to run git: {}", e))
                }
            })?;

        if !output.status.success() {
            return Err(GiraError::NotAGitRepository);
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self {
            repo_root: PathBuf::from(root),
        })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    fn git(&self, args: &[&str]) -> Result<Output, GiraError> {
        Command::new("git")
            .arg("-C")
            .arg(&self.repo_root)
            .args(args)
            .output()
            .map_err(|e| GiraError::Git(format!("failed to run git {}: {}", args[0], e)))
    }
}

impl BranchStore for GitCliStore {
    fn list_local_branch_references(&self) -> Result<Vec<String>, GiraError> {
        let output = self.git(&["for-each-ref", "--format=%(refname)", LOCAL_BRANCH_PREFIX])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GiraError::Git(format!("git for-each-ref failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn remove_reference(&self, reference_name: &str) -> Result<(), GiraError> {
        let output = self
            .git(&["update-ref", "-d", reference_name])
            .map_err(|e| GiraError::BranchRemoval {
                branch: reference_name.to_string(),
                reason: e.to_string(),
                deleted: Vec::new(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GiraError::BranchRemoval {
                branch: reference_name.to_string(),
                reason: format!("git update-ref -d failed: {}", stderr.trim()),
                deleted: Vec::new(),
            });
        }

        Ok(())
    }

    fn head_reference(&self) -> Result<Option<String>, GiraError> {
        let output = self.git(&["symbolic-ref", "-q", "HEAD"])?;

        // Exit code 1 with -q means HEAD is detached
        match output.status.code() {
            Some(0) => {
                let head = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Ok(Some(head).filter(|h| !h.is_empty()))
            }
            Some(1) => Ok(None),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(GiraError::Git(format!("git symbolic-ref failed: {}", stderr.trim())))
            }
        }
    }
}
