//! Declaration chain service
//!
//! Loads declaration files and follows their `extends` links to build the ordered
//! declaration list the reconciler consumes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use termtree::Tree;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    reduce, Declaration, DeclarationFile, DeclarationFormat, DomainError, ResolvedState, TagKind,
};
use crate::infrastructure::traits::FileSystem;

/// Service for reading declaration files from disk.
pub struct DeclarationService {
    fs: Arc<dyn FileSystem>,
}

impl DeclarationService {
    /// Create a new declaration service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a single declaration file.
    pub fn load(&self, path: &Path) -> ApplicationResult<DeclarationFile> {
        let format = DeclarationFormat::from_path(path)?;
        let content = self
            .fs
            .read_to_string(path)
            .or_missing("read declaration file", path)?;
        Ok(DeclarationFile::parse(&content, path.to_path_buf(), format)?)
    }

    /// Collect the chain ending at `leaf`, ordered outermost first.
    ///
    /// Follows `extends` from the leaf towards the root. Visiting a file twice is a cycle.
    pub fn collect(&self, leaf: &Path) -> ApplicationResult<Vec<DeclarationFile>> {
        debug!("collect: leaf={}", leaf.display());
        let mut visited = HashSet::new();
        let mut chain: Vec<DeclarationFile> = Vec::new();
        let mut next = Some(leaf.to_path_buf());

        while let Some(current) = next.take() {
            if !self.fs.is_file(&current) {
                return Err(match chain.last() {
                    Some(child) => ApplicationError::OperationFailed {
                        context: format!(
                            "extends target not found: {} (referenced from {})",
                            current.display(),
                            child.path.display()
                        ),
                        source: Box::new(std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "extends target not found",
                        )),
                    },
                    None => DomainError::FileNotFound(current).into(),
                });
            }

            let canonical = self
                .fs
                .canonicalize(&current)
                .with_path_context("canonicalize", &current)?;
            if !visited.insert(canonical) {
                return Err(DomainError::CycleDetected(current).into());
            }

            let file = self.load(&current)?;
            next = file.extends.clone();
            chain.push(file);
        }

        chain.reverse();
        debug!("collect: found {} files in chain", chain.len());
        Ok(chain)
    }

    /// Collect the chains of several leaves and concatenate them in argument order.
    pub fn load_all(&self, leaves: &[PathBuf]) -> ApplicationResult<Vec<DeclarationFile>> {
        let mut files = Vec::new();
        for leaf in leaves {
            files.extend(self.collect(leaf)?);
        }
        Ok(files)
    }

    /// Declarations of `files`, keeping their order.
    pub fn declarations(files: &[DeclarationFile]) -> Vec<Declaration> {
        files.iter().map(|f| f.declaration.clone()).collect()
    }

    /// Load the chains of `leaves` and reduce them to one state.
    pub fn resolve(&self, leaves: &[PathBuf], placeholder: &str) -> ApplicationResult<ResolvedState> {
        let files = self.load_all(leaves)?;
        Ok(reduce(&Self::declarations(&files), placeholder))
    }

    /// Render a chain as nested tree: each file holds its contributions and the next-inner file.
    pub fn chain_tree(files: &[DeclarationFile]) -> Option<Tree<String>> {
        let mut inner: Option<Tree<String>> = None;
        for file in files.iter().rev() {
            let mut node = Tree::new(file.path.display().to_string())
                .with_leaves(contributions(&file.declaration).into_iter().map(Tree::new));
            if let Some(child) = inner.take() {
                node.push(child);
            }
            inner = Some(node);
        }
        inner
    }
}

fn contributions(declaration: &Declaration) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(title) = &declaration.title {
        lines.push(format!("title: {title}"));
    }
    if let Some(template) = &declaration.title_template {
        lines.push(format!("titleTemplate: {template}"));
    }
    for kind in TagKind::ALL {
        for tag in declaration.tags(kind).unwrap_or_default() {
            lines.push(format!("{kind}: {tag}"));
        }
    }
    lines
}
