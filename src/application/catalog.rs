//! Document catalog service
//!
//! Caches one tree per source location and answers node-scoped queries by
//! delegating to a [`DocumentProvider`]. The query surface never fails:
//! problems are logged and surface as an absent tree, empty text or the
//! placeholder page.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::artifacts::ArtifactTracker;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    extract_section, headings, DomainError, Index, Listing, NodeKind, TreeArena, TreeBuilder,
    TreeNode,
};
use crate::infrastructure::traits::{DocumentProvider, FileSystem, RenderOptions};

/// Page returned for nodes that have nothing to render.
pub const PLACEHOLDER_PAGE: &str = "<html></html>";

/// Section shown as a document's details.
pub const DETAILS_SECTION: &str = "DESCRIPTION";

/// Association of a source location with the root of its tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub location: PathBuf,
    pub root: Index,
}

/// Result of a render request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedDoc {
    /// The document itself, nothing on disk
    Inline(String),
    /// A transient page removed at catalog teardown
    Artifact { uri: String, path: PathBuf },
}

impl RenderedDoc {
    pub fn placeholder() -> Self {
        Self::Inline(PLACEHOLDER_PAGE.to_string())
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Artifact { .. })
    }

    /// The inline document, or the `file://` locator of the artifact.
    pub fn content(&self) -> &str {
        match self {
            Self::Inline(page) => page,
            Self::Artifact { uri, .. } => uri,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Inline(_) => None,
            Self::Artifact { path, .. } => Some(path),
        }
    }
}

/// What the provider needs to address one document.
#[derive(Debug, Clone, Copy)]
struct DocumentRef<'a> {
    location: &'a Path,
    document: &'a str,
    category: &'a str,
}

pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Catalog of document trees for any number of source locations.
///
/// Single-threaded: `get_tree` and `render` take `&mut self`, so the
/// lookup-or-build sequence and the artifact list are never raced.
pub struct Catalog {
    provider: Arc<dyn DocumentProvider>,
    builder: TreeBuilder,
    arena: TreeArena,
    entries: Vec<CatalogEntry>,
    artifacts: ArtifactTracker,
    page_options: RenderOptions,
    text_options: RenderOptions,
}

impl Catalog {
    pub fn new(
        provider: Arc<dyn DocumentProvider>,
        fs: Arc<dyn FileSystem>,
        settings: &Settings,
    ) -> Self {
        Self {
            provider,
            builder: TreeBuilder::new(),
            arena: TreeArena::new(),
            entries: Vec::new(),
            artifacts: ArtifactTracker::new(fs, settings.artifact_dir.clone()),
            page_options: settings.page_options(),
            text_options: settings.text_options(),
        }
    }

    /// Root of the tree for `location`, building it on first request.
    ///
    /// Returns None when the provider finds nothing there; nothing is cached
    /// in that case, so a later call asks the provider again.
    #[instrument(level = "debug", skip(self))]
    pub fn get_tree(&mut self, location: &Path) -> Option<Index> {
        if let Some(entry) = self.entries.iter().find(|e| e.location == location) {
            debug!("get_tree: cached root for {}", location.display());
            return Some(entry.root);
        }

        let listing: Listing = match self.provider.list(location) {
            Ok(Some(entries)) => entries.into_iter().collect(),
            Ok(None) => {
                debug!("get_tree: nothing found at {}", location.display());
                return None;
            }
            Err(e) => {
                warn!("get_tree: listing {} failed: {}", location.display(), e);
                return None;
            }
        };

        let root = match self
            .builder
            .build(&mut self.arena, &location.to_string_lossy(), &listing)
        {
            Ok(root) => root,
            Err(e) => {
                debug!("get_tree: {}", e);
                return None;
            }
        };

        self.entries.push(CatalogEntry {
            location: location.to_path_buf(),
            root,
        });
        Some(root)
    }

    /// Render a document node to a transient page using the configured options.
    pub fn render(&mut self, node: Index) -> RenderedDoc {
        let options = self.page_options.clone();
        self.render_with(node, &options)
    }

    /// Render a document node to a transient page.
    ///
    /// Catalog and category nodes yield the inline placeholder page.
    #[instrument(level = "debug", skip(self, options))]
    pub fn render_with(&mut self, node: Index, options: &RenderOptions) -> RenderedDoc {
        let page = {
            let Some(doc) = self.resolve(node, "render") else {
                return RenderedDoc::placeholder();
            };
            self.provider
                .render(doc.location, doc.document, doc.category, options)
                .unwrap_or_else(|e| {
                    warn!("render: {}({}) failed: {}", doc.document, doc.category, e);
                    String::new()
                })
        };

        match self.artifacts.persist(&page) {
            Ok(path) => RenderedDoc::Artifact {
                uri: file_uri(&path),
                path,
            },
            Err(e) => {
                warn!("render: {}", e);
                RenderedDoc::placeholder()
            }
        }
    }

    /// One-line description of a document node, verbatim from the provider.
    #[instrument(level = "debug", skip(self))]
    pub fn summary(&self, node: Index) -> String {
        let Some(doc) = self.resolve(node, "summary") else {
            return String::new();
        };
        self.provider
            .summarize(doc.location, doc.document, doc.category)
            .unwrap_or_else(|e| {
                warn!("summary: {}({}) failed: {}", doc.document, doc.category, e);
                String::new()
            })
    }

    /// The section headed `name` of a document node, heading included.
    #[instrument(level = "debug", skip(self))]
    pub fn section(&self, node: Index, name: &str) -> String {
        self.plain_text(node, "section")
            .map(|text| extract_section(&text, name))
            .unwrap_or_default()
    }

    /// The DESCRIPTION section of a document node.
    pub fn details(&self, node: Index) -> String {
        self.section(node, DETAILS_SECTION)
    }

    /// Headings of a document node in document order.
    pub fn sections(&self, node: Index) -> Vec<String> {
        self.plain_text(node, "sections")
            .map(|text| headings(&text).into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    pub fn node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get_node(idx)
    }

    pub fn kind(&self, idx: Index) -> Option<NodeKind> {
        self.arena.kind(idx)
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena.children(idx)
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn artifacts(&self) -> &ArtifactTracker {
        &self.artifacts
    }

    /// Source location of the tree `node` belongs to.
    pub fn location_of(&self, node: Index) -> Option<&Path> {
        let root = self.arena.root_of(node)?;
        self.entries
            .iter()
            .find(|e| e.root == root)
            .map(|e| e.location.as_path())
    }

    /// Document `name` in `category` below `root`, matched by title, key or synonym.
    pub fn find_document(&self, root: Index, category: &str, name: &str) -> Option<Index> {
        let category_idx = self.arena.find_child(root, category)?;
        self.arena.find_child(category_idx, name)
    }

    fn plain_text(&self, node: Index, op: &str) -> Option<String> {
        let doc = self.resolve(node, op)?;
        match self
            .provider
            .render(doc.location, doc.document, doc.category, &self.text_options)
        {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("{}: {}({}) failed: {}", op, doc.document, doc.category, e);
                None
            }
        }
    }

    /// Document reference for a document node, None for anything else.
    ///
    /// Organizational nodes are silently None; unknown nodes are logged.
    fn resolve(&self, node: Index, op: &str) -> Option<DocumentRef<'_>> {
        match self.document_ref(node) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("{}: {}", op, e);
                None
            }
        }
    }

    fn document_ref(&self, node: Index) -> ApplicationResult<Option<DocumentRef<'_>>> {
        let kind = self.arena.kind(node).ok_or(DomainError::UnknownNode)?;
        if kind.is_organizational() {
            return Ok(None);
        }

        let page = self.arena.get_node(node).ok_or(DomainError::UnknownNode)?;
        let category = page
            .parent
            .and_then(|idx| self.arena.get_node(idx))
            .ok_or(DomainError::UnknownNode)?;
        let location = self
            .location_of(node)
            .ok_or_else(|| DomainError::UnregisteredRoot {
                title: page.data.title.clone(),
            })?;

        Ok(Some(DocumentRef {
            location,
            document: &page.data.key,
            category: &category.data.key,
        }))
    }
}
