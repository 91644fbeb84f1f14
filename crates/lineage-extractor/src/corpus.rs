//! A documentation corpus on disk: its root, vocabulary and parsed pages

use crate::config::ExtractorConfig;
use crate::error::{ExtractorError, Result};
use crate::locale::{IndexKind, Locale};
use crate::normalize::normalize_for_matching;
use crate::resolver::{LinkResolver, LinkResult};
use lineage_document::{DocumentError, DocumentStore, DocumentTree, ParseCache, SectionLocator};
use lineage_domain::{ObjectId, ReportRef};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// An exported documentation corpus
///
/// Cloning is cheap; clones share the parse cache.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    locale: &'static Locale,
    config: ExtractorConfig,
    cache: Arc<ParseCache>,
    locator: SectionLocator,
}

impl Corpus {
    /// Open a corpus with a fresh parse cache
    pub fn open(root: impl Into<PathBuf>, config: ExtractorConfig) -> Result<Self> {
        let chain = config.encoding_chain().map_err(ExtractorError::Config)?;
        let cache = Arc::new(ParseCache::new(DocumentStore::new(chain)));
        Self::with_cache(root, config, cache)
    }

    /// Open a corpus over an existing parse cache
    ///
    /// The root must be a directory holding the document index of the
    /// configured locale.
    pub fn with_cache(
        root: impl Into<PathBuf>,
        config: ExtractorConfig,
        cache: Arc<ParseCache>,
    ) -> Result<Self> {
        let locale = config
            .locale()
            .map_err(|_| ExtractorError::UnknownLocale(config.locale.clone()))?;
        config.validate().map_err(ExtractorError::Config)?;

        let root = root.into();
        if !root.is_dir() {
            return Err(ExtractorError::Config(format!(
                "Corpus root is not a directory: {}",
                root.display()
            )));
        }
        let document_index = root.join(locale.index_file(IndexKind::Document));
        if !document_index.is_file() {
            return Err(ExtractorError::Config(format!(
                "Document index not found: {}",
                document_index.display()
            )));
        }

        Ok(Self {
            root,
            locale,
            config,
            cache,
            locator: SectionLocator::new(locale.markers.object),
        })
    }

    /// Corpus root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Vocabulary of the corpus
    pub fn locale(&self) -> &'static Locale {
        self.locale
    }

    /// Extraction settings
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Shared parse cache
    pub fn cache(&self) -> &Arc<ParseCache> {
        &self.cache
    }

    /// Section locator using the locale's object marker
    pub fn locator(&self) -> &SectionLocator {
        &self.locator
    }

    /// Path of a corpus-relative file
    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Path of an index document
    pub fn index_path(&self, kind: IndexKind) -> PathBuf {
        self.path(self.locale.index_file(kind))
    }

    /// Parse (or fetch from cache) a corpus-relative document
    pub fn document(&self, file: &str) -> std::result::Result<Arc<DocumentTree>, DocumentError> {
        self.cache.get_or_parse(&self.path(file))
    }

    /// Parse (or fetch from cache) an index document
    pub fn index(&self, kind: IndexKind) -> std::result::Result<Arc<DocumentTree>, DocumentError> {
        self.cache.get_or_parse(&self.index_path(kind))
    }

    /// Build a resolver over an index document
    pub fn resolver(&self, kind: IndexKind) -> std::result::Result<LinkResolver, DocumentError> {
        let doc = self.index(kind)?;
        Ok(LinkResolver::from_index(&doc).with_threshold(self.config.fuzzy_threshold))
    }

    /// Parse every index document present in the corpus
    pub fn warm_indexes(&self) -> usize {
        let paths: Vec<_> = IndexKind::ALL
            .iter()
            .map(|kind| self.index_path(*kind))
            .filter(|path| path.is_file())
            .collect();
        let loaded = self.cache.preload(paths);
        debug!("Pre-warmed {} index documents", loaded);
        loaded
    }

    /// Parse every page of the corpus
    pub fn warm_all(&self) -> usize {
        let loaded = self.cache.preload_dir(&self.root);
        info!("Pre-warmed {} documents under {}", loaded, self.root.display());
        loaded
    }

    /// Every report listed in the document index, in index order
    pub fn reports(&self) -> Result<Vec<ReportRef>> {
        Ok(self
            .resolver(IndexKind::Document)?
            .entries()
            .iter()
            .map(|e| ReportRef {
                name: e.name.clone(),
                id: e.id.clone(),
                file: e.file.clone(),
            })
            .collect())
    }

    /// The report whose anchor or placeholder id equals `id`
    pub fn find_by_id(&self, id: &ObjectId) -> Result<Option<ReportRef>> {
        Ok(self
            .resolver(IndexKind::Document)?
            .resolve(Some(id), None)
            .map(report_ref))
    }

    /// Reports matching `name`: every exact match, else every
    /// case-insensitive match, else every accent-folded match, else the best
    /// fuzzy match
    pub fn find_by_name(&self, name: &str) -> Result<Vec<ReportRef>> {
        Ok(self
            .resolver(IndexKind::Document)?
            .resolve_all_by_name(name)
            .into_iter()
            .map(report_ref)
            .collect())
    }

    /// Reports whose name contains `text`, ignoring case and accents
    pub fn filter(&self, text: &str) -> Result<Vec<ReportRef>> {
        let needle = normalize_for_matching(text);
        Ok(self
            .reports()?
            .into_iter()
            .filter(|r| normalize_for_matching(&r.name).contains(&needle))
            .collect())
    }
}

fn report_ref(found: LinkResult) -> ReportRef {
    ReportRef {
        id: found.object_id(),
        name: found.name,
        file: found.file,
    }
}
