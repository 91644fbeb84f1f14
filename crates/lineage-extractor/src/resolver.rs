//! Link resolver - finds an object's entry in a per-type index document
//!
//! Index documents list every object of one type as
//! `<a class="MAINBODY" href="File.html#ANCHOR">Name</a>`. A reference is
//! resolved by id when one is known, then by progressively looser name
//! matching:
//!
//! 1. id (anchor or placeholder id, case-insensitive)
//! 2. exact name
//! 3. case-insensitive name
//! 4. accent-folded name
//! 5. fuzzy score at or above the threshold, first entry winning ties

use crate::links::href_id;
use crate::normalize::normalize_for_matching;
use lineage_document::DocumentTree;
use lineage_domain::{FileRef, ObjectId};
use std::collections::HashSet;
use std::fmt;

/// Class marking entry links in index documents
pub const INDEX_ENTRY_CLASS: &str = "MAINBODY";

/// Default minimum fuzzy score
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Which step of the matching order produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStrategy {
    /// Anchor or placeholder id
    Id,
    /// Byte-for-byte name
    Exact,
    /// Name ignoring case
    CaseInsensitive,
    /// Name ignoring case and accents
    AccentFolded,
    /// Best fuzzy score
    Fuzzy,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchStrategy::Id => "id",
            MatchStrategy::Exact => "exact",
            MatchStrategy::CaseInsensitive => "case-insensitive",
            MatchStrategy::AccentFolded => "accent-folded",
            MatchStrategy::Fuzzy => "fuzzy",
        };
        f.write_str(name)
    }
}

/// One entry of an index document
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Display text
    pub name: String,
    /// Raw href
    pub href: String,
    /// File and anchor the href points to
    pub file: FileRef,
    /// Placeholder id, else a hex anchor
    pub id: Option<ObjectId>,
    normalized: String,
}

impl IndexEntry {
    /// Build an entry from its display text and href
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Option<Self> {
        let name = name.into().trim().to_string();
        let href = href.into().trim().to_string();
        let file = FileRef::from_href(&href)?;
        Some(Self {
            normalized: normalize_for_matching(&name),
            id: href_id(&href),
            name,
            href,
            file,
        })
    }

    fn matches_id(&self, id: &ObjectId) -> bool {
        self.id.as_ref() == Some(id)
            || self
                .file
                .anchor
                .as_deref()
                .map(|a| a.eq_ignore_ascii_case(id.as_str()))
                .unwrap_or(false)
    }
}

/// A resolved reference
#[derive(Debug, Clone, PartialEq)]
pub struct LinkResult {
    /// Display name from the index
    pub name: String,
    /// Defining file and anchor
    pub file: FileRef,
    /// Raw href
    pub href: String,
    /// Object id, when the index entry encodes one
    pub id: Option<ObjectId>,
    /// Step that matched
    pub matched_by: MatchStrategy,
}

impl LinkResult {
    fn from_entry(entry: &IndexEntry, matched_by: MatchStrategy) -> Self {
        Self {
            name: entry.name.clone(),
            file: entry.file.clone(),
            href: entry.href.clone(),
            id: entry.id.clone(),
            matched_by,
        }
    }

    /// Id of the target, falling back to the anchor
    pub fn object_id(&self) -> Option<ObjectId> {
        self.id.clone().or_else(|| {
            self.file
                .anchor
                .as_deref()
                .and_then(|a| ObjectId::parse(a).ok())
        })
    }
}

/// Fuzzy similarity of two already-normalized strings
///
/// Only candidates containing the query score. Containment contributes
/// `len(query) / len(candidate)`, a candidate starting with the query earns
/// `0.5` more, and each shared whitespace-separated word adds `0.1`.
pub fn fuzzy_score(query: &str, candidate: &str) -> f64 {
    if query.is_empty() || !candidate.contains(query) {
        return 0.0;
    }

    let mut score = query.chars().count() as f64 / candidate.chars().count() as f64;
    if candidate.starts_with(query) {
        score += 0.5;
    }

    let query_words: HashSet<&str> = query.split_whitespace().collect();
    let shared = candidate
        .split_whitespace()
        .collect::<HashSet<_>>()
        .intersection(&query_words)
        .count();
    score + 0.1 * shared as f64
}

/// Resolves references against one index document
#[derive(Debug, Clone)]
pub struct LinkResolver {
    entries: Vec<IndexEntry>,
    fuzzy_threshold: f64,
}

impl LinkResolver {
    /// Collect the entries of an index document
    pub fn from_index(doc: &DocumentTree) -> Self {
        let entries = doc
            .find_all(doc.root(), "a")
            .filter(|n| {
                doc.element(*n)
                    .map(|e| e.has_class(INDEX_ENTRY_CLASS))
                    .unwrap_or(false)
            })
            .filter_map(|n| IndexEntry::new(doc.text(n), doc.attr(n, "href")?))
            .collect();
        Self::from_entries(entries)
    }

    /// Build a resolver over explicit entries
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        Self {
            entries,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    /// Override the fuzzy acceptance threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    /// Entries in index order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve by id and/or name using the full matching order
    ///
    /// An id that is not found falls through to name matching.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_extractor::{IndexEntry, LinkResolver, MatchStrategy};
    ///
    /// let resolver = LinkResolver::from_entries(vec![
    ///     IndexEntry::new("Mesa", "Atributo.html#AA").unwrap(),
    ///     IndexEntry::new("Mês", "Atributo.html#BB").unwrap(),
    /// ]);
    /// let found = resolver.resolve(None, Some("Mes")).unwrap();
    /// assert_eq!(found.name, "Mês");
    /// assert_eq!(found.matched_by, MatchStrategy::AccentFolded);
    /// ```
    pub fn resolve(&self, id: Option<&ObjectId>, name: Option<&str>) -> Option<LinkResult> {
        if let Some(found) = id.and_then(|id| self.by_id(id)) {
            return Some(found);
        }
        let name = name.map(str::trim).filter(|n| !n.is_empty())?;
        self.by_name(name)
            .into_iter()
            .next()
            .or_else(|| self.by_fuzzy(name))
    }

    /// Resolve by id or exact name only
    pub fn resolve_strict(&self, id: Option<&ObjectId>, name: Option<&str>) -> Option<LinkResult> {
        if let Some(found) = id.and_then(|id| self.by_id(id)) {
            return Some(found);
        }
        let name = name.map(str::trim).filter(|n| !n.is_empty())?;
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| LinkResult::from_entry(e, MatchStrategy::Exact))
    }

    /// Every entry matching `name` at the first matching step
    ///
    /// Exact, case-insensitive and accent-folded steps return all matches;
    /// the fuzzy step returns its single best candidate.
    pub fn resolve_all_by_name(&self, name: &str) -> Vec<LinkResult> {
        let name = name.trim();
        if name.is_empty() {
            return Vec::new();
        }
        let found = self.by_name(name);
        if found.is_empty() {
            self.by_fuzzy(name).into_iter().collect()
        } else {
            found
        }
    }

    fn by_id(&self, id: &ObjectId) -> Option<LinkResult> {
        self.entries
            .iter()
            .find(|e| e.matches_id(id))
            .map(|e| LinkResult::from_entry(e, MatchStrategy::Id))
    }

    /// Matches of the first name step (exact, case-insensitive, accent-folded)
    /// that finds anything
    fn by_name(&self, name: &str) -> Vec<LinkResult> {
        let exact = self.collect(MatchStrategy::Exact, |e| e.name == name);
        if !exact.is_empty() {
            return exact;
        }

        let lower = name.to_lowercase();
        let folded_case = self.collect(MatchStrategy::CaseInsensitive, |e| {
            e.name.to_lowercase() == lower
        });
        if !folded_case.is_empty() {
            return folded_case;
        }

        let normalized = normalize_for_matching(name);
        if normalized.is_empty() {
            return Vec::new();
        }
        self.collect(MatchStrategy::AccentFolded, |e| e.normalized == normalized)
    }

    fn collect<F>(&self, strategy: MatchStrategy, matches: F) -> Vec<LinkResult>
    where
        F: Fn(&IndexEntry) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| matches(*e))
            .map(|e| LinkResult::from_entry(e, strategy))
            .collect()
    }

    fn by_fuzzy(&self, name: &str) -> Option<LinkResult> {
        let query = normalize_for_matching(name);
        let mut best: Option<(&IndexEntry, f64)> = None;
        for entry in &self.entries {
            let score = fuzzy_score(&query, &entry.normalized);
            if score < self.fuzzy_threshold {
                continue;
            }
            if best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((entry, score));
            }
        }
        best.map(|(e, _)| LinkResult::from_entry(e, MatchStrategy::Fuzzy))
    }
}
