//! Object identifiers and defining-file references

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of an identifier as emitted by the documentation exporter
pub const CANONICAL_ID_LEN: usize = 32;

/// Identifier of a documented object
///
/// The exporter writes ids as 32 hexadecimal characters, but links in the
/// wild show both cases. Ids are stored upper-cased so equality and hashing
/// are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse an id from any non-empty hexadecimal string
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_domain::ObjectId;
    ///
    /// let id = ObjectId::parse("0a1b2c3d4e5f60718293a4b5c6d7e8f9").unwrap();
    /// assert_eq!(id.as_str(), "0A1B2C3D4E5F60718293A4B5C6D7E8F9");
    /// assert!(ObjectId::parse("not-an-id").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Empty object id".to_string());
        }
        if !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid object id: {}", trimmed));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Derive a deterministic id from an ordered list of parts
    ///
    /// The same parts always produce the same id. Attribute forms and objects
    /// the corpus never identified get their ids this way, so repeated
    /// extractions agree.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_domain::ObjectId;
    ///
    /// let a = ObjectId::derive(["8D679D3711D3E4981000E787EC6DE8A4", "ID"]);
    /// let b = ObjectId::derive(["8D679D3711D3E4981000E787EC6DE8A4", "ID"]);
    /// assert_eq!(a, b);
    /// assert!(a.is_canonical());
    /// ```
    pub fn derive<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hasher = Sha256::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                hasher.update(b"_");
            }
            hasher.update(part.as_ref().as_bytes());
        }
        let digest = hasher.finalize();
        let hex: String = digest
            .iter()
            .take(CANONICAL_ID_LEN / 2)
            .map(|b| format!("{:02X}", b))
            .collect();
        Self(hex)
    }

    /// Borrow the upper-case string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id has the exporter's canonical 32-character shape
    pub fn is_canonical(&self) -> bool {
        self.0.len() == CANONICAL_ID_LEN
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

/// Reference to the document (and optional anchor) defining an object
///
/// Paths are relative to the corpus root, exactly as they appear in hrefs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    /// Document file name relative to the corpus root
    pub file: String,

    /// Anchor inside the document, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl FileRef {
    /// Create a reference from its parts
    pub fn new(file: impl Into<String>, anchor: Option<String>) -> Self {
        Self {
            file: file.into(),
            anchor: anchor.filter(|a| !a.is_empty()),
        }
    }

    /// Split an href of the form `file.html#ANCHOR`
    ///
    /// Returns `None` for purely local hrefs (`#ANCHOR`) and empty strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_domain::FileRef;
    ///
    /// let r = FileRef::from_href("Metric.html#ABC123").unwrap();
    /// assert_eq!(r.file, "Metric.html");
    /// assert_eq!(r.anchor.as_deref(), Some("ABC123"));
    /// assert!(FileRef::from_href("#ABC123").is_none());
    /// ```
    pub fn from_href(href: &str) -> Option<Self> {
        let href = href.trim();
        let (file, anchor) = match href.split_once('#') {
            Some((file, anchor)) => (file, Some(anchor.to_string())),
            None => (href, None),
        };
        if file.is_empty() {
            return None;
        }
        Some(Self::new(file, anchor))
    }

    /// Render back to href form
    pub fn href(&self) -> String {
        match &self.anchor {
            Some(anchor) => format!("{}#{}", self.file, anchor),
            None => self.file.clone(),
        }
    }

    /// Prefix the file with a base directory, as exporters do when writing
    /// absolute-looking references
    pub fn with_base(&self, base: &str) -> Self {
        let base = base.trim_end_matches(['/', '\\']);
        if base.is_empty() {
            return self.clone();
        }
        Self {
            file: format!("{}/{}", base, self.file),
            anchor: self.anchor.clone(),
        }
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}
