//! Encoding fallback chain
//!
//! Exporter output mixes legacy single-byte pages with UTF-8 ones. Each
//! encoding in the chain is tried strictly (malformed input is a failure, not
//! a replacement character); the first that decodes cleanly wins. A lossy
//! UTF-8 decode closes the chain so decoding itself never fails.

use crate::DocumentError;
use encoding_rs::Encoding;

/// Default labels, legacy single-byte first and UTF-8 last
pub const DEFAULT_ENCODINGS: &[&str] = &["iso-8859-1", "windows-1252", "utf-8"];

/// Result of decoding a byte stream
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Decoded text
    pub text: String,
    /// Name of the encoding that succeeded
    pub encoding: &'static str,
    /// True when the lossy fallback had to be used
    pub lossy: bool,
}

/// Ordered list of encodings to try
#[derive(Debug, Clone)]
pub struct EncodingChain {
    encodings: Vec<&'static Encoding>,
}

impl EncodingChain {
    /// Build a chain from WHATWG encoding labels
    ///
    /// Labels that resolve to the same encoding are kept once, at their first
    /// position.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_document::EncodingChain;
    ///
    /// let chain = EncodingChain::from_labels(["utf-8", "latin1"]).unwrap();
    /// assert_eq!(chain.names(), vec!["UTF-8", "windows-1252"]);
    /// assert!(EncodingChain::from_labels(["klingon"]).is_err());
    /// ```
    pub fn from_labels<I, S>(labels: I) -> Result<Self, DocumentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut encodings: Vec<&'static Encoding> = Vec::new();
        for label in labels {
            let label = label.as_ref();
            let encoding = Encoding::for_label(label.trim().as_bytes())
                .ok_or_else(|| DocumentError::UnknownEncoding(label.to_string()))?;
            if !encodings.contains(&encoding) {
                encodings.push(encoding);
            }
        }
        Ok(Self { encodings })
    }

    /// Names of the encodings in try order
    pub fn names(&self) -> Vec<&'static str> {
        self.encodings.iter().map(|e| e.name()).collect()
    }

    /// Decode bytes with the first encoding that accepts them
    ///
    /// A byte-order mark overrides the chain.
    pub fn decode(&self, bytes: &[u8]) -> Decoded {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            if let Some(text) =
                encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            {
                return Decoded {
                    text: text.into_owned(),
                    encoding: encoding.name(),
                    lossy: false,
                };
            }
        }

        for encoding in &self.encodings {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes)
            {
                return Decoded {
                    text: text.into_owned(),
                    encoding: encoding.name(),
                    lossy: false,
                };
            }
        }

        Decoded {
            text: String::from_utf8_lossy(bytes).into_owned(),
            encoding: encoding_rs::UTF_8.name(),
            lossy: true,
        }
    }
}

impl Default for EncodingChain {
    fn default() -> Self {
        let mut encodings: Vec<&'static Encoding> = Vec::new();
        for label in DEFAULT_ENCODINGS {
            if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
                if !encodings.contains(&encoding) {
                    encodings.push(encoding);
                }
            }
        }
        Self { encodings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_chain_order() {
        let chain = EncodingChain::default();
        // iso-8859-1 is an alias of windows-1252 in the WHATWG registry
        assert_eq!(chain.names(), vec!["windows-1252", "UTF-8"]);
    }

    #[test]
    fn test_latin1_bytes_decode_with_default_chain() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode("Métrica Função");
        let decoded = EncodingChain::default().decode(&bytes);
        assert_eq!(decoded.text, "Métrica Função");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_falls_through_to_third_encoding() {
        // 0xC3 is unmapped in ISO-8859-8 and 0xA7 in ISO-8859-6, so UTF-8
        // "ç" is rejected by both before UTF-8 accepts it.
        let chain = EncodingChain::from_labels(["iso-8859-8", "iso-8859-6", "utf-8"]).unwrap();
        let decoded = chain.decode("Função".as_bytes());
        assert_eq!(decoded.encoding, "UTF-8");
        assert_eq!(decoded.text, "Função");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_lossy_fallback_never_fails() {
        let chain = EncodingChain::from_labels(["utf-8"]).unwrap();
        let decoded = chain.decode(&[0x41, 0xFF, 0x42]);
        assert!(decoded.lossy);
        assert_eq!(decoded.text, "A\u{FFFD}B");
    }

    #[test]
    fn test_bom_overrides_chain() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("Mês".as_bytes());
        let decoded = EncodingChain::default().decode(&bytes);
        assert_eq!(decoded.text, "Mês");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = EncodingChain::from_labels(["utf-8", "no-such-charset"]).unwrap_err();
        assert!(matches!(err, DocumentError::UnknownEncoding(label) if label == "no-such-charset"));
    }

    proptest! {
        #[test]
        fn prop_utf8_chain_preserves_text(s in "\\PC{0,40}") {
            let chain = EncodingChain::from_labels(["utf-8"]).unwrap();
            let decoded = chain.decode(s.as_bytes());
            prop_assert_eq!(decoded.text, s);
        }
    }
}
