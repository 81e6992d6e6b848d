//! Namespace-aware node identifiers.
//!
//! A nodeset encodes every node id with a namespace *index* that is only
//! meaningful together with that document's `NamespaceUris` table. Before two
//! ids from different documents can be compared, the index is resolved to the
//! namespace URI, which is what [`NodeId`] stores.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{NaylistError, NaylistResult};

/// Display name of the base namespace, which nodesets leave implicit.
pub const BASE_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";

/// Anchored grammar of a single numeric node id token.
fn token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(?:ns=(?P<ns>\d+);)?i=(?P<i>\d+)$").expect("Hardcoded regex pattern is valid")
    })
}

/// Ordered namespace URIs declared by one document.
///
/// Index 0 is always the base namespace, stored as the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    uris: Vec<String>,
}

impl NamespaceTable {
    /// Build a table from the URIs a document declares, in document order.
    pub fn new(declared: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut uris = vec![String::new()];
        uris.extend(declared.into_iter().map(Into::into));
        Self { uris }
    }

    /// Table of a document that declares no namespaces of its own.
    pub fn base() -> Self {
        Self::new(std::iter::empty::<String>())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.uris.get(index).map(String::as_str)
    }

    /// First index of `uri` in this table.
    pub fn index_of(&self, uri: &str) -> Option<usize> {
        self.uris.iter().position(|u| u == uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.uris.iter().any(|u| u == uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Always false: the base namespace is implicit in every table.
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::base()
    }
}

/// A numeric node identifier, namespace resolved to its URI.
///
/// Equality and hashing are by `(namespace, id)`, so the same node read from
/// two documents with different namespace tables compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId {
    /// Namespace URI; empty for the base namespace
    pub namespace: String,
    /// Numeric identifier within the namespace
    pub id: u32,
}

impl NodeId {
    pub fn new(namespace: impl Into<String>, id: u32) -> Self {
        Self {
            namespace: namespace.into(),
            id,
        }
    }

    /// Node id in the base namespace.
    pub fn base(id: u32) -> Self {
        Self::new(String::new(), id)
    }

    /// Decode a `ns=N;i=M` or `i=M` token against a document's namespace table.
    pub fn parse(token: &str, table: &NamespaceTable) -> NaylistResult<Self> {
        let caps = token_regex()
            .captures(token.trim())
            .ok_or_else(|| NaylistError::malformed(token, "expected (ns=<int>;)?i=<int>"))?;
        Self::from_parts(
            caps.name("ns").map(|m| m.as_str()),
            &caps["i"],
            token,
            table,
        )
    }

    /// Decode already-captured index and id digits.
    ///
    /// A missing namespace index means index 0.
    pub(crate) fn from_parts(
        ns_index: Option<&str>,
        id: &str,
        token: &str,
        table: &NamespaceTable,
    ) -> NaylistResult<Self> {
        let index = match ns_index {
            Some(digits) => digits.parse::<usize>().map_err(|_| {
                NaylistError::malformed(token, format!("namespace index {digits} out of range"))
            })?,
            None => 0,
        };
        let namespace = table.get(index).ok_or_else(|| {
            NaylistError::malformed(
                token,
                format!(
                    "namespace index {index} not declared (document has {} namespaces)",
                    table.len()
                ),
            )
        })?;
        let id = id
            .parse::<u32>()
            .map_err(|_| NaylistError::malformed(token, format!("identifier {id} out of range")))?;
        Ok(Self::new(namespace, id))
    }

    /// Whether `token` is spelled as a numeric node id at all.
    ///
    /// String, GUID and opaque ids (`s=`, `g=`, `b=`) are valid in a nodeset
    /// but can never be referenced through the numeric grammar.
    pub fn is_numeric(token: &str) -> bool {
        token_regex().is_match(token.trim())
    }

    pub fn is_base(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Encode this id as text.
    ///
    /// Without a table the namespace URI is written out (`ns=<uri>;i=M`).
    /// With a table the namespace is written as its index in that table, the
    /// way the document itself spells it; this fails if the table does not
    /// declare the namespace.
    pub fn encode(&self, table: Option<&NamespaceTable>) -> NaylistResult<String> {
        if self.is_base() {
            return Ok(format!("i={}", self.id));
        }
        match table {
            None => Ok(self.to_string()),
            Some(table) => match table.index_of(&self.namespace) {
                Some(index) => Ok(format!("ns={};i={}", index, self.id)),
                None => Err(NaylistError::malformed(
                    self.to_string(),
                    "namespace not declared by this document",
                )),
            },
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_base() {
            write!(f, "i={}", self.id)
        } else {
            write!(f, "ns={};i={}", self.namespace, self.id)
        }
    }
}

/// Human-readable namespace name for narration.
pub fn namespace_display(uri: &str) -> &str {
    if uri.is_empty() {
        BASE_NAMESPACE_URI
    } else {
        uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> NamespaceTable {
        NamespaceTable::new(["urn:di", "urn:dep"])
    }

    #[test]
    fn test_parse_base_namespace() {
        let id = NodeId::parse("i=85", &table()).unwrap();
        assert_eq!(id, NodeId::base(85));
        assert!(id.is_base());
    }

    #[test]
    fn test_parse_with_namespace_index() {
        let id = NodeId::parse("ns=2;i=100", &table()).unwrap();
        assert_eq!(id, NodeId::new("urn:dep", 100));
    }

    #[test]
    fn test_parse_explicit_zero_index() {
        let id = NodeId::parse("ns=0;i=7", &table()).unwrap();
        assert_eq!(id, NodeId::base(7));
    }

    #[test]
    fn test_identity_independent_of_table() {
        let a = NodeId::parse("ns=1;i=5", &NamespaceTable::new(["urn:x"])).unwrap();
        let b = NodeId::parse("ns=3;i=5", &NamespaceTable::new(["urn:p", "urn:q", "urn:x"])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_bad_grammar() {
        for token in ["s=Name", "ns=1;s=Name", "i=", "ns=;i=4", "i=4x", "g=abc"] {
            let err = NodeId::parse(token, &table()).unwrap_err();
            assert!(
                matches!(err, NaylistError::MalformedIdentifier { .. }),
                "{token} should be malformed"
            );
        }
    }

    #[test]
    fn test_parse_rejects_undeclared_index() {
        let err = NodeId::parse("ns=5;i=1", &table()).unwrap_err();
        assert!(err.to_string().contains("namespace index 5 not declared"));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(NodeId::parse("i=4294967296", &table()).is_err());
        assert_eq!(NodeId::parse("i=4294967295", &table()).unwrap().id, u32::MAX);
    }

    #[test]
    fn test_encode_canonical() {
        assert_eq!(NodeId::base(42).encode(None).unwrap(), "i=42");
        assert_eq!(
            NodeId::new("urn:dep", 300).encode(None).unwrap(),
            "ns=urn:dep;i=300"
        );
        assert_eq!(NodeId::new("urn:dep", 300).to_string(), "ns=urn:dep;i=300");
    }

    #[test]
    fn test_encode_with_table() {
        let t = table();
        assert_eq!(NodeId::new("urn:dep", 300).encode(Some(&t)).unwrap(), "ns=2;i=300");
        assert_eq!(NodeId::base(1).encode(Some(&t)).unwrap(), "i=1");
        assert!(NodeId::new("urn:other", 1).encode(Some(&t)).is_err());
    }

    #[test]
    fn test_encode_parse_agree_with_table() {
        let t = table();
        let id = NodeId::new("urn:di", 6001);
        let text = id.encode(Some(&t)).unwrap();
        assert_eq!(NodeId::parse(&text, &t).unwrap(), id);
    }

    #[test]
    fn test_namespace_table_lookup() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(0), Some(""));
        assert_eq!(t.index_of("urn:dep"), Some(2));
        assert!(t.contains(""));
        assert!(!t.contains("urn:missing"));
        assert_eq!(NamespaceTable::default(), NamespaceTable::base());
    }

    #[test]
    fn test_namespace_display() {
        assert_eq!(namespace_display(""), BASE_NAMESPACE_URI);
        assert_eq!(namespace_display("urn:dep"), "urn:dep");
    }
}
