//! Reference extraction from serialized nodeset text.
//!
//! References are found textually rather than structurally: node ids also hide
//! inside opaque payloads (`<Value>`, `<Definition>` fields, extension
//! objects) that no attribute query would reach. A token only counts when it
//! is a whole attribute value or a whole text node, i.e. bounded on the left by
//! `>` or `"` and on the right by `<` or `"`, so numbers inside prose are never
//! mistaken for references.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::NaylistResult;
use crate::node_id::{NamespaceTable, NodeId};

/// Delimiter-bounded node id.
fn embedded_id_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"[>"](?P<token>(?:ns=(?P<ns>\d+);)?i=(?P<i>\d+))[<"]"#)
            .expect("Hardcoded regex pattern is valid")
    })
}

/// Collects every node id embedded in `content`, decoded with `table`.
///
/// Works on whole documents and on the text of a single element alike.
pub fn scan_refs(content: &str, table: &NamespaceTable) -> NaylistResult<HashSet<NodeId>> {
    let mut refs = HashSet::new();
    scan_refs_into(content, table, &mut refs)?;
    Ok(refs)
}

/// Like [`scan_refs`], accumulating into an existing set.
pub fn scan_refs_into(
    content: &str,
    table: &NamespaceTable,
    refs: &mut HashSet<NodeId>,
) -> NaylistResult<()> {
    for caps in embedded_id_regex().captures_iter(content) {
        let id = NodeId::from_parts(
            caps.name("ns").map(|m| m.as_str()),
            &caps["i"],
            &caps["token"],
            table,
        )?;
        refs.insert(id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NaylistError;

    fn table() -> NamespaceTable {
        NamespaceTable::new(["urn:app", "urn:dep"])
    }

    #[test]
    fn test_scan_attribute_and_text() {
        let xml = r#"<UAObject NodeId="ns=1;i=5000" ParentNodeId="i=85">
            <References><Reference ReferenceType="i=40">ns=2;i=100</Reference></References>
        </UAObject>"#;
        let refs = scan_refs(xml, &table()).unwrap();
        assert_eq!(refs.len(), 4);
        assert!(refs.contains(&NodeId::new("urn:app", 5000)));
        assert!(refs.contains(&NodeId::base(85)));
        assert!(refs.contains(&NodeId::base(40)));
        assert!(refs.contains(&NodeId::new("urn:dep", 100)));
    }

    #[test]
    fn test_scan_ignores_prose() {
        let xml = "<Description>Set i=5 to enable the ns=1;i=6 mode</Description>";
        assert!(scan_refs(xml, &table()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_ignores_string_ids() {
        let xml = r#"<UAVariable NodeId="ns=1;s=Temperature" DataType="i=11"/>"#;
        let refs = scan_refs(xml, &table()).unwrap();
        assert_eq!(refs, HashSet::from([NodeId::base(11)]));
    }

    #[test]
    fn test_scan_adjacent_tokens() {
        let xml = r#"<X a="i=1">i=2</X><Y b="ns=2;i=3"/>"#;
        let refs = scan_refs(xml, &table()).unwrap();
        assert_eq!(
            refs,
            HashSet::from([NodeId::base(1), NodeId::base(2), NodeId::new("urn:dep", 3)])
        );
    }

    #[test]
    fn test_scan_deduplicates() {
        let xml = r#"<A x="i=7"/><B y="i=7">i=7</B>"#;
        assert_eq!(scan_refs(xml, &table()).unwrap().len(), 1);
    }

    #[test]
    fn test_scan_undeclared_index_fails() {
        let xml = r#"<A NodeId="ns=9;i=1"/>"#;
        let err = scan_refs(xml, &table()).unwrap_err();
        assert!(matches!(err, NaylistError::MalformedIdentifier { .. }));
    }

    #[test]
    fn test_scan_into_accumulates() {
        let mut refs = HashSet::from([NodeId::base(1)]);
        scan_refs_into(r#"<A x="i=2"/>"#, &table(), &mut refs).unwrap();
        assert_eq!(refs.len(), 2);
    }
}
