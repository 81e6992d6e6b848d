//! Output formatting - plaintext and JSON.

use std::collections::HashSet;
use std::io::Write;

use serde_json::json;

use crate::builder::AnalysisResult;
use crate::node_id::NodeId;

/// Sorts node id strings numerically-aware, so `i=2` comes before `i=10`.
pub fn natural_sort(items: &mut [String]) {
    items.sort_by(|a, b| natord::compare(a, b));
}

/// Nodes in `universe` but not in `retained`, rendered canonically and naturally sorted.
pub fn naylist(universe: &HashSet<NodeId>, retained: &HashSet<NodeId>) -> Vec<String> {
    let mut nay: Vec<String> = universe
        .difference(retained)
        .map(NodeId::to_string)
        .collect();
    natural_sort(&mut nay);
    nay
}

/// Writes one node id per line.
pub fn write_plain<W: Write>(out: &mut W, naylisted: &[String]) -> std::io::Result<()> {
    for id in naylisted {
        writeln!(out, "{}", id)?;
    }
    out.flush()
}

/// JSON report: the nay list, set sizes and per-dependency figures.
pub fn to_json(result: &AnalysisResult) -> serde_json::Value {
    json!({
        "naylisted": result.naylisted,
        "stats": {
            "universe": result.universe.len(),
            "retained": result.retained.len(),
            "naylisted": result.naylisted.len(),
        },
        "dependency_order": result.dependency_order,
        "documents": result.documents,
        "global_passes": result.global_passes,
    })
}

/// Writes the JSON report, pretty-printed.
pub fn write_json<W: Write>(out: &mut W, result: &AnalysisResult) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &to_json(result))?;
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_sort() {
        let mut items = vec!["i=10".to_string(), "i=2".to_string(), "i=1".to_string()];
        natural_sort(&mut items);
        assert_eq!(items, vec!["i=1", "i=2", "i=10"]);
    }

    #[test]
    fn test_natural_sort_mixed_namespaces() {
        let mut items = vec![
            "ns=urn:dep;i=300".to_string(),
            "i=11".to_string(),
            "ns=urn:dep;i=20".to_string(),
            "i=9".to_string(),
        ];
        natural_sort(&mut items);
        assert_eq!(items, vec!["i=9", "i=11", "ns=urn:dep;i=20", "ns=urn:dep;i=300"]);
    }

    #[test]
    fn test_naylist_is_set_difference() {
        let universe = HashSet::from([
            NodeId::base(1),
            NodeId::base(10),
            NodeId::base(2),
            NodeId::new("urn:dep", 300),
        ]);
        let retained = HashSet::from([NodeId::base(1)]);
        assert_eq!(
            naylist(&universe, &retained),
            vec!["i=2", "i=10", "ns=urn:dep;i=300"]
        );
    }

    #[test]
    fn test_naylist_empty_when_all_retained() {
        let universe = HashSet::from([NodeId::base(1)]);
        assert!(naylist(&universe, &universe.clone()).is_empty());
    }

    #[test]
    fn test_write_plain() {
        let mut out = Vec::new();
        write_plain(&mut out, &["i=1".to_string(), "i=2".to_string()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "i=1\ni=2\n");
    }

    #[test]
    fn test_json_report() {
        let result = AnalysisResult {
            universe: HashSet::from([NodeId::base(1), NodeId::base(2)]),
            retained: HashSet::from([NodeId::base(1)]),
            naylisted: vec!["i=2".to_string()],
            dependency_order: vec![String::new()],
            ..Default::default()
        };
        let value = to_json(&result);
        assert_eq!(value["naylisted"][0], "i=2");
        assert_eq!(value["stats"]["universe"].as_u64(), Some(2));
        assert_eq!(value["stats"]["retained"].as_u64(), Some(1));
        assert_eq!(value["stats"]["naylisted"].as_u64(), Some(1));
        assert_eq!(value["dependency_order"][0], "");
        assert!(value["documents"].as_array().unwrap().is_empty());

        let mut out = Vec::new();
        write_json(&mut out, &result).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, value);
    }
}
