//! Dependency ordering of nodesets by the namespace each one introduces.
//!
//! Every dependency nodeset lists its own namespace plus every namespace it
//! depends on. A nodeset can be placed as soon as exactly one of its
//! namespaces is still unknown: that one is the namespace it introduces.
//! Nothing is known at the start when the base nodeset itself is among the
//! dependencies; otherwise the base namespace counts as known from the start. The result runs from the foundational nodeset (namespace
//! zero) to the most dependent one; the closure engine consumes it in reverse.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{NaylistError, NaylistResult};
use crate::node_id::namespace_display;
use crate::nodeset::NodeSet;

/// A nodeset's position in the dependency order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedNodeSet {
    /// Index into the slice given to [`order_dependencies`]
    pub index: usize,
    /// Namespace URI this nodeset introduces
    pub namespace: String,
}

/// Linear order of dependency nodesets, least dependent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyOrder {
    entries: Vec<OrderedNodeSet>,
}

impl DependencyOrder {
    /// Least dependent first.
    pub fn entries(&self) -> &[OrderedNodeSet] {
        &self.entries
    }

    /// Most dependent first, foundational last: the order the closure engine
    /// scans in, so the large base nodeset is scanned when the most
    /// references into it are already known.
    pub fn processing_order(&self) -> impl Iterator<Item = &OrderedNodeSet> {
        self.entries.iter().rev()
    }

    /// Introduced namespaces, in processing order.
    pub fn namespaces(&self) -> Vec<String> {
        self.processing_order().map(|e| e.namespace.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Orders `nodesets` so that each introduces exactly one new namespace.
///
/// Fails with [`NaylistError::AmbiguousDependencyOrder`] when a full pass
/// places nothing: a dependency cycle, a missing dependency nodeset, a
/// nodeset introducing several namespaces at once, or one introducing none.
pub fn order_dependencies(nodesets: &[NodeSet]) -> NaylistResult<DependencyOrder> {
    let mut known: Vec<String> = Vec::with_capacity(nodesets.len() + 1);
    if !nodesets.iter().any(is_base_nodeset) {
        debug!("No base nodeset among the dependencies, treating the base namespace as known");
        known.push(String::new());
    }
    let mut placed = vec![false; nodesets.len()];
    let mut order = DependencyOrder::default();

    while order.len() < nodesets.len() {
        let mut progressed = false;

        for (index, nodeset) in nodesets.iter().enumerate() {
            if placed[index] {
                continue;
            }
            let mut unknown = unknown_namespaces(nodeset, &known);
            if unknown.len() == 1 {
                let namespace = unknown.remove(0);
                debug!(
                    file = %nodeset.label(),
                    namespace = namespace_display(&namespace),
                    "Ordered dependency"
                );
                known.push(namespace.clone());
                placed[index] = true;
                order.entries.push(OrderedNodeSet { index, namespace });
                progressed = true;
            }
        }

        if !progressed {
            return Err(stuck(nodesets, &placed, &known));
        }
    }

    Ok(order)
}

/// Whether `nodeset` declares nothing beyond the base namespace.
fn is_base_nodeset(nodeset: &NodeSet) -> bool {
    nodeset.namespaces().iter().all(|uri| uri.is_empty())
}

/// Distinct namespaces of `nodeset` not yet in `known`, in table order.
fn unknown_namespaces(nodeset: &NodeSet, known: &[String]) -> Vec<String> {
    let mut unknown: Vec<String> = Vec::new();
    for uri in nodeset.namespaces().iter() {
        if !known.iter().any(|k| k == uri) && !unknown.iter().any(|u| u == uri) {
            unknown.push(uri.to_string());
        }
    }
    unknown
}

fn stuck(nodesets: &[NodeSet], placed: &[bool], known: &[String]) -> NaylistError {
    let mut unresolved = BTreeSet::new();
    let mut documents = Vec::new();

    for (nodeset, _) in nodesets.iter().zip(placed).filter(|(_, placed)| !**placed) {
        documents.push(nodeset.label());
        unresolved.extend(
            unknown_namespaces(nodeset, known)
                .iter()
                .map(|ns| namespace_display(ns).to_string()),
        );
    }

    NaylistError::AmbiguousDependencyOrder {
        unresolved: unresolved.into_iter().collect(),
        documents,
    }
}
