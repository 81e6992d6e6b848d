//! Reachability closure over nodesets.
//!
//! The retained set starts with everything the application nodesets mention
//! and grows monotonically: whenever a retained node is defined by the
//! nodeset being processed, every node id embedded in its definition is
//! retained too. A nodeset is closed when a round adds nothing.
//!
//! Performance characteristics:
//! - Definition lookup is a hash-map access into the per-document index
//! - Each definition is scanned at most once per document pass; later rounds
//!   only expand the ids added by the previous round

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::NaylistResult;
use crate::node_id::NodeId;
use crate::nodeset::NodeSet;
use crate::scan::{scan_refs, scan_refs_into};

/// Every node id referenced anywhere in `nodeset`.
pub fn all_refs(nodeset: &NodeSet) -> NaylistResult<HashSet<NodeId>> {
    scan_refs(nodeset.contents(), nodeset.namespaces())
}

/// Node ids embedded in the definitions of `candidates` within `nodeset`.
///
/// Candidates from namespaces the nodeset does not declare are skipped. The
/// result may contain candidates themselves; callers detect growth.
pub fn expand<'a>(
    nodeset: &NodeSet,
    candidates: impl IntoIterator<Item = &'a NodeId>,
) -> NaylistResult<HashSet<NodeId>> {
    let mut found = HashSet::new();
    for candidate in candidates {
        if !nodeset.namespaces().contains(&candidate.namespace) {
            continue;
        }
        for text in nodeset.definition_texts(candidate) {
            scan_refs_into(text, nodeset.namespaces(), &mut found)?;
        }
    }
    Ok(found)
}

/// Outcome of closing one nodeset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosureStats {
    /// Expansion rounds run, including the final one that added nothing
    pub rounds: usize,
    /// Node ids added to the retained set
    pub added: usize,
}

/// Grows `retained` to its fixpoint under [`expand`] within `nodeset`.
pub fn close(nodeset: &NodeSet, retained: &mut HashSet<NodeId>) -> NaylistResult<ClosureStats> {
    let mut stats = ClosureStats::default();
    let mut frontier: Vec<NodeId> = retained.iter().cloned().collect();

    while !frontier.is_empty() {
        stats.rounds += 1;
        let found = expand(nodeset, &frontier)?;
        frontier = found
            .into_iter()
            .filter(|id| retained.insert(id.clone()))
            .collect();

        if !frontier.is_empty() {
            stats.added += frontier.len();
            info!(added = frontier.len(), "Added another {} transitive references", frontier.len());
        }
    }

    debug!(file = %nodeset.label(), rounds = stats.rounds, added = stats.added, "Closed nodeset");
    Ok(stats)
}

/// Every `ReferenceType` used anywhere in `nodeset`.
pub fn reference_types(nodeset: &NodeSet) -> NaylistResult<HashSet<NodeId>> {
    nodeset
        .reference_types()
        .iter()
        .map(|token| NodeId::parse(token, nodeset.namespaces()))
        .collect()
}

/// Every node id embedded in a `UADataType` definition of `nodeset`.
pub fn data_types(nodeset: &NodeSet) -> NaylistResult<HashSet<NodeId>> {
    let mut found = HashSet::new();
    for text in nodeset.data_type_texts() {
        scan_refs_into(text, nodeset.namespaces(), &mut found)?;
    }
    Ok(found)
}

/// Nodes retained unconditionally, regardless of reachability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Keep every reference type a dependency uses
    pub reference_types: bool,
    /// Keep everything data type definitions mention
    pub data_types: bool,
}

impl RetentionPolicy {
    /// Adds the unconditionally retained nodes of `nodeset` to `retained`.
    ///
    /// Returns how many ids each policy contributed (reference types, data types).
    pub fn apply(
        &self,
        nodeset: &NodeSet,
        retained: &mut HashSet<NodeId>,
    ) -> NaylistResult<(usize, usize)> {
        let mut counts = (0, 0);
        if self.reference_types {
            let refs = reference_types(nodeset)?;
            counts.0 = refs.len();
            info!("Added {} reference types", refs.len());
            retained.extend(refs);
        }
        if self.data_types {
            let types = data_types(nodeset)?;
            counts.1 = types.len();
            info!("Added {} data types", types.len());
            retained.extend(types);
        }
        Ok(counts)
    }
}
