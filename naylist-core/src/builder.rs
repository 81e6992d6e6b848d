//! Builder pattern API for naylist analysis.
//!
//! Provides a fluent interface for configuring and running an analysis:
//!
//! ```rust,ignore
//! use naylist_core::prelude::*;
//!
//! let result = Naylist::new(["AbsorbanceReader.xml"])
//!     .dependencies(["Opc.Ua.NodeSet2.xml", "Opc.Ua.Di.NodeSet2.xml"])
//!     .retain_reference_types(true)
//!     .analyze()?;
//!
//! for id in &result.naylisted {
//!     println!("{}", id);
//! }
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::closure::{all_refs, close, RetentionPolicy};
use crate::error::NaylistResult;
use crate::node_id::{namespace_display, NodeId};
use crate::nodeset::NodeSet;
use crate::order::order_dependencies;
use crate::report::naylist;

/// Options that change what counts as retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Unconditional retention of reference types and data types
    pub retention: RetentionPolicy,
    /// Repeat the dependency pass until the retained set stops growing
    pub global_fixpoint: bool,
}

/// Builder for configuring a naylist analysis.
#[derive(Debug, Clone)]
pub struct Naylist {
    /// Application nodesets, retained completely
    roots: Vec<PathBuf>,

    /// Dependency nodesets, in any order
    dependencies: Vec<PathBuf>,

    options: AnalysisOptions,
}

impl Naylist {
    /// Create a new analysis for the given application nodesets.
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            dependencies: Vec::new(),
            options: AnalysisOptions::default(),
        }
    }

    /// Add dependency nodesets.
    pub fn dependencies(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.dependencies.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Never naylist reference types a dependency uses.
    pub fn retain_reference_types(mut self, enabled: bool) -> Self {
        self.options.retention.reference_types = enabled;
        self
    }

    /// Never naylist anything data type definitions mention.
    pub fn retain_data_types(mut self, enabled: bool) -> Self {
        self.options.retention.data_types = enabled;
        self
    }

    /// Follow references discovered late into already-processed dependencies.
    pub fn global_fixpoint(mut self, enabled: bool) -> Self {
        self.options.global_fixpoint = enabled;
        self
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    /// Load every nodeset and run the analysis.
    pub fn analyze(&self) -> NaylistResult<AnalysisResult> {
        let mut roots = Vec::with_capacity(self.roots.len());
        for path in &self.roots {
            info!("Parsing application nodeset {}", path.display());
            roots.push(NodeSet::load(path)?);
        }

        let mut dependencies = Vec::with_capacity(self.dependencies.len());
        for path in &self.dependencies {
            info!("Loading dependency nodeset {}", path.display());
            dependencies.push(NodeSet::load(path)?);
        }

        analyze_nodesets(&roots, &dependencies, self.options)
    }
}

/// Per-dependency figures, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub file: String,
    /// Namespace the nodeset introduces
    pub namespace: String,
    /// Numeric node ids the nodeset defines
    pub definitions: usize,
    /// Distinct node ids the nodeset mentions
    pub references: usize,
    pub retained_reference_types: usize,
    pub retained_data_types: usize,
    /// Ids added by the transitive closure over this nodeset
    pub transitive: usize,
}

/// Result of running a naylist analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// Every node id mentioned by any nodeset
    pub universe: HashSet<NodeId>,
    /// Node ids proven necessary
    pub retained: HashSet<NodeId>,
    /// `universe - retained`, canonical and naturally sorted
    pub naylisted: Vec<String>,
    /// Introduced namespaces, in processing order
    pub dependency_order: Vec<String>,
    pub documents: Vec<DocumentStats>,
    /// Extra dependency passes run by the global fixpoint
    pub global_passes: usize,
}

impl AnalysisResult {
    pub fn has_naylisted(&self) -> bool {
        !self.naylisted.is_empty()
    }

    /// Percentage of the universe that is naylisted.
    pub fn naylisted_percentage(&self) -> f64 {
        if self.universe.is_empty() {
            0.0
        } else {
            (self.naylisted.len() as f64 / self.universe.len() as f64) * 100.0
        }
    }
}

/// Runs the analysis over already loaded nodesets.
///
/// The retained set is seeded with every id the application nodesets
/// mention. Dependencies are then processed most dependent first; each one
/// adds its ids to the universe, applies the retention policy and is closed
/// on its own. With `global_fixpoint`, the dependency pass is repeated until
/// nothing more is retained.
pub fn analyze_nodesets(
    roots: &[NodeSet],
    dependencies: &[NodeSet],
    options: AnalysisOptions,
) -> NaylistResult<AnalysisResult> {
    let mut retained = HashSet::new();
    for root in roots {
        retained.extend(all_refs(root)?);
    }
    let mut universe = retained.clone();

    info!(
        "The application nodesets contain {} nodes and direct references",
        retained.len()
    );
    if options.retention.reference_types {
        info!("Reference types will not be naylisted");
    }
    if options.retention.data_types {
        info!("Data types will not be naylisted");
    }

    let order = order_dependencies(dependencies)?;
    info!("Adding dependencies");
    for namespace in order.namespaces() {
        info!("\t{}", namespace_display(&namespace));
    }

    let mut documents = Vec::with_capacity(order.len());
    for entry in order.processing_order() {
        let nodeset = &dependencies[entry.index];
        info!("Parsing dependency {}", namespace_display(&entry.namespace));

        let references = all_refs(nodeset)?;
        let reference_count = references.len();
        universe.extend(references);

        let (retained_reference_types, retained_data_types) =
            options.retention.apply(nodeset, &mut retained)?;
        let stats = close(nodeset, &mut retained)?;
        info!(
            "Found {} additional transitively referenced nodes",
            stats.added
        );

        documents.push(DocumentStats {
            file: nodeset.label(),
            namespace: entry.namespace.clone(),
            definitions: nodeset.definition_count(),
            references: reference_count,
            retained_reference_types,
            retained_data_types,
            transitive: stats.added,
        });
    }

    let mut global_passes = 0;
    if options.global_fixpoint {
        loop {
            let before = retained.len();
            for entry in order.processing_order() {
                close(&dependencies[entry.index], &mut retained)?;
            }
            global_passes += 1;
            if retained.len() == before {
                break;
            }
            info!(
                "Global pass {} retained {} more nodes",
                global_passes,
                retained.len() - before
            );
        }
    }

    info!("Yay-listed {} of {} nodes", retained.len(), universe.len());
    let naylisted = naylist(&universe, &retained);
    info!("Nay-listed {} of {} nodes", naylisted.len(), universe.len());

    Ok(AnalysisResult {
        universe,
        retained,
        naylisted,
        dependency_order: order.namespaces(),
        documents,
        global_passes,
    })
}
