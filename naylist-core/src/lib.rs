//! naylist-core: reachability analysis for OPC UA NodeSet2 documents.
//!
//! Given the application's own nodesets (roots) and the nodesets they depend
//! on, computes which node ids the dependencies define or mention that no
//! root needs, directly or transitively. That "nay list" lets a server strip
//! unused nodes from a deployed information model.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use naylist_core::prelude::*;
//!
//! let result = Naylist::new(["AbsorbanceReader.xml"])
//!     .dependencies(["Opc.Ua.NodeSet2.xml", "Opc.Ua.Di.NodeSet2.xml"])
//!     .analyze()?;
//!
//! for id in &result.naylisted {
//!     println!("{}", id);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`node_id`]: Namespace-aware node ids and namespace tables
//! - [`nodeset`]: Document loading, alias resolution and definition index
//! - [`scan`]: Delimiter-bounded node id extraction from text
//! - [`order`]: Dependency ordering by introduced namespace
//! - [`closure`]: Reference expansion, per-document fixpoint, retention policies
//! - [`report`]: Natural sorting, plain and JSON output
//! - [`builder`]: Fluent builder API driving a whole analysis
//! - [`config`]: `naylist.toml` loading
//! - [`error`]: Typed error handling

pub mod builder;
pub mod closure;
pub mod config;
pub mod error;
pub mod logging;
pub mod node_id;
pub mod nodeset;
pub mod order;
pub mod prelude;
pub mod report;
pub mod scan;

// Error types
pub use error::{IoResultExt, NaylistError, NaylistResult};

// Builder API
pub use builder::{analyze_nodesets, AnalysisOptions, AnalysisResult, DocumentStats, Naylist};

// Identifiers and documents
pub use node_id::{namespace_display, NamespaceTable, NodeId, BASE_NAMESPACE_URI};
pub use nodeset::{parse_aliases, resolve_aliases, substitute_aliases, NodeSet};

// Analysis
pub use closure::{all_refs, close, data_types, expand, reference_types, ClosureStats, RetentionPolicy};
pub use order::{order_dependencies, DependencyOrder, OrderedNodeSet};
pub use scan::{scan_refs, scan_refs_into};

// Configuration
pub use config::{find_config, load_config, NaylistConfig, OutputConfig, CONFIG_FILE};

// Logging
pub use logging::{init_logging, LogOptions};

// Reporting
pub use report::{natural_sort, naylist, to_json, write_json, write_plain};
