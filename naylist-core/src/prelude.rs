//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use naylist_core::prelude::*;
//! ```

// Errors
pub use crate::error::{NaylistError, NaylistResult};

// Documents and identifiers
pub use crate::node_id::{NamespaceTable, NodeId};
pub use crate::nodeset::NodeSet;

// Closure engine
pub use crate::closure::{all_refs, close, expand, RetentionPolicy};
pub use crate::order::{order_dependencies, DependencyOrder};

// Builder API
pub use crate::builder::{analyze_nodesets, AnalysisOptions, AnalysisResult, Naylist};

// Reporting
pub use crate::report::{naylist, write_json, write_plain};

// Configuration
pub use crate::config::{find_config, load_config, NaylistConfig};
