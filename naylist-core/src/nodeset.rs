//! Nodeset document loading.
//!
//! Loading happens in three steps:
//! 1. aliases declared under `Aliases/Alias` are substituted textually, so
//!    everything downstream only ever sees `ns=N;i=M` / `i=M` tokens;
//! 2. the substituted text is parsed and the `NamespaceUris` table is read;
//! 3. the tree is indexed once (node id → byte range of the defining element,
//!    `ReferenceType` values, `UADataType` elements) and then dropped.
//!
//! The index holds byte ranges into the substituted text, so a definition's
//! subtree is recovered as the exact slice of source that produced it.

use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use roxmltree::{Document, Node};
use tracing::{debug, warn};

use crate::error::{IoResultExt, NaylistError, NaylistResult};
use crate::node_id::{NamespaceTable, NodeId};

/// A parsed, alias-resolved and indexed nodeset document.
#[derive(Debug, Clone)]
pub struct NodeSet {
    origin: PathBuf,
    contents: String,
    namespaces: NamespaceTable,
    definitions: HashMap<NodeId, Vec<Range<usize>>>,
    reference_types: Vec<String>,
    data_types: Vec<Range<usize>>,
}

impl NodeSet {
    /// Reads and parses the nodeset at `path`.
    pub fn load(path: impl AsRef<Path>) -> NaylistResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).or_missing_input(path)?;
        Self::parse(path, &content)
    }

    /// Parses nodeset `content`; `origin` is only used in diagnostics.
    pub fn parse(origin: impl Into<PathBuf>, content: &str) -> NaylistResult<Self> {
        let origin = origin.into();
        let contents = resolve_aliases(&origin, content)?;
        let index = DocumentIndex::build(&origin, &contents)?;

        Ok(Self {
            origin,
            contents,
            namespaces: index.namespaces,
            definitions: index.definitions,
            reference_types: index.reference_types,
            data_types: index.data_types,
        })
    }

    /// Display label for narration and errors.
    pub fn label(&self) -> String {
        self.origin.display().to_string()
    }

    /// Alias-substituted document text.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Text of every element whose `NodeId` is `id`.
    pub fn definition_texts<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a str> + 'a {
        self.definitions
            .get(id)
            .into_iter()
            .flatten()
            .map(|range| &self.contents[range.clone()])
    }

    pub fn defines(&self, id: &NodeId) -> bool {
        self.definitions.contains_key(id)
    }

    /// Number of distinct numeric node ids defined by this document.
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Raw `ReferenceType` attribute values, in document order.
    pub fn reference_types(&self) -> &[String] {
        &self.reference_types
    }

    /// Text of every `UADataType` element.
    pub fn data_type_texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.data_types.iter().map(|range| &self.contents[range.clone()])
    }
}

/// Everything a nodeset needs from its tree, owned so the tree can be dropped.
struct DocumentIndex {
    namespaces: NamespaceTable,
    definitions: HashMap<NodeId, Vec<Range<usize>>>,
    reference_types: Vec<String>,
    data_types: Vec<Range<usize>>,
}

impl DocumentIndex {
    fn build(origin: &Path, contents: &str) -> NaylistResult<Self> {
        let doc = parse_xml(origin, contents)?;
        let root = doc.root_element();
        let namespaces = namespace_table(root);

        let mut definitions: HashMap<NodeId, Vec<Range<usize>>> = HashMap::new();
        let mut reference_types = Vec::new();
        let mut data_types = Vec::new();

        for node in root.descendants().skip(1).filter(Node::is_element) {
            if let Some(raw) = node.attribute("NodeId") {
                if NodeId::is_numeric(raw) {
                    let id = NodeId::parse(raw, &namespaces)?;
                    definitions.entry(id).or_default().push(node.range());
                } else {
                    debug!(file = %origin.display(), node_id = raw, "Skipping non-numeric node id");
                }
            }
            if let Some(reference_type) = node.attribute("ReferenceType") {
                reference_types.push(reference_type.to_string());
            }
            if node.tag_name().name() == "UADataType" {
                data_types.push(node.range());
            }
        }

        Ok(Self {
            namespaces,
            definitions,
            reference_types,
            data_types,
        })
    }
}

fn parse_xml<'a>(origin: &Path, content: &'a str) -> NaylistResult<Document<'a>> {
    Document::parse(content).map_err(|e| {
        let pos = e.pos();
        NaylistError::parse_at(origin, e.to_string(), pos.row, pos.col)
    })
}

/// Element children of `parent` with the given local name.
///
/// Matching ignores the XML namespace, so documents with and without the
/// UANodeSet xmlns are handled alike.
fn children_named<'a, 'input>(
    parent: Node<'a, 'input>,
    local_name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent
        .children()
        .filter(move |n| n.is_element() && n.tag_name().name() == local_name)
}

fn namespace_table(root: Node<'_, '_>) -> NamespaceTable {
    let uris = children_named(root, "NamespaceUris")
        .flat_map(|uris| children_named(uris, "Uri"))
        .map(|uri| uri.text().unwrap_or_default().trim().to_string());
    NamespaceTable::new(uris)
}

/// Alias name → token pairs declared in the document header.
pub fn parse_aliases(origin: &Path, content: &str) -> NaylistResult<Vec<(String, String)>> {
    let doc = parse_xml(origin, content)?;
    let mut aliases = Vec::new();

    for alias in children_named(doc.root_element(), "Aliases").flat_map(|a| children_named(a, "Alias")) {
        let Some(name) = alias.attribute("Alias") else {
            warn!(file = %origin.display(), "Alias element without an Alias attribute");
            continue;
        };
        match alias.text().map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => aliases.push((name.to_string(), token.to_string())),
            None => warn!(file = %origin.display(), alias = name, "Alias without a target node id"),
        }
    }

    Ok(aliases)
}

/// Replaces every delimiter-bounded occurrence of an alias name with its token.
///
/// A name is only replaced when it is the whole attribute value or text node
/// (`>`/`"` on the left, `<`/`"` on the right); the delimiters are kept.
pub fn substitute_aliases(content: &str, aliases: &[(String, String)]) -> String {
    if aliases.is_empty() {
        return content.to_string();
    }

    // The first declaration of a name wins.
    let mut lookup: HashMap<&str, &str> = HashMap::with_capacity(aliases.len());
    for (name, token) in aliases {
        lookup.entry(name.as_str()).or_insert(token.as_str());
    }
    let names = aliases
        .iter()
        .map(|(name, _)| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");

    // Escaped literals joined by `|` always form a valid pattern.
    let pattern = Regex::new(&format!(r#"(?P<open>[>"])(?P<name>{names})(?P<close>[<"])"#))
        .expect("Escaped alias alternation is valid");

    pattern
        .replace_all(content, |caps: &Captures| {
            let name = &caps["name"];
            let token = lookup.get(name).copied().unwrap_or(name);
            format!("{}{}{}", &caps["open"], token, &caps["close"])
        })
        .into_owned()
}

/// Parses the aliases of `content` and substitutes them.
pub fn resolve_aliases(origin: &Path, content: &str) -> NaylistResult<String> {
    let aliases = parse_aliases(origin, content)?;
    debug!(file = %origin.display(), aliases = aliases.len(), "Resolving aliases");
    Ok(substitute_aliases(content, &aliases))
}
