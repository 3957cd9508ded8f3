//! Mutation pass applying the bump rules across a whole document.

use crate::EngineError;
use crate::document::PropertyDocument;
use crate::value::{bump_general_value, bump_yarn_value};
use log::{debug, info};

/// Property names eligible in YARN-only mode, matched exactly.
const YARN_PROPERTIES: &[&str] = &[
    "yarn.app.mapreduce.am.command-opts",
    "yarn.app.mapreduce.am.resource.mb",
];
/// Name fragments eligible in general MapReduce mode, matched by substring to
/// catch prefixed and suffixed variants.
const MAPREDUCE_PROPERTIES: &[&str] = &[
    "mapreduce.map.memory.mb",
    "mapreduce.map.java.opts",
    "mapreduce.reduce.memory.mb",
    "mapreduce.reduce.java.opts",
];
/// Exact name whose placeholder value is replaced by a heap flag with
/// headroom instead of a bare megabyte count.
const REDUCE_MEMORY_PROPERTY: &str = "mapreduce.reduce.memory.mb";

/// Which family of properties a mutation pass may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    /// Only the YARN application-master properties, matched exactly.
    YarnOnly,
    /// The MapReduce task memory and java-opt properties, matched by
    /// substring.
    GeneralMapReduce,
}

/// What a mutation pass did with one eligible property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueOutcome {
    /// The value was rewritten.
    Updated(String),
    /// A rule matched but the computed value equals the original.
    Unchanged,
    /// No rewrite rule recognizes the value format; it was left as-is.
    Unrecognized,
}

/// Record of one eligible property visited by a mutation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyOutcome {
    /// Property name as found in the document.
    pub name: String,
    /// Value before the pass.
    pub previous: String,
    /// What the pass did with it.
    pub outcome: ValueOutcome,
}

/// Result of one mutation pass over one document.
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// Namespace prefix detected from the root element.
    pub namespace: String,
    /// Outcomes for eligible properties, in document order.
    pub outcomes: Vec<PropertyOutcome>,
    /// Number of values actually rewritten.
    pub modified: usize,
    /// Serialized document, present only when at least one value changed.
    pub document: Option<Vec<u8>>,
}

impl MutationResult {
    /// True when the pass rewrote at least one value.
    pub fn changed(&self) -> bool {
        self.modified > 0
    }
}

/// Apply the bump rules for `mode` to every eligible property in `bytes`.
///
/// Properties missing a name or value are skipped silently. The document is
/// serialized back only when at least one value changed; callers keep their
/// original bytes otherwise. Parse failures abort before any edit.
pub fn mutate(
    bytes: &[u8],
    delta_mb: i64,
    mode: TransformMode,
) -> Result<MutationResult, EngineError> {
    let mut doc = PropertyDocument::parse(bytes)?;
    debug!(
        "walking {} properties (namespace prefix '{}')",
        doc.len(),
        doc.namespace_prefix()
    );

    let mut planned: Vec<(usize, String)> = Vec::new();
    let mut outcomes = Vec::new();

    for (index, property) in doc.properties().enumerate() {
        let (Some(name), Some(value)) = (property.name, property.value) else {
            continue;
        };

        let bumped = match mode {
            TransformMode::YarnOnly => {
                if !YARN_PROPERTIES.contains(&name) {
                    continue;
                }
                bump_yarn_value(value, delta_mb)
            }
            TransformMode::GeneralMapReduce => {
                if !MAPREDUCE_PROPERTIES.iter().any(|key| name.contains(key)) {
                    continue;
                }
                bump_general_value(value, delta_mb, name == REDUCE_MEMORY_PROPERTY)
            }
        };

        let outcome = match bumped {
            Some(next) if next != value => {
                debug!("rewriting '{name}': '{value}' -> '{next}'");
                planned.push((index, next.clone()));
                ValueOutcome::Updated(next)
            }
            Some(_) => ValueOutcome::Unchanged,
            None => ValueOutcome::Unrecognized,
        };
        outcomes.push(PropertyOutcome {
            name: name.to_string(),
            previous: value.to_string(),
            outcome,
        });
    }

    for (index, next) in &planned {
        doc.set_value(*index, next);
    }

    let modified = planned.len();
    let document = if modified > 0 {
        Some(doc.to_bytes()?)
    } else {
        None
    };
    info!(
        "mutation pass rewrote {modified} of {} eligible properties",
        outcomes.len()
    );

    Ok(MutationResult {
        namespace: doc.namespace_prefix().to_string(),
        outcomes,
        modified,
        document,
    })
}
