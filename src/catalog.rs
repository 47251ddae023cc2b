//! Gate catalog: the static geometry of every gate type
//!
//! The layout core only needs to know how many rows a gate spans, whether it
//! can be expanded, and how its sub-components are arranged when it is.
//! Catalogs are loaded from TOML; a built-in default covers the common gates.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or validating a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse catalog TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("duplicate gate definition: {0}")]
    Duplicate(String),
    #[error("gate '{gate}' is invalid: {reason}")]
    InvalidDefinition { gate: String, reason: String },
}

/// Lookup of gate definitions by type id
///
/// Implementations must answer consistently for the whole session.
pub trait Catalog {
    fn definition_of(&self, gate_type: &str) -> Option<&GateDefinition>;

    /// Known gate type ids, used for suggestions
    fn gate_types(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// One piece of an expandable gate's inspected view
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubComponent {
    /// Gate type drawn for this piece
    pub gate: String,
    /// Column relative to the other components
    pub x: i32,
    /// Row relative to the other components
    pub y: i32,
    #[serde(rename = "w", default = "one")]
    pub width: u32,
    #[serde(rename = "h", default = "one")]
    pub height: u32,
}

impl SubComponent {
    pub fn new(gate: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            gate: gate.into(),
            x,
            y,
            width: 1,
            height: 1,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

fn one() -> u32 {
    1
}

/// Static description of a gate type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GateDefinition {
    pub id: String,
    /// Rows spanned by the gate
    #[serde(default = "one")]
    pub height: u32,
    #[serde(default)]
    pub expandable: bool,
    /// Inspected-view layout, meaningful only for expandable gates
    #[serde(default)]
    pub components: Vec<SubComponent>,
}

impl GateDefinition {
    /// A plain, non-expandable gate
    pub fn new(id: impl Into<String>, height: u32) -> Self {
        Self {
            id: id.into(),
            height,
            expandable: false,
            components: Vec::new(),
        }
    }

    /// Turn this into an expandable gate with the given inspected view
    pub fn with_components(mut self, components: Vec<SubComponent>) -> Self {
        self.expandable = true;
        self.components = components;
        self
    }

    /// Smallest relative offset across the components, `(0, 0)` when empty
    pub fn component_origin(&self) -> (i32, i32) {
        let min_x = self.components.iter().map(|c| c.x).min().unwrap_or(0);
        let min_y = self.components.iter().map(|c| c.y).min().unwrap_or(0);
        (min_x, min_y)
    }

    /// Columns covered by the inspected view
    ///
    /// Horizontal span of the component offsets; 1 for gates that cannot
    /// expand or have nothing to show.
    pub fn expanded_width(&self) -> u32 {
        if !self.expandable {
            return 1;
        }
        span(self.components.iter().map(|c| c.x))
    }

    /// `(width, height)` of the inspected view, as a renderer would draw it
    pub fn expanded_extent(&self) -> (u32, u32) {
        if !self.expandable || self.components.is_empty() {
            return (1, self.height);
        }
        (
            self.expanded_width(),
            span(self.components.iter().map(|c| c.y)),
        )
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.height == 0 {
            return Err(CatalogError::InvalidDefinition {
                gate: self.id.clone(),
                reason: "height must be at least 1".to_string(),
            });
        }
        if let Some(c) = self.components.iter().find(|c| c.width == 0 || c.height == 0) {
            return Err(CatalogError::InvalidDefinition {
                gate: self.id.clone(),
                reason: format!("component '{}' has an empty size", c.gate),
            });
        }
        let too_wide = exact_span(self.components.iter().map(|c| c.x)) > MAX_SPAN;
        let too_tall = exact_span(self.components.iter().map(|c| c.y)) > MAX_SPAN;
        if too_wide || too_tall {
            return Err(CatalogError::InvalidDefinition {
                gate: self.id.clone(),
                reason: format!("component offsets span more than {MAX_SPAN} cells"),
            });
        }
        Ok(())
    }
}

/// Largest horizontal or vertical span a definition may have
const MAX_SPAN: i64 = u32::MAX as i64;

/// Number of cells between the smallest and largest offset, inclusive
fn exact_span(offsets: impl Iterator<Item = i32>) -> i64 {
    let (min, max) = offsets.fold((i64::MAX, i64::MIN), |(lo, hi), v| {
        (lo.min(v.into()), hi.max(v.into()))
    });
    if min > max {
        return 1;
    }
    max - min + 1
}

/// Like [`exact_span`], clamped to `u32` for definitions built by hand
fn span(offsets: impl Iterator<Item = i32>) -> u32 {
    u32::try_from(exact_span(offsets)).unwrap_or(u32::MAX)
}

/// Catalog backed by an in-memory table
#[derive(Debug, Clone, Default)]
pub struct GateCatalog {
    definitions: HashMap<String, GateDefinition>,
}

/// TOML structure for deserializing catalogs
#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default, rename = "gate")]
    gates: Vec<GateDefinition>,
}

/// Built-in catalog: standard gates plus a few composite gates
const DEFAULT_CATALOG: &str = r#"
# Single-qubit gates
[[gate]]
id = "H"

[[gate]]
id = "X"

[[gate]]
id = "Y"

[[gate]]
id = "Z"

[[gate]]
id = "S"

[[gate]]
id = "T"

[[gate]]
id = "MEASURE"

# Multi-qubit gates
[[gate]]
id = "CNOT"
height = 2

[[gate]]
id = "CZ"
height = 2

[[gate]]
id = "SWAP"
height = 2

[[gate]]
id = "TOFFOLI"
height = 3

# Composite gates
[[gate]]
id = "BELL"
height = 2
expandable = true
components = [
    { gate = "H", x = 0, y = 0 },
    { gate = "CNOT", x = 1, y = 0, h = 2 },
]

[[gate]]
id = "GHZ"
height = 3
expandable = true
components = [
    { gate = "H", x = 0, y = 0 },
    { gate = "CNOT", x = 1, y = 0, h = 2 },
    { gate = "CNOT", x = 2, y = 1, h = 2 },
]

[[gate]]
id = "QFT2"
height = 2
expandable = true
components = [
    { gate = "H", x = 0, y = 0 },
    { gate = "CZ", x = 1, y = 0, h = 2 },
    { gate = "H", x = 2, y = 1 },
    { gate = "SWAP", x = 3, y = 0, h = 2 },
]
"#;

impl GateCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog from TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load catalog from TOML string
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlCatalog = toml::from_str(content)?;
        let mut catalog = Self::new();
        for definition in parsed.gates {
            catalog.insert(definition)?;
        }
        Ok(catalog)
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        Self::from_str(DEFAULT_CATALOG).expect("Built-in catalog should be valid TOML")
    }

    /// Add a definition, rejecting duplicates and invalid geometry
    pub fn insert(&mut self, definition: GateDefinition) -> Result<(), CatalogError> {
        definition.validate()?;
        if self.definitions.contains_key(&definition.id) {
            return Err(CatalogError::Duplicate(definition.id));
        }
        self.definitions.insert(definition.id.clone(), definition);
        Ok(())
    }

    /// Builder form of [`GateCatalog::insert`]
    pub fn with_definition(mut self, definition: GateDefinition) -> Result<Self, CatalogError> {
        self.insert(definition)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Catalog for GateCatalog {
    fn definition_of(&self, gate_type: &str) -> Option<&GateDefinition> {
        self.definitions.get(gate_type)
    }

    fn gate_types(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.definitions.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (m, n) = (a_chars.len(), b_chars.len());
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];
    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Gate types close to `target`, nearest first, at most three
///
/// Matching ignores case so `cnot` suggests `CNOT`.
pub fn find_similar<'a>(known: &[&'a str], target: &str, max_distance: usize) -> Vec<&'a str> {
    let target = target.to_uppercase();
    let mut candidates: Vec<(&str, usize)> = known
        .iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(&name.to_uppercase(), &target);
            (dist <= max_distance).then_some((*name, dist))
        })
        .collect();
    candidates.sort_by_key(|(_, d)| *d);
    candidates.into_iter().map(|(name, _)| name).take(3).collect()
}
