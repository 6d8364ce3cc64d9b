//! Closed-world encoding of branch and material identifiers.

use std::collections::{BTreeMap, HashSet};

use crate::error::{CategoryKind, ForecastError, Result};

/// Branch codes used when none are configured.
pub const DEFAULT_BRANCHES: [&str; 5] = ["GC01", "GC02", "GC03", "GC04", "GC05"];

/// Material codes used when none are configured.
pub const DEFAULT_MATERIALS: [&str; 5] = ["SKU_A", "SKU_B", "SKU_C", "SKU_D", "SKU_E"];

/// Validated lookup tables from identifier to integer code.
///
/// Unknown identifiers are an error; there is no fallback code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMapping {
    branches: BTreeMap<String, u32>,
    materials: BTreeMap<String, u32>,
}

impl CategoryMapping {
    /// Build a mapping, rejecting empty identifiers and codes shared by two
    /// identifiers of the same kind.
    pub fn new<B, M>(branches: B, materials: M) -> Result<Self>
    where
        B: IntoIterator<Item = (String, u32)>,
        M: IntoIterator<Item = (String, u32)>,
    {
        Ok(Self {
            branches: build_table(CategoryKind::Branch, branches)?,
            materials: build_table(CategoryKind::Material, materials)?,
        })
    }

    /// Code for a branch identifier.
    pub fn encode_branch(&self, branch: &str) -> Result<u32> {
        lookup(&self.branches, CategoryKind::Branch, branch)
    }

    /// Code for a material identifier.
    pub fn encode_material(&self, material: &str) -> Result<u32> {
        lookup(&self.materials, CategoryKind::Material, material)
    }

    /// Codes for a (branch, material) pair.
    pub fn encode(&self, branch: &str, material: &str) -> Result<(u32, u32)> {
        Ok((self.encode_branch(branch)?, self.encode_material(material)?))
    }

    /// Known branch identifiers, ordered by code.
    pub fn branches(&self) -> Vec<&str> {
        ordered_by_code(&self.branches)
    }

    /// Known material identifiers, ordered by code.
    pub fn materials(&self) -> Vec<&str> {
        ordered_by_code(&self.materials)
    }
}

impl Default for CategoryMapping {
    fn default() -> Self {
        let enumerate = |ids: &[&str]| -> BTreeMap<String, u32> {
            ids.iter()
                .enumerate()
                .map(|(code, id)| (id.to_string(), code as u32))
                .collect()
        };
        Self {
            branches: enumerate(&DEFAULT_BRANCHES[..]),
            materials: enumerate(&DEFAULT_MATERIALS[..]),
        }
    }
}

fn build_table<I>(kind: CategoryKind, entries: I) -> Result<BTreeMap<String, u32>>
where
    I: IntoIterator<Item = (String, u32)>,
{
    let mut table = BTreeMap::new();
    let mut codes = HashSet::new();
    for (id, code) in entries {
        if id.trim().is_empty() {
            return Err(ForecastError::Config(format!("empty {kind} identifier")));
        }
        if !codes.insert(code) {
            return Err(ForecastError::Config(format!(
                "{kind} code {code} assigned more than once"
            )));
        }
        if table.insert(id.clone(), code).is_some() {
            return Err(ForecastError::Config(format!(
                "duplicate {kind} identifier: {id}"
            )));
        }
    }
    if table.is_empty() {
        return Err(ForecastError::Config(format!("no {kind} codes configured")));
    }
    Ok(table)
}

fn lookup(table: &BTreeMap<String, u32>, kind: CategoryKind, id: &str) -> Result<u32> {
    table
        .get(id)
        .copied()
        .ok_or_else(|| ForecastError::UnknownCategory {
            kind,
            identifier: id.to_string(),
        })
}

fn ordered_by_code(table: &BTreeMap<String, u32>) -> Vec<&str> {
    let mut ids: Vec<(&str, u32)> = table.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ids.sort_by_key(|&(_, code)| code);
    ids.into_iter().map(|(id, _)| id).collect()
}
