//! The static `category -> [group name]` catalog.
//!
//! Loaded from YAML:
//! ```yaml
//! Murgas:
//!   - Agarrate Catalina
//!   - Cayó La Cabra
//! Parodistas:
//!   - Los Muchachos
//! ```
//! Category order and name order are preserved; the matcher relies on them
//! for tie-breaks.

use std::path::Path;

use serde_yml::Value;
use tablado_core::{Diagnostics, GroupRef, normalize};

use crate::error::CatalogError;

/// One known group name with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub category: String,
    /// `normalize(name)`, computed once at load time.
    pub normalized: String,
}

impl CatalogEntry {
    pub fn group_ref(&self) -> GroupRef {
        GroupRef::new(&self.name, &self.category)
    }
}

/// Ordered catalog of group names.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    categories: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(category, names)` pairs, preserving order.
    pub fn from_pairs<C, N, I>(pairs: I) -> Self
    where
        C: Into<String>,
        N: Into<String>,
        I: IntoIterator<Item = (C, Vec<N>)>,
    {
        let mut catalog = Self::new();
        for (category, names) in pairs {
            let category = category.into();
            for name in names {
                catalog.push(&category, name.into());
            }
            if !catalog.categories.contains(&category) {
                catalog.categories.push(category);
            }
        }
        catalog
    }

    fn push(&mut self, category: &str, name: String) {
        let normalized = normalize(&name);
        self.entries.push(CatalogEntry {
            name,
            category: category.to_string(),
            normalized,
        });
    }

    /// Parse a YAML mapping of category to a list of names.
    ///
    /// A category with no list (`Revistas:`) is allowed and contributes no
    /// entries. Names that normalize to nothing are skipped with a warning.
    pub fn from_yaml_str(yaml: &str, diag: &dyn Diagnostics) -> Result<Self, CatalogError> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let doc: Value = serde_yml::from_str(yaml)?;
        let mapping = match &doc {
            Value::Null => return Ok(Self::new()),
            Value::Mapping(m) => m,
            _ => return Err(CatalogError::invalid("top level must be a mapping of categories")),
        };

        let mut catalog = Self::new();
        for (key, value) in mapping {
            let category = key
                .as_str()
                .ok_or_else(|| CatalogError::invalid(format!("category key is not a string: {key:?}")))?
                .to_string();

            let names = match value {
                Value::Null => Vec::new(),
                Value::Sequence(seq) => seq.clone(),
                _ => {
                    return Err(CatalogError::invalid(format!(
                        "category {category:?} must hold a list of names"
                    )));
                }
            };

            for name in names {
                let Some(name) = name.as_str() else {
                    return Err(CatalogError::invalid(format!(
                        "non-string name in category {category:?}: {name:?}"
                    )));
                };
                if normalize(name).is_empty() {
                    diag.warn(format!("Skipping blank catalog name in {category:?}"));
                    continue;
                }
                catalog.push(&category, name.trim().to_string());
            }
            catalog.categories.push(category);
        }
        Ok(catalog)
    }

    /// Load a catalog YAML file.
    pub fn load(path: &Path, diag: &dyn Diagnostics) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&contents, diag)
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
