mod mapping;
mod normalizer;
mod parser;
mod seed;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::workflows::recommendations::domain::{EligibilityRule, Scheme, SchemeId};
use crate::workflows::recommendations::repository::{RepositoryError, SchemeCatalog};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateScheme(String),
    UnknownScheme(String),
    UnknownRuleType { scheme_code: String, label: String },
    InvalidDecimal { field: &'static str, value: String },
    InvalidInteger { field: &'static str, value: String },
    InvalidDate { field: &'static str, value: String },
    InvalidFlag { field: &'static str, value: String },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::DuplicateScheme(code) => {
                write!(f, "scheme code '{}' appears more than once", code)
            }
            CatalogImportError::UnknownScheme(code) => {
                write!(f, "rule references unknown scheme code '{}'", code)
            }
            CatalogImportError::UnknownRuleType { scheme_code, label } => write!(
                f,
                "rule for '{}' uses unsupported rule type '{}'",
                scheme_code, label
            ),
            CatalogImportError::InvalidDecimal { field, value } => {
                write!(f, "{} must be a decimal number, found '{}'", field, value)
            }
            CatalogImportError::InvalidInteger { field, value } => {
                write!(f, "{} must be a whole number, found '{}'", field, value)
            }
            CatalogImportError::InvalidDate { field, value } => {
                write!(f, "{} must be a YYYY-MM-DD date, found '{}'", field, value)
            }
            CatalogImportError::InvalidFlag { field, value } => {
                write!(f, "{} must be true or false, found '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// In-memory catalog: schemes in publication order and the rules attached to each.
///
/// Inactive schemes are retained so a re-import can reactivate them, but they are never listed
/// through [`SchemeCatalog`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    schemes: Vec<Scheme>,
    rules: BTreeMap<SchemeId, Vec<EligibilityRule>>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Central schemes shipped with the service for development and demos.
    pub fn standard() -> Self {
        seed::standard_catalog()
    }

    pub fn insert_scheme(&mut self, scheme: Scheme) -> Result<(), CatalogImportError> {
        if self.scheme_by_code(&scheme.scheme_code).is_some() {
            return Err(CatalogImportError::DuplicateScheme(scheme.scheme_code));
        }

        self.rules.entry(scheme.id).or_default();
        self.schemes.push(scheme);
        Ok(())
    }

    /// Attach a rule to its scheme. Rules stay ordered by ascending priority; equal priorities
    /// keep insertion order.
    pub fn add_rule(&mut self, rule: EligibilityRule) -> Result<(), CatalogImportError> {
        match self.rules.get_mut(&rule.scheme_id) {
            Some(rules) => {
                let position = rules.partition_point(|existing| existing.priority <= rule.priority);
                rules.insert(position, rule);
                Ok(())
            }
            None => Err(CatalogImportError::UnknownScheme(rule.scheme_id.to_string())),
        }
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn rules_for(&self, scheme_id: &SchemeId) -> &[EligibilityRule] {
        self.rules
            .get(scheme_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn scheme_by_code(&self, scheme_code: &str) -> Option<&Scheme> {
        self.schemes
            .iter()
            .find(|scheme| scheme.scheme_code == scheme_code)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl SchemeCatalog for CatalogSnapshot {
    fn list_active_schemes(&self) -> Result<Vec<Scheme>, RepositoryError> {
        Ok(self
            .schemes
            .iter()
            .filter(|scheme| scheme.is_active)
            .cloned()
            .collect())
    }

    fn list_rules_for_scheme(
        &self,
        scheme_id: &SchemeId,
    ) -> Result<Vec<EligibilityRule>, RepositoryError> {
        Ok(self.rules_for(scheme_id).to_vec())
    }
}

pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_paths<S: AsRef<Path>, R: AsRef<Path>>(
        schemes_path: S,
        rules_path: R,
    ) -> Result<CatalogSnapshot, CatalogImportError> {
        let schemes = std::fs::File::open(schemes_path)?;
        let rules = std::fs::File::open(rules_path)?;
        Self::from_readers(schemes, rules)
    }

    pub fn from_readers<S: Read, R: Read>(
        schemes: S,
        rules: R,
    ) -> Result<CatalogSnapshot, CatalogImportError> {
        let mut snapshot = CatalogSnapshot::new();

        for row in parser::parse_schemes(schemes)? {
            snapshot.insert_scheme(row.into_scheme()?)?;
        }

        for row in parser::parse_rules(rules)? {
            let scheme_id = snapshot
                .scheme_by_code(&row.scheme_code)
                .map(|scheme| scheme.id)
                .ok_or_else(|| CatalogImportError::UnknownScheme(row.scheme_code.clone()))?;
            snapshot.add_rule(row.into_rule(scheme_id)?)?;
        }

        info!(
            schemes = snapshot.len(),
            rules = snapshot.rule_count(),
            "imported scheme catalog"
        );
        Ok(snapshot)
    }
}
