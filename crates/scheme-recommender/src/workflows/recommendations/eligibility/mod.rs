mod attribute;
mod rules;

pub use rules::evaluate_rule;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{EligibilityRule, Profile, RuleOperator, RuleType, Scheme, SchemeId};
use super::repository::{RepositoryError, SchemeCatalog};

/// Filters the active catalog down to the schemes a profile qualifies for.
pub struct EligibilityMatcher<C> {
    catalog: Arc<C>,
}

impl<C> EligibilityMatcher<C>
where
    C: SchemeCatalog,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Active schemes whose mandatory rules all pass, in catalog order.
    pub fn filter_eligible_schemes(
        &self,
        profile: &Profile,
    ) -> Result<Vec<Scheme>, RepositoryError> {
        let schemes = self.catalog.list_active_schemes()?;
        let mut eligible = Vec::with_capacity(schemes.len());

        for scheme in schemes {
            let rules = self.catalog.list_rules_for_scheme(&scheme.id)?;
            let passes = is_eligible(profile, &rules);
            debug!(
                scheme = %scheme.scheme_code,
                rules = rules.len(),
                eligible = passes,
                "evaluated scheme eligibility"
            );
            if passes {
                eligible.push(scheme);
            }
        }

        Ok(eligible)
    }

    /// Rule-by-rule account of the eligibility decision for one scheme.
    pub fn explain(
        &self,
        profile: &Profile,
        scheme: &Scheme,
    ) -> Result<EligibilityReport, RepositoryError> {
        let rules = self.catalog.list_rules_for_scheme(&scheme.id)?;
        Ok(EligibilityReport::build(profile, scheme, &rules))
    }
}

/// Conjunction over the mandatory rules; an empty rule set always passes.
pub fn is_eligible(profile: &Profile, rules: &[EligibilityRule]) -> bool {
    rules
        .iter()
        .filter(|rule| rule.is_mandatory)
        .all(|rule| evaluate_rule(profile, rule))
}

/// Outcome of a single rule, retained for audits and explanations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCheck {
    pub rule: String,
    pub rule_type: RuleType,
    pub operator: RuleOperator,
    pub is_mandatory: bool,
    pub attribute_present: bool,
    pub passed: bool,
    /// Whether the outcome took part in the eligibility decision.
    pub gating: bool,
    pub notes: String,
}

/// Eligibility decision for one scheme with its rule trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub scheme_id: SchemeId,
    pub scheme_code: String,
    pub eligible: bool,
    pub checks: Vec<RuleCheck>,
}

impl EligibilityReport {
    pub fn build(profile: &Profile, scheme: &Scheme, rules: &[EligibilityRule]) -> Self {
        let checks: Vec<RuleCheck> = rules
            .iter()
            .map(|rule| rules::check_rule(profile, rule))
            .collect();
        let eligible = checks
            .iter()
            .filter(|check| check.gating)
            .all(|check| check.passed);

        Self {
            scheme_id: scheme.id,
            scheme_code: scheme.scheme_code.clone(),
            eligible,
            checks,
        }
    }

    pub fn failed_mandatory(&self) -> impl Iterator<Item = &RuleCheck> {
        self.checks
            .iter()
            .filter(|check| check.gating && !check.passed)
    }

    pub fn summary(&self) -> String {
        if self.checks.is_empty() {
            return format!("{} has no eligibility rules", self.scheme_code);
        }

        if self.eligible {
            return format!(
                "eligible for {}: {} mandatory rule(s) satisfied",
                self.scheme_code,
                self.checks.iter().filter(|check| check.gating).count()
            );
        }

        let failed: Vec<&str> = self
            .failed_mandatory()
            .map(|check| check.notes.as_str())
            .collect();
        format!("not eligible for {}: {}", self.scheme_code, failed.join("; "))
    }
}
