use rust_decimal::Decimal;

use super::super::domain::{EligibilityRule, Profile, RuleOperator};
use super::attribute::{resolve, ProfileValue};
use super::RuleCheck;

/// Evaluate a single rule against a profile.
///
/// An unset attribute passes only non-mandatory rules. Unsupported operators and rules missing
/// the bound their operator needs evaluate to `false`.
pub fn evaluate_rule(profile: &Profile, rule: &EligibilityRule) -> bool {
    match resolve(profile, rule.rule_type) {
        Some(value) => satisfies(&value, rule),
        None => !rule.is_mandatory,
    }
}

fn satisfies(value: &ProfileValue<'_>, rule: &EligibilityRule) -> bool {
    match &rule.operator {
        RuleOperator::In => rule
            .value_list
            .as_ref()
            .map(|candidates| value.is_listed(candidates))
            .unwrap_or(false),
        RuleOperator::Unrecognized(_) => false,
        operator => value
            .as_decimal()
            .map(|actual| compare(actual, operator, rule.value_min, rule.value_max))
            .unwrap_or(false),
    }
}

fn compare(
    actual: Decimal,
    operator: &RuleOperator,
    value_min: Option<Decimal>,
    value_max: Option<Decimal>,
) -> bool {
    match (operator, value_min, value_max) {
        (RuleOperator::GreaterThan, Some(min), _) => actual > min,
        (RuleOperator::GreaterOrEqual, Some(min), _) => actual >= min,
        (RuleOperator::Equal, Some(min), _) => actual == min,
        (RuleOperator::LessThan, _, Some(max)) => actual < max,
        (RuleOperator::LessOrEqual, _, Some(max)) => actual <= max,
        (RuleOperator::Between, Some(min), Some(max)) => min <= actual && actual <= max,
        _ => false,
    }
}

pub(crate) fn check_rule(profile: &Profile, rule: &EligibilityRule) -> RuleCheck {
    let value = resolve(profile, rule.rule_type);
    let passed = evaluate_rule(profile, rule);
    let described = rule.describe();

    let note = match &value {
        None if rule.is_mandatory => format!("{} not provided; mandatory rule fails", rule.rule_type),
        None => format!("{} not provided; optional rule skipped", rule.rule_type),
        Some(_) if !rule.operator.is_recognized() => {
            format!("operator '{}' is not supported", rule.operator)
        }
        Some(value) if passed => format!("{} satisfies {}", value.render(), described),
        Some(value) => format!("{} does not satisfy {}", value.render(), described),
    };

    RuleCheck {
        rule: described,
        rule_type: rule.rule_type,
        operator: rule.operator.clone(),
        is_mandatory: rule.is_mandatory,
        attribute_present: value.is_some(),
        passed,
        gating: rule.is_mandatory,
        notes: note,
    }
}
