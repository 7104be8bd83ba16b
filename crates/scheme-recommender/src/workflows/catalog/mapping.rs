use super::normalizer::normalize_label;
use crate::workflows::recommendations::domain::RuleType;
use std::collections::HashMap;
use std::sync::OnceLock;

static RULE_TYPE_LABELS: OnceLock<HashMap<String, RuleType>> = OnceLock::new();

pub(crate) fn rule_type_for_normalized(normalized_label: &str) -> Option<RuleType> {
    rule_type_labels().get(normalized_label).copied()
}

fn rule_type_labels() -> &'static HashMap<String, RuleType> {
    RULE_TYPE_LABELS.get_or_init(|| {
        const ALIASES: &[(&str, RuleType)] = &[
            ("age", RuleType::Age),
            ("age years", RuleType::Age),
            ("income", RuleType::Income),
            ("annual income", RuleType::Income),
            ("household income", RuleType::Income),
            ("gender", RuleType::Gender),
            ("sex", RuleType::Gender),
            ("state", RuleType::State),
            ("district", RuleType::District),
            ("caste", RuleType::Caste),
            ("caste category", RuleType::Caste),
            ("social category", RuleType::Caste),
            ("occupation", RuleType::Occupation),
            ("profession", RuleType::Occupation),
            ("family size", RuleType::FamilySize),
            ("household size", RuleType::FamilySize),
            ("is bpl", RuleType::IsBpl),
            ("bpl", RuleType::IsBpl),
            ("below poverty line", RuleType::IsBpl),
            ("has disability", RuleType::HasDisability),
            ("disability", RuleType::HasDisability),
            ("differently abled", RuleType::HasDisability),
            ("education", RuleType::Education),
            ("education level", RuleType::Education),
            ("land", RuleType::LandOwnership),
            ("land ownership", RuleType::LandOwnership),
            ("land holding", RuleType::LandOwnership),
            ("landholding", RuleType::LandOwnership),
            ("land acres", RuleType::LandOwnership),
        ];

        let mut map = HashMap::with_capacity(ALIASES.len());
        for (label, rule_type) in ALIASES {
            map.insert(normalize_label(label), *rule_type);
        }
        map
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(label: &str) -> Option<RuleType> {
    let normalized = normalize_label(label);
    rule_type_for_normalized(&normalized)
}
