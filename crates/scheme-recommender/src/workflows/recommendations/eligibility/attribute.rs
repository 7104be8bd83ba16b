use rust_decimal::Decimal;

use super::super::domain::{Profile, RuleType};

/// Profile attribute resolved for a rule, borrowed from the profile snapshot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ProfileValue<'a> {
    Whole(i64),
    Exact(Decimal),
    Text(&'a str),
    Flag(bool),
}

impl ProfileValue<'_> {
    /// Numeric view used by comparison operators. Flags compare as 1/0; text never does.
    pub(crate) fn as_decimal(&self) -> Option<Decimal> {
        match self {
            ProfileValue::Whole(value) => Some(Decimal::from(*value)),
            ProfileValue::Exact(value) => Some(*value),
            ProfileValue::Flag(true) => Some(Decimal::ONE),
            ProfileValue::Flag(false) => Some(Decimal::ZERO),
            ProfileValue::Text(_) => None,
        }
    }

    /// Textual view used for `IN` membership and rule notes. Flags render as `True`/`False`.
    pub(crate) fn render(&self) -> String {
        match self {
            ProfileValue::Whole(value) => value.to_string(),
            ProfileValue::Exact(value) => value.to_string(),
            ProfileValue::Text(value) => (*value).to_string(),
            ProfileValue::Flag(true) => "True".to_string(),
            ProfileValue::Flag(false) => "False".to_string(),
        }
    }

    /// `IN` membership. Text and numbers match exactly; flags ignore ASCII case.
    pub(crate) fn is_listed(&self, candidates: &[String]) -> bool {
        let rendered = self.render();
        match self {
            ProfileValue::Flag(_) => candidates
                .iter()
                .any(|candidate| candidate.trim().eq_ignore_ascii_case(&rendered)),
            _ => candidates.iter().any(|candidate| *candidate == rendered),
        }
    }
}

pub(crate) fn resolve(profile: &Profile, rule_type: RuleType) -> Option<ProfileValue<'_>> {
    match rule_type {
        RuleType::Age => profile.age.map(|age| ProfileValue::Whole(i64::from(age))),
        RuleType::Income => profile.annual_income.map(ProfileValue::Exact),
        RuleType::Gender => profile.gender.as_deref().map(ProfileValue::Text),
        RuleType::State => profile.state.as_deref().map(ProfileValue::Text),
        RuleType::District => profile.district.as_deref().map(ProfileValue::Text),
        RuleType::Caste => profile.caste_category.as_deref().map(ProfileValue::Text),
        RuleType::Occupation => profile.occupation.as_deref().map(ProfileValue::Text),
        RuleType::FamilySize => profile
            .family_size
            .map(|size| ProfileValue::Whole(i64::from(size))),
        RuleType::IsBpl => profile.is_bpl.map(ProfileValue::Flag),
        RuleType::HasDisability => profile.has_disability.map(ProfileValue::Flag),
        RuleType::Education => profile.education_level.as_deref().map(ProfileValue::Text),
        RuleType::LandOwnership => profile.land_ownership.map(ProfileValue::Exact),
    }
}
