use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for citizens known to the profile store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier wrapper for catalog schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemeId(pub Uuid);

impl SchemeId {
    /// Stable identifier derived from the scheme code so re-imported catalogs keep their ids.
    pub fn from_code(scheme_code: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, scheme_code.as_bytes()))
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account level data owned by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub phone_number: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Citizen snapshot used for eligibility and ranking.
///
/// Every attribute is optional: a profile captured during onboarding may be partial, and rules
/// treat an unset attribute as missing rather than as a zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub full_name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub annual_income: Option<Decimal>,
    pub caste_category: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub block: Option<String>,
    pub village: Option<String>,
    pub occupation: Option<String>,
    pub family_size: Option<u32>,
    pub is_bpl: Option<bool>,
    pub has_disability: Option<bool>,
    pub education_level: Option<String>,
    /// Land holding in acres.
    pub land_ownership: Option<Decimal>,
    pub preferred_language: Option<String>,
}

impl Profile {
    pub fn is_bpl(&self) -> bool {
        self.is_bpl.unwrap_or(false)
    }

    pub fn has_disability(&self) -> bool {
        self.has_disability.unwrap_or(false)
    }

    /// Language for catalog text shown to this citizen; English when unset or unsupported.
    pub fn language(&self) -> Language {
        self.preferred_language
            .as_deref()
            .map(Language::from_code)
            .unwrap_or_default()
    }
}

/// Languages the catalog carries scheme text in. English is the catalog's base text.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Mr,
    Ta,
}

impl Language {
    pub const fn translated() -> [Self; 3] {
        [Self::Hi, Self::Mr, Self::Ta]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Mr => "mr",
            Self::Ta => "ta",
        }
    }

    /// Accepts bare codes and region tags such as `hi-IN`. Anything else falls back to English.
    pub fn from_code(code: &str) -> Self {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "hi" => Self::Hi,
            "mr" => Self::Mr,
            "ta" => Self::Ta,
            _ => Self::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Scheme name and description in one non-English language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeTranslation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Benefit program published in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: SchemeId,
    pub scheme_code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub benefit_type: Option<String>,
    #[serde(default)]
    pub benefit_amount: Option<Decimal>,
    /// `None` means the scheme is not restricted to a single state.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub is_central: bool,
    #[serde(default)]
    pub application_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<Language, SchemeTranslation>,
}

impl Scheme {
    /// Minimal active scheme; callers fill in the remaining catalog attributes.
    pub fn new(scheme_code: impl Into<String>, name: impl Into<String>) -> Self {
        let scheme_code = scheme_code.into();
        Self {
            id: SchemeId::from_code(&scheme_code),
            scheme_code,
            name: name.into(),
            description: None,
            department: None,
            category: None,
            benefit_type: None,
            benefit_amount: None,
            state: None,
            is_central: false,
            application_url: None,
            start_date: None,
            end_date: None,
            is_active: true,
            translations: BTreeMap::new(),
        }
    }

    /// Record translated text. English is the base text and empty translations are ignored.
    pub fn translate(
        &mut self,
        language: Language,
        name: Option<String>,
        description: Option<String>,
    ) {
        if language == Language::En || (name.is_none() && description.is_none()) {
            return;
        }
        self.translations
            .insert(language, SchemeTranslation { name, description });
    }

    pub fn localized_name(&self, language: Language) -> &str {
        self.translations
            .get(&language)
            .and_then(|translation| translation.name.as_deref())
            .unwrap_or(&self.name)
    }

    pub fn localized_description(&self, language: Language) -> Option<&str> {
        self.translations
            .get(&language)
            .and_then(|translation| translation.description.as_deref())
            .or(self.description.as_deref())
    }

    pub fn category_contains(&self, needle: &str) -> bool {
        self.category
            .as_deref()
            .map(|category| category.to_lowercase().contains(needle))
            .unwrap_or(false)
    }
}

/// Profile attribute a rule constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Age,
    Income,
    Gender,
    State,
    District,
    Caste,
    Occupation,
    FamilySize,
    IsBpl,
    HasDisability,
    Education,
    LandOwnership,
}

impl RuleType {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::Age,
            Self::Income,
            Self::Gender,
            Self::State,
            Self::District,
            Self::Caste,
            Self::Occupation,
            Self::FamilySize,
            Self::IsBpl,
            Self::HasDisability,
            Self::Education,
            Self::LandOwnership,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Income => "income",
            Self::Gender => "gender",
            Self::State => "state",
            Self::District => "district",
            Self::Caste => "caste",
            Self::Occupation => "occupation",
            Self::FamilySize => "family_size",
            Self::IsBpl => "is_bpl",
            Self::HasDisability => "has_disability",
            Self::Education => "education",
            Self::LandOwnership => "land_ownership",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = UnknownRuleType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownRuleType(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule type '{0}'")]
pub struct UnknownRuleType(pub String);

/// Comparison applied between the profile attribute and the rule bounds.
///
/// Operators outside the supported set are kept verbatim so stored rules round-trip; they never
/// evaluate to true.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleOperator {
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    Between,
    In,
    Unrecognized(String),
}

impl RuleOperator {
    pub fn symbol(&self) -> &str {
        match self {
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Equal => "=",
            Self::Between => "BETWEEN",
            Self::In => "IN",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<&str> for RuleOperator {
    fn from(value: &str) -> Self {
        match value.trim() {
            ">" => Self::GreaterThan,
            "<" => Self::LessThan,
            ">=" => Self::GreaterOrEqual,
            "<=" => Self::LessOrEqual,
            "=" => Self::Equal,
            "BETWEEN" => Self::Between,
            "IN" => Self::In,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for RuleOperator {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<RuleOperator> for String {
    fn from(value: RuleOperator) -> Self {
        value.symbol().to_string()
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Declarative eligibility constraint attached to a single scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRule {
    pub scheme_id: SchemeId,
    pub rule_type: RuleType,
    pub operator: RuleOperator,
    #[serde(default)]
    pub value_min: Option<Decimal>,
    #[serde(default)]
    pub value_max: Option<Decimal>,
    #[serde(default)]
    pub value_list: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub is_mandatory: bool,
    /// Reserved for tie-breaking; evaluation ignores it.
    #[serde(default)]
    pub priority: i32,
}

impl EligibilityRule {
    pub fn new(scheme_id: SchemeId, rule_type: RuleType, operator: RuleOperator) -> Self {
        Self {
            scheme_id,
            rule_type,
            operator,
            value_min: None,
            value_max: None,
            value_list: None,
            is_mandatory: true,
            priority: 0,
        }
    }

    pub fn with_min(mut self, value: Decimal) -> Self {
        self.value_min = Some(value);
        self
    }

    pub fn with_max(mut self, value: Decimal) -> Self {
        self.value_max = Some(value);
        self
    }

    pub fn with_list<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_list = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_mandatory = false;
        self
    }

    /// Human readable rendering such as `age >= 60` or `occupation IN [Farmer]`.
    pub fn describe(&self) -> String {
        let bound = |value: Option<Decimal>| {
            value
                .map(|value| value.normalize().to_string())
                .unwrap_or_else(|| "?".to_string())
        };

        match self.operator {
            RuleOperator::GreaterThan | RuleOperator::GreaterOrEqual | RuleOperator::Equal => {
                format!("{} {} {}", self.rule_type, self.operator, bound(self.value_min))
            }
            RuleOperator::LessThan | RuleOperator::LessOrEqual => {
                format!("{} {} {}", self.rule_type, self.operator, bound(self.value_max))
            }
            RuleOperator::Between => format!(
                "{} BETWEEN {} AND {}",
                self.rule_type,
                bound(self.value_min),
                bound(self.value_max)
            ),
            RuleOperator::In => format!(
                "{} IN [{}]",
                self.rule_type,
                self.value_list
                    .as_deref()
                    .map(|values| values.join(", "))
                    .unwrap_or_default()
            ),
            RuleOperator::Unrecognized(ref raw) => format!("{} {raw} ?", self.rule_type),
        }
    }
}

fn default_true() -> bool {
    true
}
