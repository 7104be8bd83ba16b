use super::mapping::rule_type_for_normalized;
use super::normalizer::normalize_label;
use super::CatalogImportError;
use crate::workflows::recommendations::domain::{
    EligibilityRule, Language, RuleOperator, Scheme, SchemeId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;

const LIST_SEPARATOR: char = '|';

pub(crate) fn parse_schemes<R: Read>(reader: R) -> Result<Vec<SchemeRow>, csv::Error> {
    read_rows(reader)
}

pub(crate) fn parse_rules<R: Read>(reader: R) -> Result<Vec<RuleRow>, csv::Error> {
    read_rows(reader)
}

fn read_rows<R: Read, T: for<'de> Deserialize<'de>>(reader: R) -> Result<Vec<T>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize::<T>().collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchemeRow {
    #[serde(rename = "Scheme Code")]
    pub(crate) scheme_code: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Description", default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(rename = "Department", default, deserialize_with = "empty_string_as_none")]
    department: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(rename = "Benefit Type", default, deserialize_with = "empty_string_as_none")]
    benefit_type: Option<String>,
    #[serde(
        rename = "Benefit Amount",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    benefit_amount: Option<String>,
    #[serde(rename = "State", default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(rename = "Central", default, deserialize_with = "empty_string_as_none")]
    central: Option<String>,
    #[serde(
        rename = "Application URL",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    application_url: Option<String>,
    #[serde(rename = "Start Date", default, deserialize_with = "empty_string_as_none")]
    start_date: Option<String>,
    #[serde(rename = "End Date", default, deserialize_with = "empty_string_as_none")]
    end_date: Option<String>,
    #[serde(rename = "Active", default, deserialize_with = "empty_string_as_none")]
    active: Option<String>,
    #[serde(rename = "Name Hi", default, deserialize_with = "empty_string_as_none")]
    name_hi: Option<String>,
    #[serde(rename = "Name Mr", default, deserialize_with = "empty_string_as_none")]
    name_mr: Option<String>,
    #[serde(rename = "Name Ta", default, deserialize_with = "empty_string_as_none")]
    name_ta: Option<String>,
    #[serde(rename = "Description Hi", default, deserialize_with = "empty_string_as_none")]
    description_hi: Option<String>,
    #[serde(rename = "Description Mr", default, deserialize_with = "empty_string_as_none")]
    description_mr: Option<String>,
    #[serde(rename = "Description Ta", default, deserialize_with = "empty_string_as_none")]
    description_ta: Option<String>,
}

impl SchemeRow {
    pub(crate) fn into_scheme(self) -> Result<Scheme, CatalogImportError> {
        let mut scheme = Scheme::new(self.scheme_code, self.name);
        scheme.benefit_amount = parse_decimal("Benefit Amount", self.benefit_amount.as_deref())?;
        scheme.is_central = parse_flag("Central", self.central.as_deref(), false)?;
        scheme.start_date = parse_date("Start Date", self.start_date.as_deref())?;
        scheme.end_date = parse_date("End Date", self.end_date.as_deref())?;
        scheme.is_active = parse_flag("Active", self.active.as_deref(), true)?;
        scheme.description = self.description;
        scheme.department = self.department;
        scheme.category = self.category;
        scheme.benefit_type = self.benefit_type;
        scheme.state = self.state;
        scheme.application_url = self.application_url;
        scheme.translate(Language::Hi, self.name_hi, self.description_hi);
        scheme.translate(Language::Mr, self.name_mr, self.description_mr);
        scheme.translate(Language::Ta, self.name_ta, self.description_ta);
        Ok(scheme)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RuleRow {
    #[serde(rename = "Scheme Code")]
    pub(crate) scheme_code: String,
    #[serde(rename = "Rule Type")]
    rule_type: String,
    #[serde(rename = "Operator")]
    operator: String,
    #[serde(rename = "Value Min", default, deserialize_with = "empty_string_as_none")]
    value_min: Option<String>,
    #[serde(rename = "Value Max", default, deserialize_with = "empty_string_as_none")]
    value_max: Option<String>,
    #[serde(rename = "Value List", default, deserialize_with = "empty_string_as_none")]
    value_list: Option<String>,
    #[serde(rename = "Mandatory", default, deserialize_with = "empty_string_as_none")]
    mandatory: Option<String>,
    #[serde(rename = "Priority", default, deserialize_with = "empty_string_as_none")]
    priority: Option<String>,
}

impl RuleRow {
    pub(crate) fn into_rule(self, scheme_id: SchemeId) -> Result<EligibilityRule, CatalogImportError> {
        let rule_type = rule_type_for_normalized(&normalize_label(&self.rule_type)).ok_or_else(
            || CatalogImportError::UnknownRuleType {
                scheme_code: self.scheme_code.clone(),
                label: self.rule_type.clone(),
            },
        )?;
        let operator = RuleOperator::from(self.operator.to_ascii_uppercase());

        let mut rule = EligibilityRule::new(scheme_id, rule_type, operator);
        rule.value_min = parse_decimal("Value Min", self.value_min.as_deref())?;
        rule.value_max = parse_decimal("Value Max", self.value_max.as_deref())?;
        rule.value_list = self.value_list.as_deref().and_then(split_list);
        rule.is_mandatory = parse_flag("Mandatory", self.mandatory.as_deref(), true)?;
        rule.priority = match self.priority.as_deref() {
            Some(raw) => raw
                .parse::<i32>()
                .map_err(|_| CatalogImportError::InvalidInteger {
                    field: "Priority",
                    value: raw.to_string(),
                })?,
            None => 0,
        };
        Ok(rule)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_decimal(field: &'static str, value: Option<&str>) -> Result<Option<Decimal>, CatalogImportError> {
    value
        .map(|raw| {
            Decimal::from_str_exact(raw).map_err(|_| CatalogImportError::InvalidDecimal {
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, CatalogImportError> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CatalogImportError::InvalidDate {
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

fn parse_flag(
    field: &'static str,
    value: Option<&str>,
    default: bool,
) -> Result<bool, CatalogImportError> {
    let Some(raw) = value else {
        return Ok(default);
    };

    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(CatalogImportError::InvalidFlag {
            field,
            value: raw.to_string(),
        }),
    }
}

fn split_list(raw: &str) -> Option<Vec<String>> {
    let values: Vec<String> = raw
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    (!values.is_empty()).then_some(values)
}

#[cfg(test)]
pub(crate) fn parse_flag_for_tests(value: &str) -> Result<bool, CatalogImportError> {
    parse_flag("Active", Some(value), true)
}
