use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::CatalogSnapshot;
use crate::workflows::recommendations::domain::{
    EligibilityRule, Language, RuleOperator, RuleType, Scheme, SchemeId,
};

struct SchemeTemplate {
    code: &'static str,
    name: &'static str,
    description: &'static str,
    name_hi: &'static str,
    description_hi: &'static str,
    department: &'static str,
    category: &'static str,
    benefit_type: &'static str,
    benefit_amount: i64,
    application_url: &'static str,
    launched: (i32, u32, u32),
}

impl SchemeTemplate {
    fn build(&self) -> Scheme {
        let mut scheme = Scheme::new(self.code, self.name);
        scheme.description = Some(self.description.to_string());
        scheme.department = Some(self.department.to_string());
        scheme.category = Some(self.category.to_string());
        scheme.benefit_type = Some(self.benefit_type.to_string());
        scheme.benefit_amount = Some(Decimal::from(self.benefit_amount));
        scheme.is_central = true;
        scheme.application_url = Some(self.application_url.to_string());
        let (year, month, day) = self.launched;
        scheme.start_date = NaiveDate::from_ymd_opt(year, month, day);
        scheme.translate(
            Language::Hi,
            Some(self.name_hi.to_string()),
            Some(self.description_hi.to_string()),
        );
        scheme
    }
}

pub(super) fn standard_catalog() -> CatalogSnapshot {
    let schemes: Vec<Scheme> = standard_templates().iter().map(SchemeTemplate::build).collect();
    let mut rules: BTreeMap<SchemeId, Vec<EligibilityRule>> =
        schemes.iter().map(|scheme| (scheme.id, Vec::new())).collect();

    for rule in standard_rules() {
        rules.entry(rule.scheme_id).or_default().push(rule);
    }

    CatalogSnapshot { schemes, rules }
}

fn standard_templates() -> [SchemeTemplate; 5] {
    [
        SchemeTemplate {
            code: "PM-KISAN",
            name: "Pradhan Mantri Kisan Samman Nidhi",
            description: "Financial support of Rs. 6000 per year to small and marginal farmers",
            name_hi: "प्रधानमंत्री किसान सम्मान निधि",
            description_hi: "छोटे और सीमांत किसानों को प्रति वर्ष 6000 रुपये की वित्तीय सहायता",
            department: "Ministry of Agriculture",
            category: "Agriculture",
            benefit_type: "Direct Cash Transfer",
            benefit_amount: 6_000,
            application_url: "https://pmkisan.gov.in",
            launched: (2019, 2, 1),
        },
        SchemeTemplate {
            code: "PMAY-G",
            name: "Pradhan Mantri Awas Yojana - Gramin",
            description: "Housing for rural poor with financial assistance up to Rs. 1.2 lakh",
            name_hi: "प्रधानमंत्री आवास योजना - ग्रामीण",
            description_hi: "ग्रामीण गरीबों के लिए 1.2 लाख रुपये तक की वित्तीय सहायता के साथ आवास",
            department: "Ministry of Rural Development",
            category: "Housing",
            benefit_type: "Financial Assistance",
            benefit_amount: 120_000,
            application_url: "https://pmayg.nic.in",
            launched: (2016, 11, 20),
        },
        SchemeTemplate {
            code: "MGNREGA",
            name: "Mahatma Gandhi National Rural Employment Guarantee Act",
            description: "100 days of guaranteed wage employment to rural households",
            name_hi: "महात्मा गांधी राष्ट्रीय ग्रामीण रोजगार गारंटी अधिनियम",
            description_hi: "ग्रामीण परिवारों को 100 दिनों की गारंटीकृत मजदूरी रोजगार",
            department: "Ministry of Rural Development",
            category: "Employment",
            benefit_type: "Wage Employment",
            benefit_amount: 20_000,
            application_url: "https://nrega.nic.in",
            launched: (2006, 2, 2),
        },
        SchemeTemplate {
            code: "PMJDY",
            name: "Pradhan Mantri Jan Dhan Yojana",
            description: "Financial inclusion program for banking services",
            name_hi: "प्रधानमंत्री जन धन योजना",
            description_hi: "बैंकिंग सेवाओं के लिए वित्तीय समावेशन कार्यक्रम",
            department: "Ministry of Finance",
            category: "Financial Inclusion",
            benefit_type: "Banking Services",
            benefit_amount: 0,
            application_url: "https://pmjdy.gov.in",
            launched: (2014, 8, 28),
        },
        SchemeTemplate {
            code: "NSAP-OAP",
            name: "National Social Assistance Programme - Old Age Pension",
            description: "Monthly pension for elderly citizens below poverty line",
            name_hi: "राष्ट्रीय सामाजिक सहायता कार्यक्रम - वृद्धावस्था पेंशन",
            description_hi: "गरीबी रेखा से नीचे के बुजुर्ग नागरिकों के लिए मासिक पेंशन",
            department: "Ministry of Rural Development",
            category: "Social Security",
            benefit_type: "Monthly Pension",
            benefit_amount: 2_400,
            application_url: "https://nsap.nic.in",
            launched: (1995, 8, 15),
        },
    ]
}

fn standard_rules() -> Vec<EligibilityRule> {
    let kisan = SchemeId::from_code("PM-KISAN");
    let awas = SchemeId::from_code("PMAY-G");
    let pension = SchemeId::from_code("NSAP-OAP");

    vec![
        EligibilityRule::new(kisan, RuleType::LandOwnership, RuleOperator::LessOrEqual)
            .with_max(Decimal::new(20, 1)),
        EligibilityRule::new(kisan, RuleType::Occupation, RuleOperator::In)
            .with_list(["Farmer", "Agricultural Worker"]),
        EligibilityRule::new(awas, RuleType::IsBpl, RuleOperator::Equal).with_min(Decimal::ONE),
        EligibilityRule::new(pension, RuleType::Age, RuleOperator::GreaterOrEqual)
            .with_min(Decimal::from(60)),
        EligibilityRule::new(pension, RuleType::IsBpl, RuleOperator::Equal)
            .with_min(Decimal::ONE),
    ]
}
