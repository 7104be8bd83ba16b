use super::common::*;
use rust_decimal::Decimal;

use crate::workflows::recommendations::domain::{Language, Profile, Scheme};
use crate::workflows::recommendations::{RankingConfig, SchemeRanker, ScoreFactor};

fn housing_scheme() -> Scheme {
    let mut scheme = central_scheme("PMAY-G", "Housing", 120_000);
    scheme.name = "Pradhan Mantri Awas Yojana - Gramin".to_string();
    scheme
}

fn bpl_household() -> Profile {
    Profile {
        is_bpl: Some(true),
        annual_income: Some(Decimal::from(50_000)),
        state: Some("Odisha".to_string()),
        ..Profile::default()
    }
}

#[test]
fn housing_scenario_scores_seventy_five() {
    let ranker = SchemeRanker::default();
    let scored = ranker.score(&bpl_household(), housing_scheme());

    assert_eq!(scored.score, 75.0);
    assert_eq!(scored.points_for(ScoreFactor::BenefitAmount), 30.0);
    assert_eq!(scored.points_for(ScoreFactor::Location), 20.0);
    assert_eq!(scored.points_for(ScoreFactor::Category), 0.0);
    assert_eq!(scored.points_for(ScoreFactor::IncomeRatio), 15.0);
    assert_eq!(scored.points_for(ScoreFactor::Recency), 10.0);
    assert_eq!(scored.components.len(), 5);
}

#[test]
fn home_state_bonus_outranks_central_bonus() {
    let ranker = SchemeRanker::default();
    let profile = bpl_household();

    let home = ranker.score(&profile, state_scheme("OD-KALIA", "Odisha", 10_000));
    let elsewhere = ranker.score(&profile, state_scheme("BR-KUSHAL", "Bihar", 10_000));

    assert_eq!(home.points_for(ScoreFactor::Location), 25.0);
    assert_eq!(elsewhere.points_for(ScoreFactor::Location), 0.0);
    assert!(home.score > elsewhere.score);
}

#[test]
fn category_bonuses_stack_and_total_is_capped() {
    let mut scheme = central_scheme("BPL-DIS", "BPL Disability Support", 500_000);
    scheme.state = Some("Odisha".to_string());
    let profile = Profile {
        has_disability: Some(true),
        ..bpl_household()
    };

    let scored = SchemeRanker::default().score(&profile, scheme);
    assert_eq!(scored.points_for(ScoreFactor::Category), 40.0);
    assert_eq!(scored.score, 100.0);
    assert!(scored.explanation().contains("targets below poverty line and disability"));
}

#[test]
fn absent_or_negative_amounts_contribute_nothing() {
    let ranker = SchemeRanker::default();
    let mut scheme = state_scheme("TN-REFUND", "Tamil Nadu", 0);
    scheme.benefit_amount = Some(Decimal::from(-5_000));

    let scored = ranker.score(&bpl_household(), scheme.clone());
    assert_eq!(scored.points_for(ScoreFactor::BenefitAmount), 0.0);
    assert_eq!(scored.points_for(ScoreFactor::IncomeRatio), 0.0);
    assert_eq!(scored.score, 10.0);

    scheme.benefit_amount = None;
    let scored = ranker.score(&Profile::default(), scheme);
    assert_eq!(scored.score, 10.0);
    assert_eq!(
        scored.explanation(),
        "TN-REFUND programme matches your profile"
    );
}

#[test]
fn zero_income_skips_the_income_ratio() {
    let profile = Profile {
        annual_income: Some(Decimal::ZERO),
        ..bpl_household()
    };
    let scored = SchemeRanker::default().score(&profile, housing_scheme());
    assert_eq!(scored.points_for(ScoreFactor::IncomeRatio), 0.0);
    assert_eq!(scored.score, 60.0);
}

#[test]
fn scores_stay_within_bounds() {
    let ranker = SchemeRanker::default();
    let profiles = [
        Profile::default(),
        bpl_household(),
        Profile {
            has_disability: Some(true),
            annual_income: Some(Decimal::ONE),
            ..bpl_household()
        },
    ];
    let schemes = [
        housing_scheme(),
        central_scheme("DIS-BPL", "Disability BPL", 9_000_000),
        state_scheme("KA-RAITHA", "Karnataka", 1),
    ];

    for profile in &profiles {
        for scheme in &schemes {
            let scored = ranker.score(profile, scheme.clone());
            assert!(
                (0.0..=100.0).contains(&scored.score),
                "{} scored {}",
                scheme.scheme_code,
                scored.score
            );
        }
    }
}

#[test]
fn ranking_is_descending_and_truncated_to_ten() {
    let schemes: Vec<Scheme> = (1..=12)
        .map(|index| central_scheme(&format!("S{index:02}"), "Misc", index * 5_000))
        .collect();

    let ranked = SchemeRanker::default().rank_schemes(&Profile::default(), schemes);

    assert_eq!(ranked.len(), 10);
    assert_eq!(ranked[0].scheme.scheme_code, "S12");
    assert_eq!(ranked[9].scheme.scheme_code, "S03");
    assert!(ranked
        .windows(2)
        .all(|pair| pair[0].score >= pair[1].score));
}

#[test]
fn short_inputs_are_returned_in_full() {
    let schemes = vec![
        central_scheme("A", "Misc", 1_000),
        central_scheme("B", "Misc", 2_000),
        central_scheme("C", "Misc", 3_000),
    ];
    let ranked = SchemeRanker::default().rank_schemes(&Profile::default(), schemes);
    assert_eq!(ranked.len(), 3);
    assert!(SchemeRanker::default()
        .rank_schemes(&Profile::default(), Vec::new())
        .is_empty());
}

#[test]
fn equal_scores_keep_input_order() {
    let schemes = vec![
        central_scheme("FIRST", "Misc", 10_000),
        central_scheme("SECOND", "Misc", 10_000),
        central_scheme("THIRD", "Misc", 10_000),
    ];
    let ranked = SchemeRanker::default().rank_schemes(&Profile::default(), schemes);
    let codes: Vec<&str> = ranked
        .iter()
        .map(|entry| entry.scheme.scheme_code.as_str())
        .collect();
    assert_eq!(codes, vec!["FIRST", "SECOND", "THIRD"]);
}

#[test]
fn custom_result_limit_is_honoured() {
    let ranker = SchemeRanker::new(RankingConfig::default().with_max_results(2));
    let schemes = vec![
        central_scheme("A", "Misc", 1_000),
        central_scheme("B", "Misc", 2_000),
        central_scheme("C", "Misc", 3_000),
    ];
    let ranked = ranker.rank_schemes(&Profile::default(), schemes);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranker.config().max_results, 2);
}

#[test]
fn scheme_text_follows_the_preferred_language() {
    let mut scheme = housing_scheme();
    scheme.description = Some("Housing for rural poor".to_string());
    scheme.translate(
        Language::Hi,
        Some("प्रधानमंत्री आवास योजना - ग्रामीण".to_string()),
        None,
    );

    let hindi_reader = Profile {
        preferred_language: Some("hi-IN".to_string()),
        ..Profile::default()
    };
    let scored = SchemeRanker::default().score(&hindi_reader, scheme.clone());
    assert_eq!(scored.language, Language::Hi);
    assert_eq!(scored.display_name, "प्रधानमंत्री आवास योजना - ग्रामीण");
    assert_eq!(
        scored.display_description.as_deref(),
        Some("Housing for rural poor")
    );
    assert!(scored
        .explanation()
        .starts_with("प्रधानमंत्री आवास योजना - ग्रामीण"));

    let tamil_reader = Profile {
        preferred_language: Some("ta".to_string()),
        ..Profile::default()
    };
    let scored = SchemeRanker::default().score(&tamil_reader, scheme);
    assert_eq!(scored.language, Language::Ta);
    assert_eq!(scored.display_name, "Pradhan Mantri Awas Yojana - Gramin");
}

#[test]
fn unsupported_languages_fall_back_to_english() {
    assert_eq!(Language::from_code("HI"), Language::Hi);
    assert_eq!(Language::from_code("mr_IN"), Language::Mr);
    assert_eq!(Language::from_code("fr"), Language::En);
    assert_eq!(Language::from_code(""), Language::En);
    assert_eq!(Profile::default().language(), Language::En);
    assert_eq!(Language::Ta.to_string(), "ta");
}
