use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::super::domain::{Profile, Scheme};
use super::config::RankingConfig;
use super::{ScoreComponent, ScoreFactor};

pub(crate) fn score_scheme(
    profile: &Profile,
    scheme: &Scheme,
    config: &RankingConfig,
) -> (Vec<ScoreComponent>, f64) {
    let components = vec![
        benefit_component(scheme, config),
        location_component(profile, scheme, config),
        category_component(profile, scheme, config),
        income_ratio_component(profile, scheme, config),
        ScoreComponent {
            factor: ScoreFactor::Recency,
            points: config.recency_bonus,
            notes: "flat recency weight".to_string(),
        },
    ];

    let total: f64 = components.iter().map(|component| component.points).sum();
    (components, total.clamp(0.0, config.score_ceiling))
}

fn positive(amount: Option<Decimal>) -> Option<Decimal> {
    amount.filter(|value| *value > Decimal::ZERO)
}

fn benefit_component(scheme: &Scheme, config: &RankingConfig) -> ScoreComponent {
    let share = positive(scheme.benefit_amount).and_then(|amount| {
        amount
            .checked_div(config.benefit_reference_amount)
            .map(|ratio| ratio.min(Decimal::ONE))
    });

    match share {
        Some(share) => {
            let points = share.to_f64().unwrap_or(0.0) * config.benefit_weight;
            ScoreComponent {
                factor: ScoreFactor::BenefitAmount,
                points,
                notes: format!(
                    "benefit {} is {:.0}% of the {} reference",
                    scheme.benefit_amount.unwrap_or_default().normalize(),
                    share.to_f64().unwrap_or(0.0) * 100.0,
                    config.benefit_reference_amount
                ),
            }
        }
        None => ScoreComponent {
            factor: ScoreFactor::BenefitAmount,
            points: 0.0,
            notes: "no monetary benefit declared".to_string(),
        },
    }
}

fn location_component(profile: &Profile, scheme: &Scheme, config: &RankingConfig) -> ScoreComponent {
    let (points, notes) = if scheme.state == profile.state {
        (
            config.home_state_bonus,
            match scheme.state.as_deref() {
                Some(state) => format!("offered in home state {state}"),
                None => "no state restriction on either side".to_string(),
            },
        )
    } else if scheme.is_central {
        (
            config.central_scheme_bonus,
            "central scheme available nationwide".to_string(),
        )
    } else {
        (0.0, "state scheme outside home state".to_string())
    };

    ScoreComponent {
        factor: ScoreFactor::Location,
        points,
        notes,
    }
}

fn category_component(profile: &Profile, scheme: &Scheme, config: &RankingConfig) -> ScoreComponent {
    let mut points = 0.0;
    let mut matched = Vec::new();

    if profile.is_bpl() && scheme.category_contains("bpl") {
        points += config.category_bonus;
        matched.push("below poverty line");
    }
    if profile.has_disability() && scheme.category_contains("disability") {
        points += config.category_bonus;
        matched.push("disability");
    }

    let notes = if matched.is_empty() {
        "no targeted category match".to_string()
    } else {
        format!("targets {}", matched.join(" and "))
    };

    ScoreComponent {
        factor: ScoreFactor::Category,
        points,
        notes,
    }
}

fn income_ratio_component(
    profile: &Profile,
    scheme: &Scheme,
    config: &RankingConfig,
) -> ScoreComponent {
    let ratio = match (positive(profile.annual_income), positive(scheme.benefit_amount)) {
        (Some(income), Some(benefit)) => benefit.checked_div(income),
        _ => None,
    };

    match ratio.and_then(|ratio| ratio.to_f64()) {
        Some(ratio) => ScoreComponent {
            factor: ScoreFactor::IncomeRatio,
            points: (ratio * config.income_ratio_multiplier).min(config.income_ratio_cap),
            notes: format!("benefit equals {:.2}x annual income", ratio),
        },
        None => ScoreComponent {
            factor: ScoreFactor::IncomeRatio,
            points: 0.0,
            notes: "income or benefit unavailable".to_string(),
        },
    }
}
