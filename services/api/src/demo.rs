use crate::infra::{load_catalog, read_profile, InMemoryProfileStore};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

use scheme_recommender::config::{AppConfig, RecommendationSettings};
use scheme_recommender::error::AppError;
use scheme_recommender::workflows::catalog::CatalogSnapshot;
use scheme_recommender::workflows::recommendations::{
    EligibilityReport, Profile, ProfileStore, RecommendationEngine, SchemeCatalog, ScoredScheme,
    User, UserId, UserRecord,
};

/// Catalog export overriding `APP_CATALOG_SCHEMES_CSV` / `APP_CATALOG_RULES_CSV`.
#[derive(Args, Debug, Default)]
pub(crate) struct CatalogSourceArgs {
    /// Schemes CSV export
    #[arg(long, requires = "rules_csv")]
    pub(crate) schemes_csv: Option<PathBuf>,
    /// Eligibility rules CSV export
    #[arg(long, requires = "schemes_csv")]
    pub(crate) rules_csv: Option<PathBuf>,
}

impl CatalogSourceArgs {
    fn settings(self) -> Result<RecommendationSettings, AppError> {
        let mut settings = AppConfig::load()?.recommendations;
        if let (Some(schemes), Some(rules)) = (self.schemes_csv, self.rules_csv) {
            settings.schemes_csv = Some(schemes);
            settings.rules_csv = Some(rules);
        }
        Ok(settings)
    }
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// JSON file holding the citizen profile
    #[arg(long)]
    pub(crate) profile: PathBuf,
    #[command(flatten)]
    pub(crate) source: CatalogSourceArgs,
    /// Maximum number of recommendations (1-100)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub(crate) limit: Option<u16>,
    /// Print the rule-by-rule eligibility trail for every active scheme
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    #[command(flatten)]
    pub(crate) source: CatalogSourceArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) source: CatalogSourceArgs,
    /// Include eligibility summaries for every active scheme
    #[arg(long)]
    pub(crate) explain: bool,
}

type LocalEngine = RecommendationEngine<InMemoryProfileStore, CatalogSnapshot>;

fn build_engine(
    settings: &RecommendationSettings,
    profiles: InMemoryProfileStore,
) -> Result<LocalEngine, AppError> {
    let (catalog, source) = load_catalog(settings)?;
    println!(
        "Catalog: {} ({} schemes, {} rules)",
        source.label(),
        catalog.len(),
        catalog.rule_count()
    );
    Ok(RecommendationEngine::new(
        Arc::new(profiles),
        Arc::new(catalog),
        settings.ranking(),
    ))
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        profile,
        source,
        limit,
        explain,
    } = args;

    let mut settings = source.settings()?;
    if let Some(limit) = limit {
        settings.max_results = usize::from(limit);
    }
    let profile = read_profile(&profile)?;
    let engine = build_engine(&settings, InMemoryProfileStore::default())?;

    recommend_profile(&engine, &profile, explain)
}

fn recommend_profile<P, C>(
    engine: &RecommendationEngine<P, C>,
    profile: &Profile,
    explain: bool,
) -> Result<(), AppError>
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    let recommendations = engine.recommend_for_profile(profile)?;
    render_recommendations(&recommendations);

    if explain {
        render_eligibility_trail(engine, profile)?;
    }
    Ok(())
}

pub(crate) fn run_catalog_list(args: CatalogArgs) -> Result<(), AppError> {
    let settings = args.source.settings()?;
    let (catalog, source) = load_catalog(&settings)?;
    println!("Active schemes ({})", source.label());

    for scheme in catalog.list_active_schemes()? {
        let scope = match scheme.state.as_deref() {
            Some(state) => state.to_string(),
            None if scheme.is_central => "central".to_string(),
            None => "unrestricted".to_string(),
        };
        println!(
            "- {} | {} [{}] | benefit {} | {}",
            scheme.scheme_code,
            scheme.name,
            scheme.category.as_deref().unwrap_or("uncategorised"),
            scheme
                .benefit_amount
                .map(|amount| amount.normalize().to_string())
                .unwrap_or_else(|| "n/a".to_string()),
            scope
        );

        let rules = catalog.rules_for(&scheme.id);
        if rules.is_empty() {
            println!("    open to all citizens");
        }
        for rule in rules {
            let qualifier = if rule.is_mandatory { "" } else { " (optional)" };
            println!("    {}{}", rule.describe(), qualifier);
        }
    }
    Ok(())
}

pub(crate) fn run_catalog_categories(args: CatalogArgs) -> Result<(), AppError> {
    let settings = args.source.settings()?;
    let engine = build_engine(&settings, InMemoryProfileStore::default())?;

    for category in engine.scheme_categories()? {
        println!("- {}", category);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { source, explain } = args;
    let settings = source.settings()?;

    println!("Scheme recommendation demo");
    let citizens = sample_citizens();
    let profiles = InMemoryProfileStore::from_records(citizens.clone());
    let engine = build_engine(&settings, profiles)?;

    for record in &citizens {
        let name = record
            .profile
            .as_ref()
            .and_then(|profile| profile.full_name.as_deref())
            .unwrap_or("Unnamed citizen");
        println!("\n{} ({})", name, record.user.id);

        let recommendations = engine.generate_recommendations(&record.user.id)?;
        render_recommendations(&recommendations);

        if let (true, Some(profile)) = (explain, record.profile.as_ref()) {
            render_eligibility_trail(&engine, profile)?;
        }
    }

    Ok(())
}

fn render_recommendations(recommendations: &[ScoredScheme]) {
    if recommendations.is_empty() {
        println!("  No eligible schemes found");
        return;
    }

    println!("  Recommended schemes:");
    for (rank, entry) in recommendations.iter().enumerate() {
        println!(
            "  {}. {} | {} | score {:.1}",
            rank + 1,
            entry.scheme.scheme_code,
            entry.display_name,
            entry.score
        );
        println!("     {}", entry.explanation());
    }
}

fn render_eligibility_trail<P, C>(
    engine: &RecommendationEngine<P, C>,
    profile: &Profile,
) -> Result<(), AppError>
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    let schemes = engine.matcher().catalog().list_active_schemes()?;

    println!("  Eligibility trail:");
    for scheme in &schemes {
        render_report(&engine.matcher().explain(profile, scheme)?);
    }
    Ok(())
}

fn render_report(report: &EligibilityReport) {
    println!("    - {}", report.summary());
    for check in &report.checks {
        let marker = match (check.passed, check.gating) {
            (true, _) => "ok",
            (false, true) => "FAIL",
            (false, false) => "skip",
        };
        println!("        [{}] {}", marker, check.notes);
    }
}

fn citizen(profile: Option<Profile>) -> UserRecord {
    UserRecord::new(
        User {
            id: UserId::new(),
            phone_number: "redacted".to_string(),
            is_active: true,
        },
        profile,
    )
}

pub(crate) fn sample_citizens() -> Vec<UserRecord> {
    vec![
        citizen(Some(Profile {
            full_name: Some("Ramesh Prasad".to_string()),
            age: Some(67),
            gender: Some("Male".to_string()),
            state: Some("Bihar".to_string()),
            district: Some("Gaya".to_string()),
            is_bpl: Some(true),
            family_size: Some(3),
            preferred_language: Some("hi".to_string()),
            ..Profile::default()
        })),
        citizen(Some(Profile {
            full_name: Some("Lakshmi Naik".to_string()),
            age: Some(38),
            gender: Some("Female".to_string()),
            state: Some("Karnataka".to_string()),
            occupation: Some("Farmer".to_string()),
            annual_income: Some(Decimal::from(90_000)),
            land_ownership: Some(Decimal::new(15, 1)),
            is_bpl: Some(false),
            ..Profile::default()
        })),
        citizen(Some(Profile {
            full_name: Some("Asha Kumari".to_string()),
            age: Some(34),
            gender: Some("Female".to_string()),
            state: Some("Uttar Pradesh".to_string()),
            annual_income: Some(Decimal::from(30_000)),
            is_bpl: Some(true),
            has_disability: Some(true),
            ..Profile::default()
        })),
        citizen(None),
    ]
}
