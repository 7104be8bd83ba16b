use crate::demo::{
    run_catalog_categories, run_catalog_list, run_demo, run_recommend, CatalogArgs, DemoArgs,
    RecommendArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scheme_recommender::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scheme Recommender",
    about = "Match citizen profiles to government welfare schemes from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank the schemes a citizen profile qualifies for
    Recommend(RecommendArgs),
    /// Inspect the scheme catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Run sample citizens through the catalog end to end
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// List active schemes with their eligibility rules
    List(CatalogArgs),
    /// List distinct scheme categories
    Categories(CatalogArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Catalog {
            command: CatalogCommand::List(args),
        } => run_catalog_list(args),
        Command::Catalog {
            command: CatalogCommand::Categories(args),
        } => run_catalog_categories(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn recommend_requires_both_catalog_files() {
        let parsed = Cli::try_parse_from([
            "scheme-recommender",
            "recommend",
            "--profile",
            "citizen.json",
            "--schemes-csv",
            "schemes.csv",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "scheme-recommender",
            "recommend",
            "--profile",
            "citizen.json",
            "--limit",
            "101",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["scheme-recommender"]).expect("parses");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["scheme-recommender", "catalog", "categories"])
            .expect("parses");
        assert!(matches!(
            cli.command,
            Some(Command::Catalog {
                command: CatalogCommand::Categories(_)
            })
        ));
    }
}
