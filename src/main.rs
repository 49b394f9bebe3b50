use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use hanzi_grader::scorer::Grader;
use std::process;
use tracing::Level;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/rules/default.json")]
    rules: String,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,

    /// Print machine-readable JSON only.
    #[arg(global = true, long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deviation-engine grade with the legacy report.
    Grade(cmd::grade::GradeArgs),
    /// Convex-hull similarity grade.
    Holistic(cmd::holistic::HolisticArgs),
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}:", context);
    eprintln!("   {}", err);
    process::exit(1);
}

fn main() {
    // 1. Raw matches tell explicit flags apart from defaults
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // 2. Rule table (its settings block is the base configuration)
    let grader = Grader::load_from_file(&cli.rules).unwrap_or_else(|e| fail("FATAL ERROR LOADING RULES", e));

    // 3. Explicit CLI settings override the file
    let Some((_, sub_matches)) = matches.subcommand() else {
        fail("FATAL ERROR", "no subcommand given");
    };
    let cli_settings = match &cli.command {
        Commands::Grade(args) => &args.settings,
        Commands::Holistic(args) => &args.settings,
    };
    let mut settings = grader.settings().clone();
    settings.merge_from_cli(cli_settings, sub_matches);
    let grader = grader
        .with_settings(settings)
        .unwrap_or_else(|e| fail("INVALID SETTINGS", e));

    // 4. Execute
    let result = match cli.command {
        Commands::Grade(args) => cmd::grade::run(args, &grader, cli.json),
        Commands::Holistic(args) => cmd::holistic::run(args, &grader, cli.json),
    };
    if let Err(e) = result {
        fail("GRADING FAILED", e);
    }
}
