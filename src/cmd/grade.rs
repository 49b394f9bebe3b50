use super::RequestArgs;
use crate::reports;
use clap::Args;
use hanzi_grader::config::EngineSettings;
use hanzi_grader::error::GradeResult;
use hanzi_grader::scorer::Grader;

#[derive(Args, Debug, Clone)]
pub struct GradeArgs {
    #[command(flatten)]
    pub input: RequestArgs,

    #[command(flatten)]
    pub settings: EngineSettings,
}

pub fn run(args: GradeArgs, grader: &Grader, json: bool) -> GradeResult<()> {
    let request = args.input.load()?;
    let outcome = grader.grade(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
        return Ok(());
    }

    println!("\n📝 === GRADE: {} === 📝", request.character.name);
    reports::print_level_report(&outcome.breakdown, grader.rules());
    reports::print_legacy_report(&outcome.report, &outcome.highlight);
    Ok(())
}
