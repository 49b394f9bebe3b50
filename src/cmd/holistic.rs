use super::RequestArgs;
use crate::reports;
use clap::Args;
use hanzi_grader::config::EngineSettings;
use hanzi_grader::error::GradeResult;
use hanzi_grader::scorer::Grader;

#[derive(Args, Debug, Clone)]
pub struct HolisticArgs {
    #[command(flatten)]
    pub input: RequestArgs,

    #[command(flatten)]
    pub settings: EngineSettings,
}

pub fn run(args: HolisticArgs, grader: &Grader, json: bool) -> GradeResult<()> {
    let request = args.input.load()?;
    let score = grader.holistic(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }

    println!("\n🔷 === HOLISTIC: {} === 🔷", request.character.name);
    reports::print_holistic_report(&score);
    Ok(())
}
