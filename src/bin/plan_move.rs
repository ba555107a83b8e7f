use anyhow::{Context, Result};
use chess_rig::domain::model::{ActuatorOp, MotionPlan};
use chess_rig::utils::{logger, validation::Validate};
use chess_rig::{CommandFormatter, MotionPlanner, RigConfig};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plan-move")]
#[command(about = "Print the motion plan and controller commands for chess moves without touching hardware")]
struct Args {
    /// Moves such as c2c4 g1f3
    #[arg(required = true)]
    moves: Vec<String>,

    /// Path to TOML rig configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct PlannedMove {
    token: String,
    plan: MotionPlan,
    motion_commands: Vec<String>,
    pick_commands: Vec<String>,
    place_commands: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => RigConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => RigConfig::default(),
    };
    config.validate().context("Invalid rig configuration")?;

    let planner = MotionPlanner::new(&config.board, &config.timing);
    let formatter = CommandFormatter::new(config.motion.clone(), config.actuator.clone());

    let mut planned = Vec::new();
    for token in &args.moves {
        let plan = planner
            .plan_token(token)
            .with_context(|| format!("Cannot plan '{}'", token))?;

        let motion_commands = plan
            .legs
            .iter()
            .map(|leg| formatter.motion_command(&leg.displacement))
            .collect();
        let actuator_sequence = |toggle: ActuatorOp| {
            [ActuatorOp::HeadDown, toggle, ActuatorOp::HeadUp]
                .into_iter()
                .map(|op| formatter.actuator_command(op).to_string())
                .collect::<Vec<_>>()
        };

        planned.push(PlannedMove {
            token: token.clone(),
            plan,
            motion_commands,
            pick_commands: actuator_sequence(ActuatorOp::EffectorOn),
            place_commands: actuator_sequence(ActuatorOp::EffectorOff),
        });
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&planned)?
    } else {
        serde_json::to_string(&planned)?
    };
    println!("{}", output);
    Ok(())
}
