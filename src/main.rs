use chess_rig::adapters;
use chess_rig::utils::error::ErrorSeverity;
use chess_rig::utils::{logger, validation::Validate};
use chess_rig::{run_session, CliConfig, RigError, Sequencer};
use clap::Parser;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting chess-rig");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.load_rig_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    tracing::info!(
        "✅ Configuration loaded: park square {}, motion {} / actuator {} @ {} baud",
        config.board.origin,
        config.ports.motion,
        config.ports.actuator,
        config.ports.baud_rate
    );
    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - commands are logged, no serial port is opened");
    }

    let (motion, actuator) = match adapters::open_channels(&config, cli.dry_run) {
        Ok(channels) => channels,
        Err(e) => exit_with(e),
    };

    let mut sequencer = Sequencer::new(&config, motion, actuator);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    match run_session(&mut sequencer, stdin, &mut stdout).await {
        Ok(summary) => {
            if summary.send_failures > 0 {
                eprintln!(
                    "⚠️ {} command(s) failed to send during this session",
                    summary.send_failures
                );
            }
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: RigError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
