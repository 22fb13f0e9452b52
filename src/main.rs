use clap::Parser;
use dashboard_etl::utils::error::ErrorSeverity;
use dashboard_etl::utils::logger;
use dashboard_etl::{CliConfig, Dashboard, DashboardError, View, ViewCommand};

fn exit_code(e: &DashboardError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,   // 重試錯誤
        ErrorSeverity::High => 1,     // 處理錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}

fn report_failure(e: &DashboardError) -> ! {
    tracing::error!(
        "❌ Dashboard build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting dashboard-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 讀取並驗證配置
    let config = match cli.resolve().and_then(|c| c.validate_config().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            report_failure(&e);
        }
    };
    if config.monitoring.enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let dashboard = match Dashboard::new(config) {
        Ok(dashboard) => dashboard,
        Err(e) => report_failure(&e),
    };

    let view = match cli.command {
        ViewCommand::House => View::House,
        ViewCommand::Senate => View::Senate,
        ViewCommand::Games => View::Games,
        ViewCommand::Players => View::Players,
        ViewCommand::Shots => View::Shots,
        ViewCommand::Stock { symbol } => View::Stock { symbol },
        ViewCommand::Health => View::Health,
        ViewCommand::All { symbol } => {
            let summary = match dashboard.run_all(symbol).await {
                Ok(summary) => summary,
                Err(e) => report_failure(&e),
            };
            for outcome in &summary.views {
                match (&outcome.output, &outcome.error) {
                    (Some(path), _) => println!("✅ {}: {}", outcome.view, path),
                    (None, Some(error)) => eprintln!("❌ {}: {}", outcome.view, error),
                    (None, None) => eprintln!("❌ {}", outcome.view),
                }
            }
            if let Some(bundle) = &summary.bundle {
                println!("📁 Bundle saved to: {}", bundle);
            }
            if let Some(error) = &summary.bundle_error {
                eprintln!("❌ bundle: {}", error);
            }
            if summary.failed_views().next().is_some() || summary.bundle_error.is_some() {
                std::process::exit(2);
            }
            return Ok(());
        }
    };

    match dashboard.run_view(&view).await {
        Ok(output_path) => {
            tracing::info!("✅ View '{}' built successfully!", view.name());
            println!("✅ View '{}' built successfully!", view.name());
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}
