use anyhow::Result;
use clap::Parser;
use fingerprint_roi::cli::{execute_process, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    match execute_process(&cli).await {
        Ok(report) => {
            if report.summary.failed > 0 {
                println!("⚠️  {}枚の画像で検出に失敗しました", report.summary.failed);
            }
        }
        Err(error) => {
            eprintln!("❌ エラー: {error:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}
