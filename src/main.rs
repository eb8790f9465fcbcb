use clap::Parser;
use medlingo::cli::Cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // 解析命令行参数，未指定命令时默认启动服务器
    let cli = Cli::parse();

    match medlingo::cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.detail());
            ExitCode::FAILURE
        }
    }
}
