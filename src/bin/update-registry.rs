//! 训练后更新模型版本
//!
//! 用法：`update-registry <model_name> <new_version>`，例如
//! `update-registry embedding_model v1.1.0`。

use clap::Parser;
use medlingo::cli::commands;
use medlingo::storage::RegistryStore;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "update-registry")]
#[command(about = "Update a model version in the registry after training")]
#[command(version)]
struct Args {
    /// 模型标识，例如 embedding_model
    model_name: String,

    /// 新版本号，例如 v1.1.0
    new_version: String,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 覆盖配置中的注册表路径
    #[arg(long)]
    registry: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = medlingo::cli::load_config(args.config.as_deref(), args.registry.as_ref())
        .and_then(|config| {
            medlingo::utils::init_cli_logging("warn")?;
            let store = RegistryStore::from_config(&config);
            commands::update(&store, &args.model_name, &args.new_version)
        });

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.detail());
            ExitCode::FAILURE
        }
    }
}
