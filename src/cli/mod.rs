pub mod commands;

use crate::config::Config;
use crate::storage::{BumpKind, RegistryStore};
use crate::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// medlingo CLI
#[derive(Parser)]
#[command(name = "medlingo")]
#[command(about = "Inference facade for multilingual health models with a model version registry")]
#[command(version)]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// 覆盖配置中的注册表路径
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// 子命令，缺省为 `serve`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI 命令
#[derive(Subcommand)]
pub enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 打印当前注册表
    Show,
    /// 创建初始注册表，所有模型为 v1.0.0
    Init {
        /// 即使配置未开启 registry.allow_create 也允许创建
        #[arg(long)]
        allow_create: bool,
    },
    /// 设置模型版本
    Update {
        /// 模型标识，例如 embedding_model
        model: String,
        /// 新版本号，例如 v1.1.0
        version: String,
    },
    /// 按升级策略提升模型版本
    Bump {
        /// 模型标识
        model: String,
        /// patch、minor 或 major
        #[arg(long, default_value = "patch")]
        kind: BumpKind,
    },
    /// 登记一次训练产出的新版本
    RecordTraining {
        /// 模型标识
        model: String,
        /// 训练产物路径
        #[arg(long)]
        artifact: PathBuf,
        /// patch、minor 或 major
        #[arg(long, default_value = "patch")]
        kind: BumpKind,
    },
}

impl Cli {
    /// 加载配置并应用命令行覆盖
    pub fn load_config(&self) -> Result<Config> {
        load_config(self.config.as_deref(), self.registry.as_ref())
    }
}

/// 依次读取配置文件（如有）、环境变量，最后应用 `--registry`
pub fn load_config(path: Option<&str>, registry: Option<&PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(registry) = registry {
        config.registry.path = registry.clone();
    }
    Ok(config)
}

/// 执行命令，未指定命令时启动服务
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            crate::utils::init_logging(&config.logging)?;
            commands::serve(config).await
        }
        Command::Show => commands::show(&registry_store(&config)?),
        Command::Init { allow_create } => {
            let store = registry_store(&config)?;
            let store = if allow_create {
                store.with_allow_create(true)
            } else {
                store
            };
            commands::init(&store)
        }
        Command::Update { model, version } => {
            commands::update(&registry_store(&config)?, &model, &version).map(|_| ())
        }
        Command::Bump { model, kind } => commands::bump(&registry_store(&config)?, &model, kind),
        Command::RecordTraining {
            model,
            artifact,
            kind,
        } => commands::record_training(&registry_store(&config)?, &model, &artifact, kind),
    }
}

/// 注册表维护命令只输出告警级别以上的日志，写到 stderr
fn registry_store(config: &Config) -> Result<RegistryStore> {
    crate::utils::init_cli_logging("warn")?;
    Ok(RegistryStore::from_config(config))
}
