use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use tasktrack::{wait_for_shutdown_signal, Application};
use tasktrack_config::{AppConfig, LogFormat};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    Command::new("tasktrack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("任务管理后端服务")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径 (默认依次查找 config/tasktrack.toml、tasktrack.toml)"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别，覆盖配置文件")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式，覆盖配置文件")
                .value_parser(["json", "pretty"]),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_name("ADDR")
                .help("监听地址，例如 127.0.0.1:3000"),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config_path = matches.get_one::<String>("config");

    // 加载配置
    let mut config = AppConfig::load(config_path.map(String::as_str))
        .with_context(|| match config_path {
            Some(path) => format!("加载配置文件失败: {path}"),
            None => "加载配置失败".to_string(),
        })?;
    apply_overrides(&mut config, &matches)?;

    // 初始化日志系统
    init_logging(
        &config.observability.log_level,
        config.observability.log_format,
    )?;

    info!("启动任务管理服务");
    if let Some(path) = config_path {
        info!("配置文件: {path}");
    }

    let app = Application::new(config).await?;
    if let Err(e) = app.run_until_shutdown(wait_for_shutdown_signal()).await {
        error!("{e:#}");
        return Err(e);
    }

    info!("任务管理服务已退出");
    Ok(())
}

/// 命令行参数优先于配置文件与环境变量
fn apply_overrides(config: &mut AppConfig, matches: &ArgMatches) -> Result<()> {
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.observability.log_level = level.clone();
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.observability.log_format = format.parse::<LogFormat>()?;
    }
    if let Some(bind) = matches.get_one::<String>("bind") {
        config.api.bind_address = bind.clone();
    }
    config.validate().context("配置验证失败")
}

/// 初始化日志系统，RUST_LOG 优先于配置的日志级别
fn init_logging(log_level: &str, log_format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("初始化JSON日志格式失败")?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .context("初始化Pretty日志格式失败")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let matches = cli()
            .try_get_matches_from([
                "tasktrack",
                "--log-level",
                "debug",
                "--log-format",
                "json",
                "--bind",
                "127.0.0.1:4000",
            ])
            .unwrap();

        let mut config = AppConfig::default();
        apply_overrides(&mut config, &matches).unwrap();
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.api.bind_address, "127.0.0.1:4000");
    }

    #[test]
    fn test_cli_rejects_unknown_log_format() {
        assert!(cli()
            .try_get_matches_from(["tasktrack", "--log-format", "xml"])
            .is_err());
    }

    #[test]
    fn test_invalid_bind_override_fails_validation() {
        let matches = cli()
            .try_get_matches_from(["tasktrack", "--bind", "localhost"])
            .unwrap();
        let mut config = AppConfig::default();
        assert!(apply_overrides(&mut config, &matches).is_err());
    }
}
