mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fzu-ics")]
#[command(about = "福州大学课程表导出工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 启用详细日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 生成ICS文件，每个学期一个文件
    Generate {
        /// 课程数据：JSON文件路径或 http(s) 地址
        #[arg(short, long)]
        source: String,

        /// 学期标识，或 all 表示全部学期
        #[arg(short, long, default_value = "all")]
        term: String,

        /// 输出目录
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// 日历名称（会追加学期标识）
        #[arg(long)]
        calendar_name: Option<String>,

        /// 提醒时间（分钟）
        #[arg(long)]
        reminder_minutes: Option<u32>,

        /// 不输出课程描述
        #[arg(long)]
        no_description: bool,

        /// 需要从地点中去掉的校区前缀，可多次指定
        #[arg(long = "strip-prefix")]
        strip_prefixes: Vec<String>,
    },

    /// 列出数据源中的学期
    Terms {
        /// 课程数据：JSON文件路径或 http(s) 地址
        #[arg(short, long)]
        source: String,
    },

    /// 显示作息时间表
    Periods,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 设置日志级别
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("fzu_ics_cli={0},fzu_ics_core={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Generate {
            source,
            term,
            output_dir,
            calendar_name,
            reminder_minutes,
            no_description,
            strip_prefixes,
        } => {
            commands::generate_command(commands::GenerateParams {
                source,
                term,
                output_dir,
                calendar_name,
                reminder_minutes,
                include_description: !no_description,
                strip_prefixes,
            })
            .await
        }

        Commands::Terms { source } => commands::terms_command(source).await,

        Commands::Periods => commands::periods_command(),
    }
}
