use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fzu_ics_core::{
    period::{CLASS_PERIODS, LAST_PERIOD},
    prelude::*,
};

/// 生成课程表命令参数
pub struct GenerateParams {
    pub source: String,
    pub term: String,
    pub output_dir: PathBuf,
    pub calendar_name: Option<String>,
    pub reminder_minutes: Option<u32>,
    pub include_description: bool,
    pub strip_prefixes: Vec<String>,
}

/// 生成课程表命令
pub async fn generate_command(params: GenerateParams) -> Result<()> {
    let selection = TermSelection::from(params.term.as_str());
    tracing::info!("开始生成课程表: source={}, 学期={:?}", params.source, selection);

    let source = SnapshotSource::load(&params.source)
        .await
        .with_context(|| format!("无法加载课程数据: {}", params.source))?;

    let defaults = IcsOptions::default();
    let options = IcsOptions {
        calendar_name: params.calendar_name.or(defaults.calendar_name),
        timezone: defaults.timezone,
        include_description: params.include_description,
        reminder_minutes: params.reminder_minutes,
    };
    let locations = if params.strip_prefixes.is_empty() {
        LocationNormalizer::default()
    } else {
        LocationNormalizer::new(params.strip_prefixes)
    };

    let converter = Converter::new(options, locations);
    let results = converter.convert_selection(&source, &selection).await?;

    tokio::fs::create_dir_all(&params.output_dir)
        .await
        .with_context(|| format!("无法创建输出目录: {}", params.output_dir.display()))?;

    let mut written = 0;
    let mut failed = 0;
    for (term, result) in results {
        match result {
            Ok(output) => {
                for warning in &output.warnings {
                    println!("! [{}] 已跳过: {}", term, warning);
                }
                let path = output_path(&params.output_dir, &output.term);
                write_atomically(&path, &output.document).await?;
                println!(
                    "✓ [{}] {} 个事件已保存到: {}",
                    term,
                    output.event_count,
                    path.display()
                );
                written += 1;
            }
            Err(e) => {
                tracing::error!("[{}] {}", term, e);
                println!("✗ [{}] 已跳过: {}", term, e);
                failed += 1;
            }
        }
    }

    if written == 0 && failed > 0 {
        anyhow::bail!("没有生成任何ICS文件");
    }

    Ok(())
}

/// 列出学期命令
pub async fn terms_command(source: String) -> Result<()> {
    let source = SnapshotSource::load(&source)
        .await
        .with_context(|| format!("无法加载课程数据: {}", source))?;
    let terms = source.terms().await?;
    let calendar = source.academic_calendar().await?;

    println!("学期列表:");
    if terms.is_empty() {
        println!("  暂无学期");
    }
    for term in terms {
        let start = calendar
            .iter()
            .find(|item| item.term == term)
            .map_or("未知", |item| item.start_date.as_str());
        println!("  {} (开始日期: {})", term, start);
    }

    Ok(())
}

/// 显示作息时间命令
pub fn periods_command() -> Result<()> {
    println!("作息时间:");
    for (index, period) in CLASS_PERIODS.iter().enumerate().skip(1).take(LAST_PERIOD as usize) {
        println!(
            "  第{:>2}节 {}-{}",
            index,
            period.start_time().format("%H:%M"),
            period.end_time().format("%H:%M")
        );
    }

    Ok(())
}

fn output_path(dir: &Path, term: &str) -> PathBuf {
    let file_name: String = term
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    dir.join(format!("{}.ics", file_name))
}

/// 先写临时文件再重命名，避免留下写了一半的ICS文件
async fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("ics.tmp");
    tokio::fs::write(&tmp, content)
        .await
        .with_context(|| format!("写入失败: {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("重命名失败: {}", path.display()))?;
    Ok(())
}
