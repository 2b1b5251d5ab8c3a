use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::Client;

use crate::{Course, Error, Result, ScheduleSnapshot, Term};

/// 课程数据来源
///
/// 教务系统的登录与抓取不在本库内完成，数据源只需要提供已经解析好的
/// 学期列表、校历和课程。
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Source name
    fn name(&self) -> &str;

    /// 可选的学期标识
    async fn terms(&self) -> Result<Vec<String>>;

    /// 校历：每个学期的开始日期
    async fn academic_calendar(&self) -> Result<Vec<Term>>;

    /// 某学期的课程
    async fn courses(&self, term: &str) -> Result<Vec<Course>>;
}

/// 从 JSON 快照读取的数据源
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    origin: String,
    snapshot: ScheduleSnapshot,
}

impl SnapshotSource {
    pub fn new(origin: impl Into<String>, snapshot: ScheduleSnapshot) -> Self {
        Self {
            origin: origin.into(),
            snapshot,
        }
    }

    pub fn from_json(origin: impl Into<String>, json: &str) -> Result<Self> {
        Ok(Self::new(origin, serde_json::from_str(json)?))
    }

    /// 从本地文件加载
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(path.display().to_string(), &content)
    }

    /// 通过 HTTP(S) 下载
    pub async fn from_url(url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("FZU-ICS-Rust/0.1.0")
            .build()?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| handle_error_req(url, e))?;

        if !response.status().is_success() {
            return Err(Error::Source {
                source_name: url.to_string(),
                message: format!("unexpected status {}", response.status()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| handle_error_req(url, e))?;
        Self::from_json(url, &body)
    }

    /// 根据位置自动选择：`http://` 或 `https://` 开头的走网络，其余按文件路径处理
    pub async fn load(location: &str) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            tracing::info!("下载课程数据: {}", location);
            Self::from_url(location).await
        } else {
            tracing::info!("读取课程数据: {}", location);
            Self::from_path(location).await
        }
    }
}

fn handle_error_req(url: &str, error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else if error.is_request() {
        Error::Source {
            source_name: url.to_string(),
            message: format!("Request failed: {}", error),
        }
    } else {
        Error::Http(error)
    }
}

#[async_trait]
impl ScheduleSource for SnapshotSource {
    fn name(&self) -> &str {
        &self.origin
    }

    async fn terms(&self) -> Result<Vec<String>> {
        Ok(self.snapshot.terms.clone())
    }

    async fn academic_calendar(&self) -> Result<Vec<Term>> {
        Ok(self.snapshot.calendar.clone())
    }

    async fn courses(&self, term: &str) -> Result<Vec<Course>> {
        let courses = self.snapshot.courses.get(term).cloned().unwrap_or_default();
        if courses.is_empty() {
            tracing::debug!("{} 中没有学期 [{}] 的课程", self.origin, term);
        }
        Ok(courses)
    }
}
