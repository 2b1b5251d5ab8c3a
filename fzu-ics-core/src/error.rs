use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source error: {source_name} - {message}")]
    Source {
        source_name: String,
        message: String,
    },

    #[error("Network timeout")]
    Timeout,

    /// 数据源中不存在该学期
    #[error("Unknown term: {0}")]
    UnknownTerm(String),

    /// 校历中找不到该学期，或开始日期无法解析
    #[error("Term start date not found: {0}")]
    TermNotFound(String),

    #[error("Malformed whole-week line '{line}': {reason}")]
    MalformedWholeWeekLine { line: String, reason: String },

    #[error("Class period index out of range: {0}")]
    PeriodOutOfRange(u32),

    #[error("Date out of range: week {week}, weekday {weekday}")]
    DateOutOfRange { week: u32, weekday: u32 },
}

impl Error {
    /// 只影响单个学期或单条课程记录的错误，调用方可以跳过后继续
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::TermNotFound(_)
                | Self::MalformedWholeWeekLine { .. }
                | Self::PeriodOutOfRange(_)
                | Self::DateOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
