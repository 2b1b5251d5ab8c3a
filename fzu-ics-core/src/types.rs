use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 校历中的学期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// 学期标识，例如 `202401`
    pub term: String,
    /// 学期开始日期 (YYYY-MM-DD)，即第1周星期一
    pub start_date: String,
}

/// 单条周期性排课规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRule {
    pub start_week: u32,
    pub end_week: u32,
    /// 1=星期一 .. 7=星期日
    pub weekday: u32,
    pub start_period: u32,
    pub end_period: u32,
    #[serde(default)]
    pub location: String,
    /// 单周上课
    #[serde(default)]
    pub odd_weeks: bool,
    /// 双周上课
    #[serde(default)]
    pub even_weeks: bool,
    /// 整周课程（如军训），由原始文本单独处理
    #[serde(default)]
    pub whole_week: bool,
    /// 调课
    #[serde(default)]
    pub adjusted: bool,
}

/// 课程信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// 课程名称
    pub name: String,
    /// 教师姓名
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub rules: Vec<ScheduleRule>,
    /// 教务系统中的原始排课文本，每行一条
    #[serde(default)]
    pub raw_schedule: String,
}

/// 整周课程块，例如 `03周 星期1 - 04周 星期7`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WholeWeekBlock {
    pub start_week: u32,
    pub start_weekday: u32,
    pub end_week: u32,
    pub end_weekday: u32,
}

/// 数据源快照：学期列表、校历与每学期的课程
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub terms: Vec<String>,
    pub calendar: Vec<Term>,
    #[serde(default)]
    pub courses: HashMap<String, Vec<Course>>,
}

/// 重复频率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// 每周
    Weekly,
    /// 隔周
    Biweekly,
}

impl Cadence {
    pub fn interval(self) -> u32 {
        match self {
            Self::Weekly => 1,
            Self::Biweekly => 2,
        }
    }
}

/// 课程重复规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub cadence: Cadence,
    /// 结束时间 (UNTIL)，包含
    pub until: DateTime<Utc>,
}

impl RecurrenceRule {
    /// RRULE 属性值，例如 `FREQ=WEEKLY;UNTIL=20241218T020000Z;INTERVAL=2`
    pub fn to_rrule(&self) -> String {
        let mut rrule = format!("FREQ=WEEKLY;UNTIL={}", self.until.format("%Y%m%dT%H%M%SZ"));
        if self.cadence.interval() > 1 {
            rrule.push_str(&format!(";INTERVAL={}", self.cadence.interval()));
        }
        rrule
    }
}

/// 事件时间：定时 或 全天（结束日期不包含）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTiming {
    Timed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    AllDay {
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// 输出日历事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub created: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub timing: EventTiming,
    pub recurrence: Option<RecurrenceRule>,
}

/// ICS生成选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcsOptions {
    /// 日历名称
    pub calendar_name: Option<String>,
    /// 时区
    pub timezone: Option<String>,
    /// 是否包含课程描述
    pub include_description: bool,
    pub reminder_minutes: Option<u32>,
}

impl Default for IcsOptions {
    fn default() -> Self {
        Self {
            calendar_name: Some("福州大学课程表".to_string()),
            timezone: Some("Asia/Shanghai".to_string()),
            include_description: true,
            reminder_minutes: None,
        }
    }
}
