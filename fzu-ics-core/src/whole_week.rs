//! 整周课程（军训、实习等）的原始文本解析
//!
//! 教务系统对这类课程只给出一行文本：
//!
//! ```text
//! 03周 星期1 - 04周 星期7
//! ```
//!
//! 依次为 起始周、起始星期、分隔符、结束周、结束星期。

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::{
    Error, Result, WholeWeekBlock,
    period::whole_day,
    projector::project_span,
};

/// 周次标记
pub const WEEK_MARKER: &str = "周";

static WEEK_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)周$").unwrap());
static WEEKDAY_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^星期(\d+)$").unwrap());

/// 解析一行排课文本。
///
/// 首个词不含周次标记时返回 `None`，表示这不是整周课程。
pub fn parse_line(line: &str) -> Option<Result<WholeWeekBlock>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let first = tokens.first()?;
    if !first.contains(WEEK_MARKER) {
        return None;
    }

    Some(parse_tokens(&tokens).map_err(|reason| Error::MalformedWholeWeekLine {
        line: line.trim().to_string(),
        reason,
    }))
}

/// 依次解析多行文本中的整周课程，跳过非整周课程的行
pub fn parse_lines(raw: &str) -> impl Iterator<Item = Result<WholeWeekBlock>> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_line)
}

fn parse_tokens(tokens: &[&str]) -> std::result::Result<WholeWeekBlock, String> {
    let [start_week, start_weekday, _, end_week, end_weekday] = tokens else {
        return Err(format!("expected 5 tokens, found {}", tokens.len()));
    };

    let block = WholeWeekBlock {
        start_week: capture_number(&WEEK_TOKEN, start_week)?,
        start_weekday: capture_number(&WEEKDAY_TOKEN, start_weekday)?,
        end_week: capture_number(&WEEK_TOKEN, end_week)?,
        end_weekday: capture_number(&WEEKDAY_TOKEN, end_weekday)?,
    };

    if block.start_week == 0 || block.end_week == 0 {
        return Err("week numbers start at 1".to_string());
    }
    if !(1..=7).contains(&block.start_weekday) || !(1..=7).contains(&block.end_weekday) {
        return Err("weekday must be within 1..=7".to_string());
    }
    if (block.end_week, block.end_weekday) < (block.start_week, block.start_weekday) {
        return Err("block ends before it starts".to_string());
    }

    Ok(block)
}

fn capture_number(pattern: &Regex, token: &str) -> std::result::Result<u32, String> {
    pattern
        .captures(token)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| format!("unexpected token '{token}'"))
}

impl WholeWeekBlock {
    /// 全天事件的起止日期，结束日期为最后一天的次日（不包含）
    pub fn date_range(&self, anchor: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let day = whole_day();
        let start = project_span(self.start_week, self.start_weekday, day, day, anchor)?;
        let last = project_span(self.end_week, self.end_weekday, day, day, anchor)?;
        let end = last
            .end
            .date_naive()
            .checked_add_days(Days::new(1))
            .ok_or(Error::DateOutOfRange {
                week: self.end_week,
                weekday: self.end_weekday,
            })?;

        Ok((start.start.date_naive(), end))
    }
}
