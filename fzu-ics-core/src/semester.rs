use chrono::{Datelike, NaiveDate, Weekday};

use crate::{Error, Result, types::Term};

/// 校历日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 在校历中查找学期，返回第1周星期一的日期。
///
/// 教务处校历的学期开始日都是周一，这里直接使用，不做调整。
pub fn resolve_anchor(term: &str, calendar: &[Term]) -> Result<NaiveDate> {
    let entry = calendar
        .iter()
        .find(|item| item.term == term)
        .ok_or_else(|| Error::TermNotFound(term.to_string()))?;

    let date = NaiveDate::parse_from_str(entry.start_date.trim(), DATE_FORMAT).map_err(|e| {
        tracing::warn!(
            "学期 [{}] 开始日期 '{}' 无法解析: {}",
            term,
            entry.start_date,
            e
        );
        Error::TermNotFound(term.to_string())
    })?;

    if date.weekday() != Weekday::Mon {
        tracing::warn!("学期 [{}] 开始日期 {} 不是星期一", term, date);
    }

    Ok(date)
}
