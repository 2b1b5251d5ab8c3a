//! 周次/星期/节次 到具体时间的换算

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::{
    Error, Result,
    period::{self, ClassPeriod},
};

/// 固定使用东八区 (Asia/Shanghai)
pub fn shanghai() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap() // UTC+8
}

/// 一次上课的起止时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// 第 `week` 周星期 `weekday` 的日期：anchor + (week-1)*7 + (weekday-1) 天
pub fn occurrence_date(week: u32, weekday: u32, anchor: NaiveDate) -> Result<NaiveDate> {
    let offset = (i64::from(week) - 1) * 7 + (i64::from(weekday) - 1);
    Duration::try_days(offset)
        .and_then(|days| anchor.checked_add_signed(days))
        .ok_or(Error::DateOutOfRange { week, weekday })
}

/// 计算某周某天第 `start_period` 到第 `end_period` 节的起止时间
pub fn project(
    week: u32,
    weekday: u32,
    start_period: u32,
    end_period: u32,
    anchor: NaiveDate,
) -> Result<Occurrence> {
    let first = period::period(start_period).ok_or(Error::PeriodOutOfRange(start_period))?;
    let last = period::period(end_period).ok_or(Error::PeriodOutOfRange(end_period))?;
    project_span(week, weekday, first, last, anchor)
}

pub(crate) fn project_span(
    week: u32,
    weekday: u32,
    first: &ClassPeriod,
    last: &ClassPeriod,
    anchor: NaiveDate,
) -> Result<Occurrence> {
    let date = occurrence_date(week, weekday, anchor)?;
    Ok(Occurrence {
        start: at_local(date, first.start_time(), week, weekday)?,
        end: at_local(date, last.end_time(), week, weekday)?,
    })
}

fn at_local(
    date: NaiveDate,
    time: NaiveTime,
    week: u32,
    weekday: u32,
) -> Result<DateTime<FixedOffset>> {
    shanghai()
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or(Error::DateOutOfRange { week, weekday })
}
