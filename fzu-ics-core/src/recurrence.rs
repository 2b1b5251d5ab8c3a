use chrono::{NaiveDate, Utc};

use crate::{
    Cadence, RecurrenceRule, Result, ScheduleRule,
    projector::{Occurrence, project},
};

/// 一条排课规则展开后的首次上课时间与重复规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringSlot {
    pub first: Occurrence,
    pub recurrence: RecurrenceRule,
}

/// 单双周都有课则每周重复，否则隔周重复
pub fn cadence_for(rule: &ScheduleRule) -> Cadence {
    if rule.odd_weeks && rule.even_weeks {
        Cadence::Weekly
    } else {
        Cadence::Biweekly
    }
}

/// 首次上课取 `start_week`，重复截止于 `end_week` 那次课的下课时间。
///
/// 单周或双周课程依赖 `start_week` 本身已是正确的奇偶周，这里不做校验。
pub fn encode(rule: &ScheduleRule, anchor: NaiveDate) -> Result<RecurringSlot> {
    let first = project(
        rule.start_week,
        rule.weekday,
        rule.start_period,
        rule.end_period,
        anchor,
    )?;
    let last = project(
        rule.end_week,
        rule.weekday,
        rule.start_period,
        rule.end_period,
        anchor,
    )?;

    Ok(RecurringSlot {
        first,
        recurrence: RecurrenceRule {
            cadence: cadence_for(rule),
            until: last.end.with_timezone(&Utc),
        },
    })
}
