use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::{
    CalendarEvent, Course, Error, EventTiming, Result, ScheduleRule, WholeWeekBlock,
    ics::IcsCalendar, identity, location::LocationNormalizer, recurrence, whole_week,
};

/// 调课标题前缀
pub const ADJUSTED_TITLE_PREFIX: &str = "[调课] ";
/// 调课说明
pub const ADJUSTED_NOTE: &str = "本课程为调课后的课程。";

/// 把一个学期的课程组装成日历事件
pub struct EventAssembler<'a> {
    term: &'a str,
    anchor: NaiveDate,
    locations: &'a LocationNormalizer,
    generated_at: DateTime<Utc>,
}

impl<'a> EventAssembler<'a> {
    pub fn new(
        term: &'a str,
        anchor: NaiveDate,
        locations: &'a LocationNormalizer,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            term,
            anchor,
            locations,
            generated_at,
        }
    }

    /// 事件创建时间取学期开始日零点
    fn created(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.anchor.and_time(NaiveTime::MIN))
    }

    pub fn course_description(course: &Course) -> String {
        format!("任课教师：{}\n", course.teacher)
    }

    /// 周期课程事件
    pub fn periodic_event(&self, course: &Course, rule: &ScheduleRule) -> Result<CalendarEvent> {
        let slot = recurrence::encode(rule, self.anchor)?;
        // UID 只去掉校区前缀，不整理空白
        let uid = identity::periodic_uid(
            self.term,
            course,
            rule,
            self.locations.strip_prefix(&rule.location),
        );
        let location = self.locations.normalize(&rule.location);

        let mut title = course.name.clone();
        let mut description = Self::course_description(course);
        if rule.adjusted {
            title.insert_str(0, ADJUSTED_TITLE_PREFIX);
            description.push_str(ADJUSTED_NOTE);
            description.push('\n');
        }

        Ok(CalendarEvent {
            uid,
            created: self.created(),
            generated_at: self.generated_at,
            title,
            description: Some(description),
            location: (!location.is_empty()).then_some(location),
            timing: EventTiming::Timed {
                start: slot.first.start.with_timezone(&Utc),
                end: slot.first.end.with_timezone(&Utc),
            },
            recurrence: Some(slot.recurrence),
        })
    }

    /// 整周课程事件（全天，不重复）
    pub fn whole_week_event(
        &self,
        course: &Course,
        block: &WholeWeekBlock,
    ) -> Result<CalendarEvent> {
        let (start, end) = block.date_range(self.anchor)?;

        Ok(CalendarEvent {
            uid: identity::whole_week_uid(self.term, course, block),
            created: self.created(),
            generated_at: self.generated_at,
            title: course.name.clone(),
            description: Some(Self::course_description(course)),
            location: None,
            timing: EventTiming::AllDay { start, end },
            recurrence: None,
        })
    }

    /// 组装一门课程的全部事件并加入日历，返回加入的事件数。
    ///
    /// 单条规则或单行文本出错时记录到 `warnings` 并跳过，不影响其他事件。
    pub fn assemble_course(
        &self,
        course: &Course,
        calendar: &mut IcsCalendar,
        warnings: &mut Vec<Error>,
    ) -> usize {
        let mut added = 0;

        for rule in course.rules.iter().filter(|rule| !rule.whole_week) {
            match self.periodic_event(course, rule) {
                Ok(event) => {
                    tracing::debug!("[{}] {} -> {}", self.term, event.title, event.uid);
                    calendar.add_event(event);
                    added += 1;
                }
                Err(e) => {
                    tracing::warn!("[{}] 跳过课程 {} 的排课规则: {}", self.term, course.name, e);
                    warnings.push(e);
                }
            }
        }

        for block in whole_week::parse_lines(&course.raw_schedule) {
            match block.and_then(|block| self.whole_week_event(course, &block)) {
                Ok(event) => {
                    tracing::debug!("[{}] {} (整周) -> {}", self.term, event.title, event.uid);
                    calendar.add_event(event);
                    added += 1;
                }
                Err(e) => {
                    tracing::warn!("[{}] 跳过课程 {} 的整周安排: {}", self.term, course.name, e);
                    warnings.push(e);
                }
            }
        }

        added
    }
}
