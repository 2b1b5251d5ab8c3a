//! 事件 UID：对规则内容的规范化拼接做 MD5，同样的输入总是得到同样的 UID

use crate::{Course, ScheduleRule, WholeWeekBlock};

pub fn digest(key: &str) -> String {
    format!("{:x}", md5::compute(key.as_bytes()))
}

/// 周期课程的规范化键，`location` 为处理后的地点
pub fn periodic_key(term: &str, course: &Course, rule: &ScheduleRule, location: &str) -> String {
    format!(
        "{}__{}_{}_{}-{}_{}_{}-{}_{}_{}_{}",
        term,
        course.name,
        course.teacher,
        rule.start_week,
        rule.end_week,
        rule.weekday,
        rule.start_period,
        rule.end_period,
        location,
        rule.odd_weeks,
        rule.even_weeks
    )
}

pub fn whole_week_key(term: &str, course: &Course, block: &WholeWeekBlock) -> String {
    format!(
        "{}__{}_{}_{}-{}_{}-{}",
        term,
        course.name,
        course.teacher,
        block.start_week,
        block.end_week,
        block.start_weekday,
        block.end_weekday
    )
}

pub fn periodic_uid(term: &str, course: &Course, rule: &ScheduleRule, location: &str) -> String {
    digest(&periodic_key(term, course, rule, location))
}

pub fn whole_week_uid(term: &str, course: &Course, block: &WholeWeekBlock) -> String {
    digest(&whole_week_key(term, course, block))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course {
            name: "数据结构".to_string(),
            teacher: "陈老师".to_string(),
            rules: Vec::new(),
            raw_schedule: String::new(),
        }
    }

    fn rule() -> ScheduleRule {
        ScheduleRule {
            start_week: 1,
            end_week: 16,
            weekday: 3,
            start_period: 1,
            end_period: 2,
            location: "旗山西三-204".to_string(),
            odd_weeks: true,
            even_weeks: false,
            whole_week: false,
            adjusted: false,
        }
    }

    #[test]
    fn test_periodic_key_layout() {
        assert_eq!(
            periodic_key("202401", &course(), &rule(), "西三-204"),
            "202401__数据结构_陈老师_1-16_3_1-2_西三-204_true_false"
        );
    }

    #[test]
    fn test_uid_is_stable_hex() {
        let a = periodic_uid("202401", &course(), &rule(), "西三-204");
        let b = periodic_uid("202401", &course(), &rule(), "西三-204");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_uid_changes_with_content() {
        let mut moved = rule();
        moved.weekday = 4;
        assert_ne!(
            periodic_uid("202401", &course(), &rule(), "西三-204"),
            periodic_uid("202401", &course(), &moved, "西三-204")
        );
        assert_ne!(
            periodic_uid("202401", &course(), &rule(), "西三-204"),
            periodic_uid("202402", &course(), &rule(), "西三-204")
        );
    }

    #[test]
    fn test_adjusted_flag_does_not_affect_uid() {
        let mut adjusted = rule();
        adjusted.adjusted = true;
        assert_eq!(
            periodic_uid("202401", &course(), &rule(), "西三-204"),
            periodic_uid("202401", &course(), &adjusted, "西三-204")
        );
    }

    #[test]
    fn test_whole_week_key_layout() {
        let block = WholeWeekBlock {
            start_week: 3,
            start_weekday: 1,
            end_week: 4,
            end_weekday: 7,
        };
        assert_eq!(
            whole_week_key("202401", &course(), &block),
            "202401__数据结构_陈老师_3-4_1-7"
        );
        assert_eq!(digest("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }
}
