//! 作息时间表

use chrono::NaiveTime;

/// 一节课的起止时间，以当天零点起的分钟数表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassPeriod {
    pub start: u32,
    pub end: u32,
}

impl ClassPeriod {
    const fn new(start_hour: u32, start_minute: u32, end_hour: u32, end_minute: u32) -> Self {
        Self {
            start: start_hour * 60 + start_minute,
            end: end_hour * 60 + end_minute,
        }
    }

    pub fn start_time(&self) -> NaiveTime {
        minutes_to_time(self.start)
    }

    pub fn end_time(&self) -> NaiveTime {
        minutes_to_time(self.end)
    }
}

fn minutes_to_time(minutes: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0).unwrap_or(NaiveTime::MIN)
}

/// 第0项为全天占位，第1-11节为实际课程节次
pub const CLASS_PERIODS: [ClassPeriod; 12] = [
    ClassPeriod::new(0, 0, 23, 59),
    ClassPeriod::new(8, 20, 9, 5),     // 第1节: 08:20-09:05
    ClassPeriod::new(9, 15, 10, 0),    // 第2节: 09:15-10:00
    ClassPeriod::new(10, 20, 11, 5),   // 第3节: 10:20-11:05
    ClassPeriod::new(11, 15, 12, 0),   // 第4节: 11:15-12:00
    ClassPeriod::new(14, 0, 14, 45),   // 第5节: 14:00-14:45
    ClassPeriod::new(14, 55, 15, 40),  // 第6节: 14:55-15:40
    ClassPeriod::new(15, 50, 16, 35),  // 第7节: 15:50-16:35
    ClassPeriod::new(16, 45, 17, 30),  // 第8节: 16:45-17:30
    ClassPeriod::new(19, 0, 19, 45),   // 第9节: 19:00-19:45
    ClassPeriod::new(19, 55, 20, 40),  // 第10节: 19:55-20:40
    ClassPeriod::new(20, 50, 21, 35),  // 第11节: 20:50-21:35
];

/// 最后一节课的序号
pub const LAST_PERIOD: u32 = 11;

/// 按节次取作息时间，只接受 1..=11
pub fn period(index: u32) -> Option<&'static ClassPeriod> {
    if (1..=LAST_PERIOD).contains(&index) {
        CLASS_PERIODS.get(index as usize)
    } else {
        None
    }
}

/// 全天占位时间段
pub fn whole_day() -> &'static ClassPeriod {
    &CLASS_PERIODS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_times_strictly_increase() {
        for pair in CLASS_PERIODS[1..].windows(2) {
            assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn test_each_period_ends_after_it_starts() {
        for p in &CLASS_PERIODS {
            assert!(p.end > p.start);
        }
    }

    #[test]
    fn test_period_lookup_bounds() {
        assert!(period(0).is_none());
        assert!(period(12).is_none());
        let first = period(1).unwrap();
        assert_eq!(first.start_time(), NaiveTime::from_hms_opt(8, 20, 0).unwrap());
        assert_eq!(
            period(LAST_PERIOD).unwrap().end_time(),
            NaiveTime::from_hms_opt(21, 35, 0).unwrap()
        );
    }

    #[test]
    fn test_whole_day_sentinel() {
        assert_eq!(whole_day().start_time(), NaiveTime::MIN);
        assert_eq!(
            whole_day().end_time(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
    }
}
