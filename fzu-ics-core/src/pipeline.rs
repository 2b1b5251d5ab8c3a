use std::{convert::Infallible, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    Course, Error, IcsOptions, Result, Term, assemble::EventAssembler, ics::IcsCalendar,
    location::LocationNormalizer, semester::resolve_anchor, source::ScheduleSource,
};

/// 全部学期
pub const ALL_TERMS: &str = "all";

/// 要转换的学期
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermSelection {
    All,
    Single(String),
}

impl From<&str> for TermSelection {
    /// 空字符串或 `all` 表示全部学期
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL_TERMS) {
            Self::All
        } else {
            Self::Single(s.to_string())
        }
    }
}

impl FromStr for TermSelection {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// 单个学期的转换结果
#[derive(Debug)]
pub struct TermOutput {
    pub term: String,
    /// 序列化后的完整ICS文本
    pub document: String,
    pub event_count: usize,
    /// 被跳过的规则或文本行
    pub warnings: Vec<Error>,
}

/// 学期转换器
#[derive(Debug, Clone)]
pub struct Converter {
    options: IcsOptions,
    locations: LocationNormalizer,
    generated_at: Option<DateTime<Utc>>,
}

impl Converter {
    pub fn new(options: IcsOptions, locations: LocationNormalizer) -> Self {
        Self {
            options,
            locations,
            generated_at: None,
        }
    }

    /// 固定生成时间，默认每次转换取当前时间
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    fn calendar_options(&self, term: &str) -> IcsOptions {
        let mut options = self.options.clone();
        options.calendar_name = options
            .calendar_name
            .map(|name| format!("{} [{}]", name, term));
        options
    }

    /// 转换一个学期：查找学期开始日期，组装全部课程并序列化
    pub fn convert_term(
        &self,
        term: &str,
        calendar: &[Term],
        courses: &[Course],
    ) -> Result<TermOutput> {
        let anchor = resolve_anchor(term, calendar)?;
        Ok(self.convert_anchored(term, anchor, courses))
    }

    fn convert_anchored(&self, term: &str, anchor: NaiveDate, courses: &[Course]) -> TermOutput {
        let generated_at = self.generated_at.unwrap_or_else(Utc::now);
        let assembler = EventAssembler::new(term, anchor, &self.locations, generated_at);
        let mut calendar = IcsCalendar::new(self.calendar_options(term));
        let mut warnings = Vec::new();

        for course in courses {
            assembler.assemble_course(course, &mut calendar, &mut warnings);
        }

        tracing::info!(
            "[{}] 生成 {} 个事件，跳过 {} 项",
            term,
            calendar.len(),
            warnings.len()
        );

        TermOutput {
            term: term.to_string(),
            document: calendar.serialize(),
            event_count: calendar.len(),
            warnings,
        }
    }

    /// 按选择依次转换学期。
    ///
    /// 可恢复的错误（如找不到学期开始日期）只影响该学期，记录在结果中；
    /// 其他错误（如数据源出错）使整体失败。
    pub async fn convert_selection(
        &self,
        source: &dyn ScheduleSource,
        selection: &TermSelection,
    ) -> Result<Vec<(String, Result<TermOutput>)>> {
        let available = source.terms().await?;
        let terms = match selection {
            TermSelection::All => available,
            TermSelection::Single(term) => {
                if !available.contains(term) {
                    return Err(Error::UnknownTerm(term.clone()));
                }
                vec![term.clone()]
            }
        };

        let calendar = source.academic_calendar().await?;
        let mut results = Vec::with_capacity(terms.len());

        for term in terms {
            match self.convert_source_term(source, &term, &calendar).await {
                Ok(output) => results.push((term, Ok(output))),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("[{}] 跳过学期: {}", term, e);
                    results.push((term, Err(e)));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(results)
    }

    async fn convert_source_term(
        &self,
        source: &dyn ScheduleSource,
        term: &str,
        calendar: &[Term],
    ) -> Result<TermOutput> {
        let anchor = resolve_anchor(term, calendar)?;
        let courses = source.courses(term).await?;
        tracing::info!("[{}] 找到 {} 门课程", term, courses.len());
        Ok(self.convert_anchored(term, anchor, &courses))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(IcsOptions::default(), LocationNormalizer::default())
    }
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use chrono::TimeZone;
    use ical::parser::ical::{IcalParser, component::IcalEvent};

    use super::*;
    use crate::{ScheduleRule, ScheduleSnapshot, source::SnapshotSource};

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 30, 12, 0, 0).unwrap()
    }

    fn calendar() -> Vec<Term> {
        vec![Term {
            term: "202401".to_string(),
            start_date: "2024-09-02".to_string(),
        }]
    }

    fn rule(
        weekday: u32,
        periods: (u32, u32),
        weeks: (u32, u32),
        odd: bool,
        even: bool,
    ) -> ScheduleRule {
        ScheduleRule {
            start_week: weeks.0,
            end_week: weeks.1,
            weekday,
            start_period: periods.0,
            end_period: periods.1,
            location: "旗山西三-204".to_string(),
            odd_weeks: odd,
            even_weeks: even,
            whole_week: false,
            adjusted: false,
        }
    }

    fn courses() -> Vec<Course> {
        vec![
            Course {
                name: "高等数学".to_string(),
                teacher: "王老师".to_string(),
                rules: vec![
                    rule(3, (1, 2), (1, 16), true, true),
                    rule(1, (5, 6), (1, 15), true, false),
                ],
                raw_schedule: String::new(),
            },
            Course {
                name: "军事技能".to_string(),
                teacher: "教官".to_string(),
                rules: vec![ScheduleRule {
                    whole_week: true,
                    ..rule(1, (0, 0), (3, 4), true, true)
                }],
                raw_schedule: "03周 星期1 - 04周 星期7".to_string(),
            },
        ]
    }

    fn property<'a>(event: &'a IcalEvent, name: &str) -> Option<&'a str> {
        event
            .properties
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_deref())
    }

    #[test]
    fn test_term_selection_parsing() {
        assert_eq!("all".parse::<TermSelection>().unwrap(), TermSelection::All);
        assert_eq!("".parse::<TermSelection>().unwrap(), TermSelection::All);
        assert_eq!(
            " 202401 ".parse::<TermSelection>().unwrap(),
            TermSelection::Single("202401".to_string())
        );
    }

    #[test]
    fn test_convert_term_end_to_end() {
        let converter = Converter::default().with_generated_at(generated_at());
        let output = converter
            .convert_term("202401", &calendar(), &courses())
            .unwrap();

        assert_eq!(output.event_count, 3);
        assert!(output.warnings.is_empty());

        let parsed = IcalParser::new(BufReader::new(output.document.as_bytes()))
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(parsed.events.len(), 3);

        let weekly = &parsed.events[0];
        assert_eq!(property(weekly, "DTSTART"), Some("20240904T002000Z"));
        assert_eq!(property(weekly, "DTEND"), Some("20240904T020000Z"));
        assert_eq!(
            property(weekly, "RRULE"),
            Some("FREQ=WEEKLY;UNTIL=20241218T020000Z")
        );
        assert_eq!(property(weekly, "LOCATION"), Some("西三-204"));

        let odd = &parsed.events[1];
        assert_eq!(property(odd, "DTSTART"), Some("20240902T060000Z"));
        assert_eq!(
            property(odd, "RRULE"),
            Some("FREQ=WEEKLY;UNTIL=20241209T074000Z;INTERVAL=2")
        );

        let training = &parsed.events[2];
        assert_eq!(property(training, "DTSTART"), Some("20240916"));
        assert_eq!(property(training, "DTEND"), Some("20240930"));
        assert_eq!(property(training, "RRULE"), None);
        assert_eq!(property(training, "LOCATION"), None);
    }

    #[test]
    fn test_rerun_reproduces_identifiers() {
        let first = Converter::default()
            .with_generated_at(generated_at())
            .convert_term("202401", &calendar(), &courses())
            .unwrap();
        let second = Converter::default()
            .convert_term("202401", &calendar(), &courses())
            .unwrap();

        let uids = |doc: &str| -> Vec<String> {
            doc.lines()
                .filter(|l| l.starts_with("UID:"))
                .map(str::to_string)
                .collect()
        };
        assert_eq!(uids(&first.document), uids(&second.document));
    }

    #[test]
    fn test_calendar_name_carries_term() {
        let output = Converter::default()
            .convert_term("202401", &calendar(), &[])
            .unwrap();
        assert!(output.document.contains("X-WR-CALNAME:福州大学课程表 [202401]\r\n"));
        assert_eq!(output.event_count, 0);
    }

    #[test]
    fn test_convert_term_unknown_anchor() {
        let result = Converter::default().convert_term("209901", &calendar(), &courses());
        assert!(matches!(result, Err(Error::TermNotFound(_))));
    }

    fn source() -> SnapshotSource {
        let mut snapshot = ScheduleSnapshot {
            terms: vec!["202301".to_string(), "202401".to_string()],
            calendar: calendar(),
            ..Default::default()
        };
        snapshot.courses.insert("202401".to_string(), courses());
        SnapshotSource::new("test", snapshot)
    }

    #[test]
    fn test_convert_all_skips_term_without_anchor() {
        let converter = Converter::default().with_generated_at(generated_at());
        let results =
            tokio_test::block_on(converter.convert_selection(&source(), &TermSelection::All))
                .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "202301");
        assert!(matches!(results[0].1, Err(Error::TermNotFound(_))));
        assert_eq!(results[1].0, "202401");
        assert_eq!(results[1].1.as_ref().unwrap().event_count, 3);
    }

    #[test]
    fn test_convert_single_term() {
        let converter = Converter::default();
        let results = tokio_test::block_on(
            converter.convert_selection(&source(), &TermSelection::Single("202401".to_string())),
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].1.is_ok());
    }

    /// 课程接口总是失败的数据源
    struct BrokenCourses(SnapshotSource);

    #[async_trait::async_trait]
    impl ScheduleSource for BrokenCourses {
        fn name(&self) -> &str {
            "broken"
        }

        async fn terms(&self) -> Result<Vec<String>> {
            self.0.terms().await
        }

        async fn academic_calendar(&self) -> Result<Vec<Term>> {
            self.0.academic_calendar().await
        }

        async fn courses(&self, _term: &str) -> Result<Vec<Course>> {
            Err(Error::Timeout)
        }
    }

    #[test]
    fn test_source_failure_aborts_selection() {
        let converter = Converter::default();
        let result = tokio_test::block_on(
            converter.convert_selection(&BrokenCourses(source()), &TermSelection::All),
        );
        assert!(matches!(result, Err(Error::Timeout)));
    }

    #[test]
    fn test_unlisted_term_is_fatal() {
        let converter = Converter::default();
        let result = tokio_test::block_on(
            converter.convert_selection(&source(), &TermSelection::Single("199901".to_string())),
        );
        assert!(matches!(result, Err(Error::UnknownTerm(t)) if t == "199901"));
    }
}
