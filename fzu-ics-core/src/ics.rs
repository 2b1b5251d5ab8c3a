use crate::{CalendarEvent, EventTiming, IcsOptions};

const DATETIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";
/// RFC 5545 内容行的最大字节数（不含换行）
const MAX_LINE_OCTETS: usize = 75;

/// ICS日历容器，拥有全部事件，序列化时一次性输出
#[derive(Debug, Clone)]
pub struct IcsCalendar {
    options: IcsOptions,
    events: Vec<CalendarEvent>,
}

impl IcsCalendar {
    pub fn new(options: IcsOptions) -> Self {
        Self {
            options,
            events: Vec::new(),
        }
    }

    pub fn add_event(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 生成ICS日历内容
    pub fn serialize(&self) -> String {
        let mut ics_content = String::new();

        push_line(&mut ics_content, "BEGIN:VCALENDAR");
        push_line(&mut ics_content, "VERSION:2.0");
        push_line(&mut ics_content, "PRODID:-//FZU ICS//FZU Course Calendar//CN");
        push_line(&mut ics_content, "CALSCALE:GREGORIAN");
        push_line(&mut ics_content, "METHOD:PUBLISH");

        if let Some(ref name) = self.options.calendar_name {
            push_line(
                &mut ics_content,
                &format!("X-WR-CALNAME:{}", escape_text(name)),
            );
        }

        if let Some(ref timezone) = self.options.timezone {
            push_line(&mut ics_content, &format!("X-WR-TIMEZONE:{}", timezone));
        }

        for event in &self.events {
            self.write_event(&mut ics_content, event);
        }

        push_line(&mut ics_content, "END:VCALENDAR");

        ics_content
    }

    fn write_event(&self, ics_content: &mut String, event: &CalendarEvent) {
        let stamp = event.generated_at.format(DATETIME_FORMAT);

        push_line(ics_content, "BEGIN:VEVENT");
        push_line(ics_content, &format!("UID:{}", event.uid));
        push_line(ics_content, &format!("DTSTAMP:{}", stamp));
        push_line(
            ics_content,
            &format!("CREATED:{}", event.created.format(DATETIME_FORMAT)),
        );
        push_line(ics_content, &format!("LAST-MODIFIED:{}", stamp));
        push_line(
            ics_content,
            &format!("SUMMARY:{}", escape_text(&event.title)),
        );

        if let Some(description) = event
            .description
            .as_ref()
            .filter(|_| self.options.include_description)
        {
            push_line(
                ics_content,
                &format!("DESCRIPTION:{}", escape_text(description)),
            );
        }

        if let Some(ref location) = event.location {
            push_line(ics_content, &format!("LOCATION:{}", escape_text(location)));
        }

        match event.timing {
            EventTiming::Timed { start, end } => {
                push_line(
                    ics_content,
                    &format!("DTSTART:{}", start.format(DATETIME_FORMAT)),
                );
                push_line(ics_content, &format!("DTEND:{}", end.format(DATETIME_FORMAT)));
            }
            EventTiming::AllDay { start, end } => {
                push_line(
                    ics_content,
                    &format!("DTSTART;VALUE=DATE:{}", start.format(DATE_FORMAT)),
                );
                push_line(
                    ics_content,
                    &format!("DTEND;VALUE=DATE:{}", end.format(DATE_FORMAT)),
                );
            }
        }

        if let Some(ref recurrence) = event.recurrence {
            push_line(ics_content, &format!("RRULE:{}", recurrence.to_rrule()));
        }

        // 全天事件不加提醒
        if let (Some(minutes), EventTiming::Timed { .. }) =
            (self.options.reminder_minutes, event.timing)
        {
            push_line(ics_content, "BEGIN:VALARM");
            push_line(ics_content, "ACTION:DISPLAY");
            push_line(ics_content, "DESCRIPTION:课程提醒");
            push_line(ics_content, &format!("TRIGGER:-PT{}M", minutes));
            push_line(ics_content, "END:VALARM");
        }

        push_line(ics_content, "END:VEVENT");
    }
}

impl Default for IcsCalendar {
    fn default() -> Self {
        Self::new(IcsOptions::default())
    }
}

/// 转义ICS文本内容
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// 写入一行，超过75字节时按UTF-8字符边界折行
fn push_line(ics_content: &mut String, line: &str) {
    let mut rest = line;
    let mut limit = MAX_LINE_OCTETS;

    while rest.len() > limit {
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        ics_content.push_str(&rest[..cut]);
        ics_content.push_str("\r\n ");
        rest = &rest[cut..];
        // 续行开头的空格也计入长度
        limit = MAX_LINE_OCTETS - 1;
    }

    ics_content.push_str(rest);
    ics_content.push_str("\r\n");
}
