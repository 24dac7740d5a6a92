use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};

/// A chrono strftime format plus what it leaves out. Formats without a
/// year or timezone specifier are completed at parse time, so partial
/// syslog-style timestamps still resolve to a full instant.
#[derive(Clone, Debug)]
pub struct TimeTypeFormat {
    format_specifier: String,
    needs_year: bool,
    needs_tz: bool,
    local_tz_offset: i32,
}

pub fn local_timezone_offset() -> i32 {
    Local::now().offset().fix().local_minus_utc()
}

// https://docs.rs/chrono/0.4.19/chrono/format/strftime/index.html#specifiers
const YEAR_SPECIFIERS: [&str; 11] = [
    "%y", "%Y", "%G", "%g", "%D", "%x", "%f", "%v", "%c", "%+", "%s",
];
const TZ_SPECIFIERS: [&str; 6] = ["%Z", "%z", "%:z", "%#z", "%+", "%s"];

impl TimeTypeFormat {
    pub fn new(fmt: &str) -> TimeTypeFormat {
        let (specifier, need_year) = if YEAR_SPECIFIERS.iter().any(|&ys| fmt.contains(ys)) {
            (fmt.to_string(), false)
        } else {
            (format!("{} %Y", fmt), true)
        };
        let has_tz = TZ_SPECIFIERS.iter().any(|&zs| fmt.contains(zs));
        TimeTypeFormat {
            format_specifier: specifier,
            needs_year: need_year,
            needs_tz: !has_tz,
            local_tz_offset: local_timezone_offset(),
        }
    }

    pub fn parse(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        let with_year: String;
        let to_parse = if self.needs_year {
            // TODO the current-year completion is wrong for records
            // crossing new year
            let year = Utc::now().year();
            with_year = format!("{} {}", s, year);
            with_year.as_str()
        } else {
            s
        };
        if self.needs_tz {
            NaiveDateTime::parse_from_str(to_parse, &self.format_specifier)
                .ok()
                .and_then(|nd| {
                    FixedOffset::east_opt(self.local_tz_offset)
                        .and_then(|off| off.from_local_datetime(&nd).single())
                })
        } else {
            DateTime::parse_from_str(to_parse, &self.format_specifier).ok()
        }
    }
}
