/// Naming pattern compiler and evaluator
///
/// A pattern string like "%Y%m%d_%f_%n3" is compiled once into a sequence of
/// fields, then evaluated against each file's metadata to produce candidate
/// names. Compilation catches every syntax problem up front, before any file
/// is touched.
///
/// Directive table:
/// - %f  stem of the filename          %e  extension
/// - %#  trailing numeric run in the stem
/// - %a/%A/%b/%B/%m/%Y/%y/%d  capture-date components
/// - %C  "Make Model"   %M  make   %N  model
/// - %r  rating         %I  ISO    %F  aperture   %L  lens
/// - %l  focal length   %E  exposure compensation %s  shutter speed
/// - %n[0-9]  sequence number, the digit selects zero-pad width
/// - %T[KEY]  raw tag lookup ("Exif.", "Iptc." or "Xmp." key)
/// - %%  literal percent sign
use std::cell::Cell;
use std::path::Path;

use thiserror::Error;

use crate::meta::{self, ImageMetadata};
use crate::paths;

/// Pattern compilation failures, all detectable before touching the disk
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("unknown directive %{0}")]
    UnknownDirective(char),
    #[error("pattern ends in the middle of a directive")]
    TrailingSigil,
    #[error("unterminated %T[...] tag directive")]
    UnterminatedTag,
    #[error("character {0:?} is not allowed in file names")]
    InvalidCharacter(char),
    #[error("pattern must not start with an absolute path")]
    AbsolutePathLiteral,
    #[error("pattern is empty")]
    Empty,
}

/// Is `c` acceptable in a produced file name? Path separators are only
/// acceptable in hand-written literal segments (`allow_sep`).
fn is_valid_char(c: char, allow_sep: bool) -> bool {
    if std::path::is_separator(c) {
        return allow_sep;
    }
    if cfg!(windows) {
        !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
    } else {
        c != '/'
    }
}

/// Replace forbidden characters instead of dropping them: a slash becomes the
/// visually similar U+2215 division slash, anything else becomes '_'
fn make_valid(s: &str, allow_sep: bool) -> String {
    s.chars()
        .map(|c| {
            if is_valid_char(c, allow_sep) {
                c
            } else if c == '/' {
                '\u{2215}'
            } else {
                '_'
            }
        })
        .collect()
}

/// Capture-date component selected by a %-date directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCode {
    DayNameShort,  // %a
    DayNameFull,   // %A
    MonthNameShort, // %b
    MonthNameFull, // %B
    Month,         // %m
    Year,          // %Y
    YearShort,     // %y
    Day,           // %d
}

impl DateCode {
    fn from_directive(c: char) -> Option<DateCode> {
        Some(match c {
            'a' => DateCode::DayNameShort,
            'A' => DateCode::DayNameFull,
            'b' => DateCode::MonthNameShort,
            'B' => DateCode::MonthNameFull,
            'm' => DateCode::Month,
            'Y' => DateCode::Year,
            'y' => DateCode::YearShort,
            'd' => DateCode::Day,
            _ => return None,
        })
    }

    fn strftime(self) -> &'static str {
        match self {
            DateCode::DayNameShort => "%a",
            DateCode::DayNameFull => "%A",
            DateCode::MonthNameShort => "%b",
            DateCode::MonthNameFull => "%B",
            DateCode::Month => "%m",
            DateCode::Year => "%Y",
            DateCode::YearShort => "%y",
            DateCode::Day => "%d",
        }
    }
}

/// Shot-metadata value selected by a %-metric directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Rating,
    Iso,
    Aperture,
    Lens,
    FocalLength,
    ExposureComp,
    ShutterSpeed,
}

/// Namespace of a %T[...] tag key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagNamespace {
    Exif,
    Iptc,
    Xmp,
    /// Key with a prefix the lookup will not honor; renders empty
    Unknown,
}

impl TagNamespace {
    fn of(key: &str) -> TagNamespace {
        if key.starts_with("Exif.") {
            TagNamespace::Exif
        } else if key.starts_with("Iptc.") {
            TagNamespace::Iptc
        } else if key.starts_with("Xmp.") {
            TagNamespace::Xmp
        } else {
            TagNamespace::Unknown
        }
    }
}

/// One element of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Literal(String),
    Stem,
    Extension,
    TrailingNumber,
    Date(DateCode),
    MakeModel,
    Make,
    Model,
    Metric(MetricKind),
    Sequence { pad: usize },
    Tag { namespace: TagNamespace, key: String },
    Percent,
}

/// A compiled naming pattern
///
/// Immutable once built, except for the private sequence counter shared by
/// all %n fields of this instance. Two independently compiled patterns have
/// independent counters.
#[derive(Debug)]
pub struct Pattern {
    fields: Vec<Field>,
    next_sequence: Cell<i64>,
}

impl Pattern {
    /// Compile `text` into a pattern, rejecting every malformed input
    pub fn compile(text: &str) -> Result<Pattern, PatternError> {
        let chars: Vec<char> = text.chars().collect();
        let n = chars.len();
        let mut fields = Vec::new();
        let mut prev = 0;
        let mut i = 0;

        let push_literal = |fields: &mut Vec<Field>, run: &[char]| {
            let s: String = run.iter().collect();
            fields.push(Field::Literal(make_valid(&s, true)));
        };

        while i < n {
            let c = chars[i];
            if c == '%' {
                if prev != i {
                    push_literal(&mut fields, &chars[prev..i]);
                }
                if i + 1 >= n {
                    return Err(PatternError::TrailingSigil);
                }
                i += 2;
                let d = chars[i - 1];
                match d {
                    'f' => fields.push(Field::Stem),
                    'e' => fields.push(Field::Extension),
                    '#' => fields.push(Field::TrailingNumber),
                    'a' | 'A' | 'b' | 'B' | 'm' | 'Y' | 'y' | 'd' => {
                        // from_directive covers exactly this arm's characters
                        let code = DateCode::from_directive(d).unwrap();
                        fields.push(Field::Date(code));
                    }
                    'C' => fields.push(Field::MakeModel),
                    'M' => fields.push(Field::Make),
                    'N' => fields.push(Field::Model),
                    'r' => fields.push(Field::Metric(MetricKind::Rating)),
                    'I' => fields.push(Field::Metric(MetricKind::Iso)),
                    'F' => fields.push(Field::Metric(MetricKind::Aperture)),
                    'L' => fields.push(Field::Metric(MetricKind::Lens)),
                    'l' => fields.push(Field::Metric(MetricKind::FocalLength)),
                    'E' => fields.push(Field::Metric(MetricKind::ExposureComp)),
                    's' => fields.push(Field::Metric(MetricKind::ShutterSpeed)),
                    'n' => {
                        let pad = if i < n && chars[i].is_ascii_digit() {
                            let p = chars[i] as usize - '0' as usize;
                            i += 1;
                            p
                        } else {
                            0
                        };
                        fields.push(Field::Sequence { pad });
                    }
                    'T' => {
                        if i >= n || chars[i] != '[' {
                            return Err(PatternError::UnterminatedTag);
                        }
                        let mut j = i + 1;
                        while j < n && chars[j] != ']' {
                            j += 1;
                        }
                        if j >= n {
                            return Err(PatternError::UnterminatedTag);
                        }
                        let key: String = chars[i + 1..j].iter().collect();
                        fields.push(Field::Tag {
                            namespace: TagNamespace::of(&key),
                            key,
                        });
                        i = j + 1;
                    }
                    '%' => fields.push(Field::Percent),
                    other => return Err(PatternError::UnknownDirective(other)),
                }
                prev = i;
            } else {
                if !is_valid_char(c, true) {
                    return Err(PatternError::InvalidCharacter(c));
                }
                i += 1;
            }
        }
        if prev < n {
            push_literal(&mut fields, &chars[prev..]);
        }

        if fields.is_empty() {
            return Err(PatternError::Empty);
        }
        // A leading absolute literal would let the pattern escape the target
        // directory entirely; refuse it at compile time.
        if let Field::Literal(s) = &fields[0] {
            if Path::new(s).is_absolute() {
                return Err(PatternError::AbsolutePathLiteral);
            }
        }

        Ok(Pattern {
            fields,
            next_sequence: Cell::new(1),
        })
    }

    /// Seed the %n counter; defaults to 1
    pub fn set_sequence_start(&self, start: i64) {
        self.next_sequence.set(start);
    }

    /// Render the pattern against one file's metadata
    pub fn evaluate(&self, md: &dyn ImageMetadata) -> String {
        let mut out = String::new();
        for field in &self.fields {
            out.push_str(&self.render(field, md));
        }
        out
    }

    fn render(&self, field: &Field, md: &dyn ImageMetadata) -> String {
        match field {
            Field::Literal(s) => s.clone(),
            Field::Percent => "%".to_string(),
            Field::Stem => {
                let name = md.file_name();
                make_valid(paths::remove_extension(paths::basename(&name)), false)
            }
            Field::Extension => {
                let name = md.file_name();
                make_valid(paths::extension(&name), false)
            }
            Field::TrailingNumber => {
                let name = md.file_name();
                let stem = paths::remove_extension(paths::basename(&name));
                let digits: Vec<char> = stem
                    .chars()
                    .rev()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.iter().rev().collect()
            }
            Field::Date(code) => match md.date_time() {
                Some(t) => make_valid(&t.format(code.strftime()).to_string(), false),
                None => String::new(),
            },
            Field::MakeModel => make_valid(&format!("{} {}", md.make(), md.model()), false),
            Field::Make => make_valid(&md.make(), false),
            Field::Model => make_valid(&md.model(), false),
            Field::Metric(kind) => make_valid(&self.render_metric(*kind, md), false),
            Field::Sequence { pad } => {
                let value = self.next_sequence.get();
                self.next_sequence.set(value + 1);
                let mut s = value.to_string();
                while s.len() < *pad {
                    s.insert(0, '0');
                }
                s
            }
            Field::Tag { namespace, key } => match namespace {
                TagNamespace::Unknown => String::new(),
                _ => make_valid(&md.tag(key).unwrap_or_default(), false),
            },
        }
    }

    fn render_metric(&self, kind: MetricKind, md: &dyn ImageMetadata) -> String {
        match kind {
            MetricKind::Rating => md.rating().to_string(),
            MetricKind::Iso => md.iso_speed().to_string(),
            MetricKind::Aperture => meta::aperture_to_string(md.f_number()),
            MetricKind::Lens => md.lens(),
            MetricKind::FocalLength => format!("{:.0}", md.focal_length()),
            MetricKind::ExposureComp => meta::expcomp_to_string(md.exposure_compensation(), false),
            MetricKind::ShutterSpeed => meta::shutter_to_string(md.shutter_speed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct TestMeta {
        name: &'static str,
        model: &'static str,
    }

    impl Default for TestMeta {
        fn default() -> Self {
            TestMeta {
                name: "shoot/IMG_0042.CR2",
                model: "EOS R5",
            }
        }
    }

    impl ImageMetadata for TestMeta {
        fn file_name(&self) -> String {
            self.name.to_string()
        }
        fn date_time(&self) -> Option<chrono::NaiveDateTime> {
            NaiveDate::from_ymd_opt(2023, 7, 9).and_then(|d| d.and_hms_opt(14, 30, 0))
        }
        fn make(&self) -> String {
            "Canon".into()
        }
        fn model(&self) -> String {
            self.model.to_string()
        }
        fn iso_speed(&self) -> u32 {
            400
        }
        fn f_number(&self) -> f64 {
            2.8
        }
        fn shutter_speed(&self) -> f64 {
            0.004
        }
        fn rating(&self) -> i32 {
            3
        }
        fn tag(&self, key: &str) -> Option<String> {
            (key == "Exif.Image.Artist").then(|| "jane".to_string())
        }
    }

    #[test]
    fn test_stem_and_extension() {
        let p = Pattern::compile("%f.%e").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "IMG_0042.CR2");
    }

    #[test]
    fn test_percent_literal() {
        let p = Pattern::compile("%%").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "%");
    }

    #[test]
    fn test_trailing_number() {
        let p = Pattern::compile("%#").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "0042");
    }

    #[test]
    fn test_date_components() {
        let p = Pattern::compile("%Y-%m-%d_%a").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "2023-07-09_Sun");
        let p = Pattern::compile("%y").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "23");
    }

    #[test]
    fn test_camera_and_metrics() {
        let p = Pattern::compile("%C_%I_%F_%r").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "Canon EOS R5_400_2.8_3");
        // The slash of a fractional shutter speed is a computed character,
        // so it gets the division-slash treatment
        let p = Pattern::compile("%s").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "1\u{2215}250");
    }

    #[test]
    fn test_sequence_is_per_pattern_and_monotonic() {
        let p = Pattern::compile("%n2").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "01");
        assert_eq!(p.evaluate(&TestMeta::default()), "02");

        // A second compilation does not share the counter
        let q = Pattern::compile("%n2").unwrap();
        assert_eq!(q.evaluate(&TestMeta::default()), "01");
    }

    #[test]
    fn test_sequence_start_and_pad() {
        let p = Pattern::compile("%n3").unwrap();
        p.set_sequence_start(41);
        assert_eq!(p.evaluate(&TestMeta::default()), "041");
        assert_eq!(p.evaluate(&TestMeta::default()), "042");

        let unpadded = Pattern::compile("%n").unwrap();
        assert_eq!(unpadded.evaluate(&TestMeta::default()), "1");
    }

    #[test]
    fn test_tag_lookup() {
        let p = Pattern::compile("%T[Exif.Image.Artist]").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "jane");

        // Missing tags and foreign namespaces degrade to empty output
        let p = Pattern::compile("x%T[Exif.Image.Copyright]y").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "xy");
        let p = Pattern::compile("x%T[Thumb.Width]y").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "xy");
    }

    #[test]
    fn test_slash_in_field_value_is_substituted() {
        let meta = TestMeta {
            model: "PowerShot G7/X",
            ..Default::default()
        };
        let p = Pattern::compile("%N").unwrap();
        assert_eq!(p.evaluate(&meta), "PowerShot G7\u{2215}X");
    }

    #[test]
    fn test_literal_may_contain_separator() {
        let p = Pattern::compile("by-day/%f").unwrap();
        assert_eq!(p.evaluate(&TestMeta::default()), "by-day/IMG_0042");
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(
            Pattern::compile("%z").unwrap_err(),
            PatternError::UnknownDirective('z')
        );
        assert_eq!(
            Pattern::compile("abc%").unwrap_err(),
            PatternError::TrailingSigil
        );
        assert_eq!(
            Pattern::compile("%T[Exif.Foo").unwrap_err(),
            PatternError::UnterminatedTag
        );
        assert_eq!(
            Pattern::compile("%Tabc").unwrap_err(),
            PatternError::UnterminatedTag
        );
        assert_eq!(
            Pattern::compile("/abs/%f").unwrap_err(),
            PatternError::AbsolutePathLiteral
        );
        assert_eq!(Pattern::compile("").unwrap_err(), PatternError::Empty);
    }
}
