use super::{FormattingInfo, Renderer};
use crate::{
    error::{PatternError, PatternErrorKind},
    LineEnding, LogEvent,
};
use chrono::format::{Item, StrftimeItems};
use std::{
    fmt::{self, Write},
    iter::Peekable,
    str::CharIndices,
};

const ISO8601: &str = "%Y-%m-%d %H:%M:%S,%3f";
const ABSOLUTE: &str = "%H:%M:%S,%3f";
const DATE: &str = "%d %b %Y %H:%M:%S,%3f";
const UNKNOWN: &str = "?";

pub(super) fn parse(
    pattern: &str,
    line_ending: LineEnding,
) -> Result<Vec<Renderer>, PatternError> {
    let mut steps = Vec::<Renderer>::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        if let Some((_, '%')) = chars.peek() {
            chars.next();
            literal.push('%');
            continue;
        }
        if !literal.is_empty() {
            steps.push(literal_renderer(std::mem::take(&mut literal)));
        }

        let error = |kind| PatternError {
            position: pos,
            kind,
        };
        let info = parse_formatting_info(&mut chars).map_err(error)?;
        let (conversion, o_option) = match chars.next() {
            None => return Err(error(PatternErrorKind::DanglingPercent)),
            Some((_, conversion)) => (conversion, parse_option(&mut chars).map_err(error)?),
        };
        let field = field_renderer(conversion, o_option, line_ending).map_err(error)?;
        steps.push(with_formatting(field, info));
    }
    if !literal.is_empty() {
        steps.push(literal_renderer(literal));
    }
    Ok(steps)
}

fn parse_formatting_info(
    chars: &mut Peekable<CharIndices>,
) -> Result<FormattingInfo, PatternErrorKind> {
    let mut info = FormattingInfo::default();
    if let Some((_, '-')) = chars.peek() {
        chars.next();
        info.left_justify = true;
    }
    info.min_width = parse_number(chars);
    if let Some((_, '.')) = chars.peek() {
        chars.next();
        info.max_width = Some(parse_number(chars).ok_or(PatternErrorKind::MissingMaxWidth)?);
    }
    Ok(info)
}

fn parse_number(chars: &mut Peekable<CharIndices>) -> Option<usize> {
    let mut o_number: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|(_, c)| c.to_digit(10)) {
        chars.next();
        o_number = Some(
            o_number
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
    }
    o_number
}

fn parse_option(chars: &mut Peekable<CharIndices>) -> Result<Option<String>, PatternErrorKind> {
    if let Some((_, '{')) = chars.peek() {
        chars.next();
        let mut option = String::new();
        for (_, c) in chars.by_ref() {
            if c == '}' {
                return Ok(Some(option));
            }
            option.push(c);
        }
        Err(PatternErrorKind::UnterminatedOption)
    } else {
        Ok(None)
    }
}

fn literal_renderer(text: String) -> Renderer {
    Box::new(move |_event: &LogEvent, buffer: &mut String| -> fmt::Result {
        buffer.push_str(&text);
        Ok(())
    })
}

fn with_formatting(field: Renderer, info: FormattingInfo) -> Renderer {
    if info.is_plain() {
        field
    } else {
        Box::new(move |event: &LogEvent, buffer: &mut String| -> fmt::Result {
            let mut value = String::new();
            field(event, &mut value)?;
            info.apply(&value, buffer);
            Ok(())
        })
    }
}

fn field_renderer(
    conversion: char,
    o_option: Option<String>,
    line_ending: LineEnding,
) -> Result<Renderer, PatternErrorKind> {
    let renderer: Renderer = match conversion {
        'c' => {
            let o_precision = parse_precision(o_option)?;
            Box::new(move |event: &LogEvent, buffer: &mut String| -> fmt::Result {
                buffer.push_str(abbreviate(event.logger(), o_precision));
                Ok(())
            })
        }
        'C' => {
            let o_precision = parse_precision(o_option)?;
            Box::new(move |event: &LogEvent, buffer: &mut String| -> fmt::Result {
                buffer.push_str(
                    event
                        .module_path()
                        .map_or(UNKNOWN, |path| abbreviate(path, o_precision)),
                );
                Ok(())
            })
        }
        'd' => {
            let date_format = date_format(o_option)?;
            Box::new(move |event: &LogEvent, buffer: &mut String| -> fmt::Result {
                write!(buffer, "{}", event.timestamp().format(&date_format))
            })
        }
        'F' => Box::new(|event: &LogEvent, buffer: &mut String| -> fmt::Result {
            buffer.push_str(event.file().unwrap_or(UNKNOWN));
            Ok(())
        }),
        'l' => Box::new(|event: &LogEvent, buffer: &mut String| -> fmt::Result {
            write!(
                buffer,
                "{}({}:",
                event.module_path().unwrap_or(UNKNOWN),
                event.file().unwrap_or(UNKNOWN),
            )?;
            write_line(event, buffer)?;
            buffer.push(')');
            Ok(())
        }),
        'L' => Box::new(write_line),
        'm' => Box::new(|event: &LogEvent, buffer: &mut String| -> fmt::Result {
            buffer.push_str(event.message());
            Ok(())
        }),
        'M' => Box::new(|event: &LogEvent, buffer: &mut String| -> fmt::Result {
            buffer.push_str(
                event
                    .module_path()
                    .map_or(UNKNOWN, |path| abbreviate(path, Some(1))),
            );
            Ok(())
        }),
        'n' => literal_renderer(line_ending.as_str().to_string()),
        'p' => Box::new(|event: &LogEvent, buffer: &mut String| -> fmt::Result {
            write!(buffer, "{}", event.level())
        }),
        'r' => Box::new(|event: &LogEvent, buffer: &mut String| -> fmt::Result {
            write!(buffer, "{}", event.elapsed_millis())
        }),
        't' => Box::new(|event: &LogEvent, buffer: &mut String| -> fmt::Result {
            buffer.push_str(event.thread_name());
            Ok(())
        }),
        'x' => Box::new(|event: &LogEvent, buffer: &mut String| -> fmt::Result {
            buffer.push_str(event.ndc());
            Ok(())
        }),
        'X' => {
            let key = o_option
                .filter(|key| !key.is_empty())
                .ok_or(PatternErrorKind::MissingKey)?;
            Box::new(move |event: &LogEvent, buffer: &mut String| -> fmt::Result {
                buffer.push_str(event.mdc(&key).unwrap_or_default());
                Ok(())
            })
        }
        c => return Err(PatternErrorKind::UnknownConversion(c)),
    };
    Ok(renderer)
}

fn write_line(event: &LogEvent, buffer: &mut String) -> fmt::Result {
    match event.line() {
        Some(line) => write!(buffer, "{line}"),
        None => {
            buffer.push_str(UNKNOWN);
            Ok(())
        }
    }
}

fn parse_precision(o_option: Option<String>) -> Result<Option<usize>, PatternErrorKind> {
    match o_option {
        None => Ok(None),
        Some(option) => match option.trim().parse::<usize>() {
            Ok(precision) if precision > 0 => Ok(Some(precision)),
            _ => Err(PatternErrorKind::InvalidPrecision(option)),
        },
    }
}

fn date_format(o_option: Option<String>) -> Result<String, PatternErrorKind> {
    let date_format = match o_option.as_deref() {
        None | Some("ISO8601") => ISO8601.to_string(),
        Some("ABSOLUTE") => ABSOLUTE.to_string(),
        Some("DATE") => DATE.to_string(),
        Some(custom) => custom.to_string(),
    };
    if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
        Err(PatternErrorKind::InvalidDateFormat(date_format))
    } else {
        Ok(date_format)
    }
}

// Keeps the last `precision` components of a name like `a::b::c` or `a.b.c`.
fn abbreviate(name: &str, o_precision: Option<usize>) -> &str {
    let Some(precision) = o_precision else {
        return name;
    };
    let separator = if name.contains("::") { "::" } else { "." };
    let mut end = name.len();
    for _ in 0..precision {
        match name[..end].rfind(separator) {
            Some(idx) => end = idx,
            None => return name,
        }
    }
    &name[end + separator.len()..]
}
