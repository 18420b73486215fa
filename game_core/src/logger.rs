use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter, Write};
use std::io::IsTerminal;

use chrono::Local;
use parking_lot::RwLock;
use tracing::field::{Field, Visit};
use tracing::metadata::LevelFilter;
use tracing::span::{Attributes, Record};
use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing::{Event, Id, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Installs the [`Logger`] as the global default subscriber.
///
/// The `RUST_LOG` environment variable takes precedence over `level`. If
/// neither is given, the level defaults to `INFO`.
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
pub fn init(level: Option<LevelFilter>) -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::registry().with(Logger::new(level));
    set_global_default(subscriber)
}

/// Parses a level name as accepted in `RUST_LOG` or the config file.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level {
        "error" | "ERROR" => Some(LevelFilter::ERROR),
        "warn" | "WARN" => Some(LevelFilter::WARN),
        "info" | "INFO" => Some(LevelFilter::INFO),
        "debug" | "DEBUG" => Some(LevelFilter::DEBUG),
        "trace" | "TRACE" => Some(LevelFilter::TRACE),
        "off" | "OFF" => Some(LevelFilter::OFF),
        _ => None,
    }
}

/// A [`Layer`] printing events to stdout, prefixed with the enclosing span
/// and its recorded fields.
#[derive(Debug)]
pub struct Logger {
    spans: RwLock<HashMap<Id, SpanDetails>>,
    is_tty: bool,
    level: LevelFilter,
}

impl Logger {
    pub fn new(level: Option<LevelFilter>) -> Self {
        let level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|e| parse_level(&e))
            .or(level)
            .unwrap_or(LevelFilter::INFO);

        Self {
            spans: RwLock::new(HashMap::new()),
            is_tty: std::io::stdout().is_terminal(),
            level,
        }
    }

    #[inline]
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    fn log<T>(&self, meta: &Metadata<'_>, span: Option<&SpanDetails>, content: T)
    where
        T: Display,
    {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S:%f");

        let (level, color) = match *meta.level() {
            Level::ERROR => ("ERROR", Color::RED),
            Level::WARN => ("WARN", Color::YELLOW),
            Level::INFO => ("INFO", Color::GREEN),
            Level::DEBUG => ("DEBUG", Color::LIGHT_GRAY_BOLD),
            Level::TRACE => ("TRACE", Color::LIGHT_GRAY_BOLD),
        };

        let target = meta.target();
        let scope = match span {
            Some(span) if span.fields.is_empty() => format!(" {}:", span.name),
            Some(span) => format!(" {}{{{}}}:", span.name, span.fields),
            None => String::new(),
        };

        if self.is_tty {
            let now = ColorText::new(format!("[{}]", now), Color::LIGHT_GRAY);
            let level = ColorText::new(level, color);
            let target = ColorText::new(target, Color::LIGHT_GRAY);

            println!("{} {} {}{} {}", now, level, target, scope, content);
        } else {
            println!("[{}] {} {}{} {}", now, level, target, scope, content);
        }
    }
}

impl<S> Layer<S> for Logger
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.level
    }

    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut visitor = Visitor::new();
        attrs.record(&mut visitor);

        self.spans.write().insert(
            id.clone(),
            SpanDetails {
                name: attrs.metadata().name(),
                fields: visitor.buf,
            },
        );
    }

    fn on_record(&self, span: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut visitor = Visitor::new();
        values.record(&mut visitor);

        if let Some(details) = self.spans.write().get_mut(span) {
            if !details.fields.is_empty() && !visitor.buf.is_empty() {
                details.fields.push_str(", ");
            }

            details.fields.push_str(&visitor.buf);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if *event.metadata().level() > self.level {
            return;
        }

        let mut visitor = Visitor::new();
        event.record(&mut visitor);

        let spans = self.spans.read();
        let current = ctx.current_span();
        let span = current.id().and_then(|id| spans.get(id));

        self.log(event.metadata(), span, visitor);
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        self.spans.write().remove(&id);
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(self.level)
    }
}

#[derive(Clone, Debug)]
struct SpanDetails {
    name: &'static str,
    fields: String,
}

struct Visitor {
    buf: String,
}

impl Visitor {
    fn new() -> Self {
        Self {
            buf: String::with_capacity(32),
        }
    }
}

impl Visit for Visitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if !self.buf.is_empty() {
            self.buf.push_str(", ");
        }

        let _ = match field.name() {
            "message" => write!(self.buf, "{:?}", value),
            _ => write!(self.buf, "{} = {:?}", field, value),
        };
    }
}

impl Display for Visitor {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.buf, f)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct Color([u8; 2]);

impl Color {
    // Bold
    pub const RED: Self = Self([1, 31]);
    pub const YELLOW: Self = Self([1, 33]);
    pub const GREEN: Self = Self([1, 32]);
    pub const LIGHT_GRAY_BOLD: Self = Self([1, 37]);

    pub const LIGHT_GRAY: Self = Self([2, 37]);
}

struct ColorText<T>
where
    T: Display,
{
    text: T,
    color: Color,
}

impl<T> ColorText<T>
where
    T: Display,
{
    fn new(text: T, color: Color) -> Self {
        Self { text, color }
    }
}

impl<T> Display for ColorText<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\x1b[{};{}m{}\x1b[0m",
            self.color.0[0], self.color.0[1], self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use tracing::metadata::LevelFilter;

    use super::parse_level;

    #[test]
    fn parse_level_names() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level("WARN"), Some(LevelFilter::WARN));
        assert_eq!(parse_level("off"), Some(LevelFilter::OFF));
        assert_eq!(parse_level("verbose"), None);
    }
}
