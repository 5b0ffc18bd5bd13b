use std::fmt::{Debug, Display, Formatter};
use std::io::Write;
use std::rc::Rc;
use env_logger::fmt::style::{AnsiColor, Style};
use log::{Level, LevelFilter};
use crate::script::{SourceFile, Span};

/// Sets up `env_logger`; `RUST_LOG` overrides the default `info` level.
pub fn init() {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();
    builder.format(|fmt, record| {
        let level = {
            let style = fmt.default_level_style(record.level());
            let level_str = record.level().as_str().to_lowercase();
            format!("{style}{level_str}{style:#}")
        };
        let msg = {
            let style = Style::new().bold();
            format!("{style}{}{style:#}", record.args())
        };
        writeln!(fmt, "{level}: {msg}")
    });
    builder.init();
}

pub fn error<M: LogMsg + 'static>(msg: M) -> LogBuilder {
    LogBuilder::new(Level::Error, msg)
}

pub fn warn<M: LogMsg + 'static>(msg: M) -> LogBuilder {
    LogBuilder::new(Level::Warn, msg)
}

pub struct LogBuilder {
    log: Log,
}

impl LogBuilder {
    fn new<M: LogMsg + 'static>(level: Level, msg: M) -> Self {
        Self {
            log: Log { level, msg: Rc::new(msg), span: None, file: None },
        }
    }

    pub fn with_span(mut self, span: &Span, source: &SourceFile) -> Self {
        self.log.span = Some(span.clone());
        self.log.file = Some(source.clone());
        self
    }

    pub fn with_file(mut self, source: &SourceFile) -> Self {
        self.log.file = Some(source.clone());
        self
    }

    #[inline]
    pub fn print(self) { self.log.print(); }

    #[inline]
    pub fn into_result<T>(self) -> Result<T, Log> { Err(self.log) }
}

pub trait LogMsg: Display + Debug {}
impl<T: Display + Debug> LogMsg for T {}

#[derive(Clone)]
pub struct Log {
    pub level: Level,
    pub msg: Rc<dyn LogMsg>,
    pub span: Option<Span>,
    pub file: Option<SourceFile>,
}

impl Log {
    #[inline]
    pub fn print(self) {
        log::log!(self.level, "{self}");
    }

    /// The script line under `span`, with `^` markers below the span.
    fn snippet(span: &Span, file: &SourceFile) -> String {
        let Ok(line) = span.with_file(file).read_line() else {
            return String::new();
        };

        let blue = Style::new().fg_color(Some(AnsiColor::BrightBlue.into())).bold();
        let yellow = Style::new().fg_color(Some(AnsiColor::Yellow.into())).bold();

        let line_num = span.start.line.to_string();
        let gutter = " ".repeat(line_num.len());
        let col_pad = " ".repeat(span.start.col.saturating_sub(1));
        let marker = "^".repeat(span.len.max(1));

        format!("\n{blue} {gutter} |\n {line_num} |{blue:#} {line}\n{blue} {gutter} |{blue:#} {col_pad}{yellow}{marker}{yellow:#}")
    }
}

impl Debug for Log {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let span = self.span.as_ref()
            .map(|span| format!("{span}: "))
            .unwrap_or_default();
        write!(f, "[{}] {span}{}", &self.level, &self.msg)
    }
}

impl Display for Log {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg)?;

        let Some(file) = &self.file else {
            return Ok(());
        };
        let arrow = Style::new().fg_color(Some(AnsiColor::BrightBlue.into())).bold();

        match &self.span {
            Some(span) => {
                let snippet = Self::snippet(span, file);
                write!(f, "\n {arrow}-->{arrow:#} {}:{span}{snippet}", file.display())
            }
            None => write!(f, "\n {arrow}-->{arrow:#} {}", file.display()),
        }
    }
}
