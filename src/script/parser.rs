use crate::log::Log;
use crate::script::{Command, Entries, FilePos, ScriptError, SourceFile, Span};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Statement {
    pub command: Command,
    pub span: Span,
}

#[derive(Debug, Clone)]
struct Word<'a> {
    text: &'a str,
    span: Span,
}

pub struct Parser {
    source: SourceFile,
    error_count: usize,
}

impl Parser {
    pub fn new(source: SourceFile) -> Self {
        Self { source, error_count: 0 }
    }

    /// Parses every line of `text`, reporting and skipping the invalid ones.
    pub fn parse(&mut self, text: &str) -> Vec<Statement> {
        let mut statements = vec![];

        for (idx, line) in text.lines().enumerate() {
            let words = split_words(line, idx + 1);
            match words.first() {
                None => continue,
                Some(word) if word.text.starts_with('#') => continue,
                Some(_) => {}
            }

            match self.parse_statement(&words) {
                Ok(stmt) => statements.push(stmt),
                Err(log) => {
                    self.error_count += 1;
                    log.print();
                }
            }
        }

        statements
    }

    fn parse_statement(&self, words: &[Word]) -> Result<Statement, Log> {
        let Some((cmd, args)) = words.split_first() else {
            unreachable!("blank lines are skipped before parsing!")
        };
        let span = match words.last() {
            Some(last) => cmd.span.to(&last.span),
            None => cmd.span.clone(),
        };

        let command = match cmd.text {
            "set" => {
                let [key, value] = self.expect_args::<2>("set", args, &span)?;
                Command::Set(key.text.to_string(), value.text.to_string())
            }
            "get" => {
                let [key] = self.expect_args::<1>("get", args, &span)?;
                Command::Get(key.text.to_string())
            }
            "delete" => {
                let [key] = self.expect_args::<1>("delete", args, &span)?;
                Command::Delete(key.text.to_string())
            }
            "has" => {
                let [key] = self.expect_args::<1>("has", args, &span)?;
                Command::Has(key.text.to_string())
            }
            "update" => {
                let sources = args.iter()
                    .map(|group| self.parse_entries(group))
                    .collect::<Result<Vec<_>, _>>()?;
                Command::Update(sources)
            }
            "len" => self.expect_args::<0>("len", args, &span).map(|_| Command::Len)?,
            "keys" => self.expect_args::<0>("keys", args, &span).map(|_| Command::Keys)?,
            "dump" => self.expect_args::<0>("dump", args, &span).map(|_| Command::Dump)?,
            "commit" => self.expect_args::<0>("commit", args, &span).map(|_| Command::Commit)?,
            "reset" => self.expect_args::<0>("reset", args, &span).map(|_| Command::Reset)?,
            "clear" => self.expect_args::<0>("clear", args, &span).map(|_| Command::Clear)?,
            "depth" => self.expect_args::<0>("depth", args, &span).map(|_| Command::Depth)?,
            other => return self.error(ScriptError::UnknownCommand(other.to_string()), &cmd.span),
        };

        Ok(Statement { command, span })
    }

    fn expect_args<'w, 'a, const N: usize>(&self, cmd: &'static str, args: &'w [Word<'a>], span: &Span) -> Result<&'w [Word<'a>; N], Log> {
        match args.try_into() {
            Ok(args) => Ok(args),
            Err(_) => self.error(ScriptError::ArgumentCount { cmd, expected: N, got: args.len() }, span),
        }
    }

    /// Parses one `K=V[,K=V...]` group.
    fn parse_entries(&self, group: &Word) -> Result<Entries, Log> {
        group.text.split(',')
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('=') {
                Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
                _ => self.error(ScriptError::InvalidEntry(entry.to_string()), &group.span),
            })
            .collect()
    }

    fn error<T>(&self, e: ScriptError, span: &Span) -> Result<T, Log> {
        crate::log::error(e).with_span(span, &self.source).into_result()
    }

    #[inline]
    pub fn has_errors(&self) -> bool { self.error_count != 0 }
    #[inline]
    pub fn error_count(&self) -> usize { self.error_count }
}

fn split_words(line: &str, line_num: usize) -> Vec<Word<'_>> {
    let mut words = vec![];
    // (byte offset, char column)
    let mut start = None;

    let chars = line.char_indices().chain(std::iter::once((line.len(), ' ')));
    for (col, (idx, ch)) in chars.enumerate() {
        match (start, ch.is_whitespace()) {
            (None, false) => start = Some((idx, col)),
            (Some((begin, begin_col)), true) => {
                let span = Span::new(FilePos::new(line_num, begin_col + 1), col - begin_col);
                words.push(Word { text: &line[begin..idx], span });
                start = None;
            }
            _ => {}
        }
    }

    words
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use super::*;

    fn parse(text: &str) -> (Vec<Statement>, usize) {
        let mut parser = Parser::new(SourceFile::from(PathBuf::from("test.wd")));
        let statements = parser.parse(text);
        (statements, parser.error_count())
    }

    fn commands(text: &str) -> Vec<Command> {
        let (statements, errors) = parse(text);
        assert_eq!(errors, 0);
        statements.into_iter().map(|stmt| stmt.command).collect()
    }

    #[test]
    fn parses_commands_and_skips_comments() {
        let text = "# setup\nset a 1\n\n  get   a\ncommit\ndelete a\nreset\nhas a\nlen\nkeys\ndump\nclear\ndepth\n";
        assert_eq!(commands(text), vec![
            Command::Set("a".to_string(), "1".to_string()),
            Command::Get("a".to_string()),
            Command::Commit,
            Command::Delete("a".to_string()),
            Command::Reset,
            Command::Has("a".to_string()),
            Command::Len,
            Command::Keys,
            Command::Dump,
            Command::Clear,
            Command::Depth,
        ]);
    }

    #[test]
    fn statement_span_covers_line() {
        let (statements, _) = parse("\n  set key value");
        assert_eq!(statements[0].span, Span::new(FilePos::new(2, 3), 13));
    }

    #[test]
    fn update_keeps_each_source_group() {
        assert_eq!(commands("update a=1,b=2"), vec![
            Command::Update(vec![vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]]),
        ]);
        assert_eq!(commands("update a=1 c=3"), vec![
            Command::Update(vec![
                vec![("a".to_string(), "1".to_string())],
                vec![("c".to_string(), "3".to_string())],
            ]),
        ]);
        assert_eq!(commands("update"), vec![Command::Update(vec![])]);
    }

    #[test]
    fn invalid_lines_are_counted_and_skipped() {
        let (statements, errors) = parse("set a\nfrobnicate\nupdate a=1,=2\nget a b\ncommit 1\nlen");
        assert_eq!(errors, 5);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].command, Command::Len);
    }

    #[test]
    fn words_carry_columns() {
        let words = split_words("  set\tk  v", 7);
        let spans = words.iter()
            .map(|word| (word.text, word.span.start.col, word.span.len))
            .collect::<Vec<_>>();
        assert_eq!(spans, vec![("set", 3, 3), ("k", 7, 1), ("v", 10, 1)]);
        assert!(words.iter().all(|word| word.span.start.line == 7));
    }

    #[test]
    fn columns_count_chars_not_bytes() {
        let words = split_words("set clé été", 1);
        let spans = words.iter()
            .map(|word| (word.text, word.span.start.col, word.span.len))
            .collect::<Vec<_>>();
        assert_eq!(spans, vec![("set", 1, 3), ("clé", 5, 3), ("été", 9, 3)]);
    }
}
