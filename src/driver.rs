use itertools::Itertools;
use wardrobe::LayeredMap;
use crate::cli_args::CliArgs;
use crate::error::{Error, Result};
use crate::script::{Command, Parser, ScriptResult, SourceFile, Statement};

pub struct Driver {
    args: CliArgs,
    source: SourceFile,
}

impl Driver {
    fn new(args: CliArgs) -> Self {
        let source = SourceFile::from(args.input.clone());
        Self { args, source }
    }

    pub fn run(args: CliArgs) -> Result<()> {
        let driver = Self::new(args);

        let statements = driver.parse()?;
        let map = driver.execute(&statements)?;

        if map.depth() > 0 {
            let msg = format!("script ended with {} layer{} still open", map.depth(), if map.depth() > 1 { "s" } else { "" });
            crate::log::warn(msg).with_file(&driver.source).print();
        }

        if driver.args.print_state {
            println!("{}", format_entries(&map));
        }

        Ok(())
    }

    fn parse(&self) -> Result<Vec<Statement>> {
        let text = self.source.read_to_string()?;

        let mut parser = Parser::new(self.source.clone());
        let statements = parser.parse(&text);

        if parser.has_errors() {
            return Err(Error::StageError(parser.error_count()));
        }

        ::log::debug!("parsed {} statement(s) from {}", statements.len(), self.source);
        Ok(statements)
    }

    fn execute(&self, statements: &[Statement]) -> Result<LayeredMap<String, String>> {
        let mut error_count = 0usize;
        let mut map = LayeredMap::new();

        for stmt in statements {
            ::log::trace!("{}: {}", stmt.span, stmt.command.name());

            match self.apply(&mut map, &stmt.command) {
                Ok(Some(output)) => println!("{output}"),
                Ok(None) => {}
                Err(e) => {
                    crate::log::error(e).with_span(&stmt.span, &self.source).print();
                    error_count += 1;

                    if !self.args.keep_going {
                        break;
                    }
                }
            }
        }

        if error_count != 0 {
            return Err(Error::StageError(error_count));
        }

        Ok(map)
    }

    /// Runs one command, returning the line to print, if any.
    fn apply(&self, map: &mut LayeredMap<String, String>, command: &Command) -> ScriptResult<Option<String>> {
        let output = match command {
            Command::Set(key, value) => {
                map.set(key.clone(), value.clone());
                None
            }
            Command::Get(key) => Some(format!("{key} = {}", map.get(key.as_str())?)),
            Command::Delete(key) => {
                map.delete(key.as_str())?;
                None
            }
            Command::Has(key) => Some(map.has(key.as_str()).to_string()),
            Command::Len => Some(map.len().to_string()),
            Command::Keys => Some(map.keys().into_iter().sorted().join(", ")),
            Command::Dump => Some(format_entries(map)),
            Command::Update(sources) => {
                map.update_from_sources(sources.clone())?;
                None
            }
            Command::Commit => {
                map.commit();
                None
            }
            Command::Reset => {
                let changes = map.reset()?;
                self.args.print_changes.then(|| {
                    let changes = changes.iter()
                        .sorted()
                        .map(|(key, value)| format!("{key}={value}"))
                        .join(", ");
                    format!("reset: {{{changes}}}")
                })
            }
            Command::Clear => {
                map.clear();
                None
            }
            Command::Depth => Some(map.depth().to_string()),
        };

        Ok(output)
    }
}

fn format_entries(map: &LayeredMap<String, String>) -> String {
    let entries = map.iter()
        .sorted()
        .map(|(key, value)| format!("{key}={value}"))
        .join(", ");
    format!("{{{entries}}}")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use super::*;
    use crate::script::ScriptError;
    use wardrobe::MapError;

    fn driver(print_changes: bool) -> Driver {
        Driver::new(CliArgs {
            input: PathBuf::from("test.wd"),
            print_state: false,
            print_changes,
            keep_going: false,
        })
    }

    fn run(driver: &Driver, map: &mut LayeredMap<String, String>, commands: Vec<Command>) -> Vec<String> {
        commands.iter()
            .filter_map(|command| driver.apply(map, command).unwrap())
            .collect()
    }

    #[test]
    fn commands_drive_the_map() {
        let driver = driver(true);
        let mut map = LayeredMap::new();
        let output = run(&driver, &mut map, vec![
            Command::Update(vec![vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]]),
            Command::Commit,
            Command::Set("a".to_string(), "A".to_string()),
            Command::Set("c".to_string(), "3".to_string()),
            Command::Get("a".to_string()),
            Command::Keys,
            Command::Depth,
            Command::Reset,
            Command::Dump,
            Command::Has("c".to_string()),
            Command::Len,
        ]);

        assert_eq!(output, vec![
            "a = A",
            "a, b, c",
            "1",
            "reset: {a=A, c=3}",
            "{a=1, b=2}",
            "false",
            "2",
        ]);
    }

    #[test]
    fn reset_is_silent_without_print_changes() {
        let driver = driver(false);
        let mut map = LayeredMap::new();
        let output = run(&driver, &mut map, vec![Command::Commit, Command::Clear, Command::Reset]);
        assert!(output.is_empty());
    }

    #[test]
    fn map_errors_surface_as_script_errors() {
        let driver = driver(false);
        let mut map = LayeredMap::new();

        let err = driver.apply(&mut map, &Command::Get("x".to_string())).unwrap_err();
        assert!(matches!(err, ScriptError::Map(MapError::KeyNotFound(key)) if key == "x"));

        let err = driver.apply(&mut map, &Command::Reset).unwrap_err();
        assert!(matches!(err, ScriptError::Map(MapError::NoOpenLayer)));

        let sources = vec![vec![("a".to_string(), "1".to_string())], vec![]];
        let err = driver.apply(&mut map, &Command::Update(sources)).unwrap_err();
        assert_eq!(err.to_string(), "update expected at most 1 source, got 2");
        assert!(map.is_empty());
    }
}
