use wardrobe::MapError;

pub type ScriptResult<T> = Result<T, ScriptError>;

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("'{cmd}' expects {expected} argument{}, got {got}", if *.expected == 1 { "" } else { "s" })]
    ArgumentCount { cmd: &'static str, expected: usize, got: usize },

    #[error("invalid entry '{0}'; expected KEY=VALUE")]
    InvalidEntry(String),

    #[error(transparent)]
    Map(#[from] MapError<String>),
}
