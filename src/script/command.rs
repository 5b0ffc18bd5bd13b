pub type Entries = Vec<(String, String)>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    Set(String, String),
    Get(String),
    Delete(String),
    Has(String),
    Len,
    Keys,
    Dump,
    /// One entry group per source; more than one is rejected when run.
    Update(Vec<Entries>),
    Commit,
    Reset,
    Clear,
    Depth,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set(..) => "set",
            Command::Get(_) => "get",
            Command::Delete(_) => "delete",
            Command::Has(_) => "has",
            Command::Len => "len",
            Command::Keys => "keys",
            Command::Dump => "dump",
            Command::Update(_) => "update",
            Command::Commit => "commit",
            Command::Reset => "reset",
            Command::Clear => "clear",
            Command::Depth => "depth",
        }
    }
}
