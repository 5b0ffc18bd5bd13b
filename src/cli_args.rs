use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Script to run against an empty map
    #[arg(required = true)]
    pub input: PathBuf,

    /// Print the visible entries once the script is done
    #[arg(long)]
    pub print_state: bool,

    /// Print the changes returned by every reset
    #[arg(long)]
    pub print_changes: bool,

    /// Keep running after a failing command
    #[arg(short, long)]
    pub keep_going: bool,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use super::*;

    #[test]
    fn args_are_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn flags_default_off() {
        let args = CliArgs::try_parse_from(["wardrobe", "layers.wd", "-k"]).unwrap();
        assert_eq!(args.input, PathBuf::from("layers.wd"));
        assert!(args.keep_going);
        assert!(!args.print_state);
        assert!(!args.print_changes);
    }
}
