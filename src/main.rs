use crate::driver::Driver;

mod cli_args;
mod driver;
mod error;
mod log;
mod script;

fn main() {
    log::init();

    let args = cli_args::parse();

    if let Err(e) = Driver::run(args) {
        log::error(e).print();
        std::process::exit(1);
    }
}
