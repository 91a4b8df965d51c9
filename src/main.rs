use minish::error::{status, ShellError};
use minish::flags::Flags;
use minish::shell::{self, Session};
use std::env;

fn main() {
    let code = match run() {
        Ok(()) => status::SUCCESS,
        Err(e) => {
            eprintln!("minish: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<(), ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("minish {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    minish::logging::init(&flags);

    let source = shell::open_source(&flags)?;
    Session::new(source).run()
}
