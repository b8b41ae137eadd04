use std::env::args_os;
use std::io;
use std::process;

use mascot_bg_stripper::{strip_backgrounds, CLIParser};

fn main() {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    let mut status = io::stdout().lock();
    if let Err(e) = strip_backgrounds(&arguments, &mut status) {
        eprintln!("Background removal failed because of: {}", e);
        process::exit(1);
    }
}
