use std::fs;

use clap::Parser;
use night::Context;

/// night runs programs written in the Night language: a small dynamically
/// typed imperative language with arrays, loops, and functions.
#[derive(Parser, Debug)]
#[command(name = "night", version, about, long_about = None)]
struct Args {
    /// Path of the script to execute.
    file: String,

    /// Also print the internal representation of any error (a developer
    /// aid).
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    let source = fs::read_to_string(&args.file).unwrap_or_else(|_| {
                                                   eprintln!("file '{}' could not be opened",
                                                             args.file);
                                                   std::process::exit(1);
                                               });

    let mut context = Context::new();
    if let Err(e) = night::run_source(&source, &args.file, &mut context) {
        eprintln!("{e}");
        if args.debug {
            eprintln!("{e:?}");
        }
        std::process::exit(1);
    }
}
