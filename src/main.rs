//! cdecl entry point: option parsing, then one command or the REPL.

fn main() {
    std::process::exit(cdecl::cli::run_cli());
}
