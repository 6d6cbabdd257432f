use std::process::exit;

fn main() {
    if let Err(e) = paperfeed::app::run_cli() {
        eprintln!("{e}");
        exit(1);
    }
}
