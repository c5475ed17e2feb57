fn main() {
    if let Err(e) = causette::cli::main() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
