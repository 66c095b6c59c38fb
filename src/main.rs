fn main() {
    if let Err(e) = safelens::run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
