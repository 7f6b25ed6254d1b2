fn main() {
    if let Err(e) = rstnav_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
