fn main() {
    if let Err(e) = dentaldesk_lib::run() {
        eprintln!("dentaldesk: {e}");
        std::process::exit(1);
    }
}
