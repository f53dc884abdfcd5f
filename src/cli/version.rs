/// Display version information
pub fn execute() {
    println!("groupsync {}", env!("CARGO_PKG_VERSION"));
    println!("Telegram group membership bridge");
}
