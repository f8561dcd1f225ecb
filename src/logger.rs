use chrono::Local;
use hyper::Method;
use std::net::SocketAddr;
use std::path::Path;

pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    println!("======================================");
    println!("Static asset server started");
    println!("Serving at: http://{addr}");
    println!("Reading files from: {}", root.display());
    println!("======================================\n");
}

/// Common Log Format access line
pub fn log_access(remote: &SocketAddr, method: &Method, path: &str, status: u16, bytes: usize) {
    println!(
        "{} - - [{}] \"{} {}\" {} {}",
        remote.ip(),
        Local::now().format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        path,
        status,
        bytes
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_missing_root(root: &str) {
    eprintln!("Error: '{root}' folder not found.");
    eprintln!("Build the web assets first to generate the production files.");
}

pub fn log_shutdown() {
    println!("\nServer stopped.");
}
