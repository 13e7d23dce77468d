use client_serve::handler::StaticFiles;
use client_serve::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    server::run("Static file server", |cfg| StaticFiles::new(&cfg.static_files))
}
