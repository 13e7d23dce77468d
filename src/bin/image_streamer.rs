use client_serve::handler::ImageStream;
use client_serve::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    server::run("Image streamer", |cfg| ImageStream::new(&cfg.image))
}
