//! List the root filesystem as seen from PID 1's mount namespace
//!
//! Run as root: sudo cargo run --example basic_usage

use nsjoin_nsenter::Configuration;

fn main() {
    tracing_subscriber::fmt::init();

    let config = Configuration {
        target: 1,
        mount: true,
        ..Default::default()
    };

    match config.execute("ls", ["-la"]) {
        Ok(output) => {
            println!("{}", output.stdout);
            println!("{}", output.stderr);
        }
        Err(e) => {
            println!("{}", e.stdout());
            println!("{}", e.stderr());
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    }
}
