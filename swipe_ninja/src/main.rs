//! swipe_ninja — interactive entry point.

use log::error;
use swipe_ninja::{app, cli, logging};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Swipe Ninja — slice the falling fruit           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse simulation  (use --features leap for hardware)");
    println!();

    let cfg = match cli::parse_args(std::env::args().skip(1)) {
        Ok(c)  => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = logging::setup(cfg.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = app::run(cfg) {
        error!("{}", e);
        std::process::exit(1);
    }
}
