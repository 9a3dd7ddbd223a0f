//! field_replay — run a recorded fingertip trace through the fruit field
//! and print every slice.
//!
//! ```text
//! field_replay [TRACE] [--seed N] [--width N] [--height N]
//! ```
//!
//! Reads the trace from `TRACE`, or stdin when omitted.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use fruit_field::replay::{first_slice_tick, sliced_ids};
use fruit_field::{FieldConfig, FruitField, GestureTracker, Replay, ReplaySummary, RngSpawn};

struct Args {
    path:   Option<String>,
    seed:   u64,
    width:  usize,
    height: usize,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args { path: None, seed: 0, width: 640, height: 480 };
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        let mut value = |name: &str| {
            it.next()
                .ok_or_else(|| format!("{} needs a value", name))
                .and_then(|v| v.parse::<u64>().map_err(|e| format!("{} {:?}: {}", name, v, e)))
        };
        match a.as_str() {
            "--seed"   => args.seed   = value("--seed")?,
            "--width"  => args.width  = value("--width")? as usize,
            "--height" => args.height = value("--height")? as usize,
            _ if a.starts_with("--") => return Err(format!("unknown flag {}", a)),
            _ => args.path = Some(a.clone()),
        }
    }
    Ok(args)
}

fn print_summary(s: &ReplaySummary) {
    for (tick, ev) in &s.slices {
        println!("  tick {:>5}  SLICED fruit #{:<4} at ({:.0}, {:.0})",
                 tick, ev.fruit_id, ev.position.x, ev.position.y);
    }
    println!();
    println!("  ticks     : {}", s.ticks);
    println!("  swipes    : {}", s.swipes);
    println!("  spawned   : {}", s.spawned);
    println!("  sliced    : {}  {:?}", s.sliced, sliced_ids(s));
    println!("  expired   : {}", s.expired);
    println!("  remaining : {}", s.remaining);
    if let Some(t) = first_slice_tick(s) {
        println!("  first slice on tick {}", t);
    }
}

fn main() {
    let args = match parse_args() {
        Ok(a)  => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("usage: field_replay [TRACE] [--seed N] [--width N] [--height N]");
            std::process::exit(2);
        }
    };

    let reader: Box<dyn BufRead> = match &args.path {
        Some(p) => match File::open(p) {
            Ok(f)  => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("Error: cannot open {}: {}", p, e);
                std::process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let field  = FruitField::new(FieldConfig::for_frame(args.width, args.height),
                                 RngSpawn::seeded(args.seed));
    let replay = Replay::new(GestureTracker::default(), field);

    match replay.run(reader) {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
