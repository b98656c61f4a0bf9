use std::io::{self, BufRead};

use nmea0183_navdata::NavigationEngine;

fn main() -> io::Result<()> {
    env_logger::init();

    let mut engine = NavigationEngine::new();
    let (mut parsed, mut failed) = (0usize, 0usize);

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = engine.process_line(&line);
        if record.is_ok() {
            parsed += 1;
        } else {
            failed += 1;
        }

        println!("{}", record.report());
    }

    println!("Parsed {parsed} lines, {failed} failed");
    Ok(())
}
