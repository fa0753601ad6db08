//! rShiftClock main entrypoint.

use rshiftclock::run;
use rshiftclock::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
