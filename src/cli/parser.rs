use clap::{Parser, Subcommand};

/// Command-line interface definition for rShiftClock
#[derive(Parser)]
#[command(
    name = "rshiftclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "A shift stopwatch: start/stop a work shift and review this week's start/end times",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Run the interactive stopwatch
    ///
    /// Enter toggles start/stop, `r` resets, `h` shows the week, `q` quits.
    Start,

    /// Show the current week's shifts (latest shift per day)
    History {
        #[arg(long = "json", help = "Print the weekday → interval mapping as JSON")]
        json: bool,

        #[arg(long = "all-days", help = "Include Saturday and Sunday")]
        all_days: bool,
    },

    /// Show the most recently recorded shift
    Last,

    /// Delete shifts that began before a date
    Prune {
        #[arg(long = "before", value_name = "YYYY-MM-DD", help = "Delete shifts dated before this day")]
        before: String,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },
}
