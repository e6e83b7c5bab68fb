use clap::{Parser, Subcommand};

/// Command-line interface definition for rOfficeTracker
/// CLI application to track time spent at the office, manually or by geofence
#[derive(Parser)]
#[command(
    name = "rofficetracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track office presence (manual or GPS geofence) against a 9h workday, with daily history in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Enable debug logging on stderr
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        /// Print the current configuration to stdout
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        /// Edit the configuration file with your preferred editor
        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        /// Specify the editor to use (overrides $EDITOR/$VISUAL).
        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "last", help = "Only show the most recent N rows")]
        last: Option<usize>,
    },

    /// Complete the initial setup: office coordinates, current position, or skip
    Setup {
        /// Office latitude in degrees
        #[arg(long, allow_negative_numbers = true, requires = "lng")]
        lat: Option<f64>,

        /// Office longitude in degrees
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,

        /// Geofence radius in meters (default from config)
        #[arg(long, allow_negative_numbers = true)]
        radius: Option<f64>,

        /// Office display name
        #[arg(long)]
        name: Option<String>,

        /// Use the first position fix read from --samples (or stdin) as the office
        #[arg(long, conflicts_with_all = ["lat", "lng", "skip"])]
        here: bool,

        /// JSON-lines file with position readings for --here ('-' = stdin)
        #[arg(long, value_name = "FILE", requires = "here")]
        samples: Option<String>,

        /// Finish setup without an office location (manual mode)
        #[arg(long, conflicts_with_all = ["lat", "lng", "radius", "name"])]
        skip: bool,
    },

    /// Switch tracking mode: gps or manual
    Mode {
        /// gps (alias: auto) or manual
        mode: String,
    },

    /// Start a session now
    Start,

    /// Stop the running session and record it in the history
    Stop,

    /// Show the current session, progress and office settings
    Status,

    /// Show recorded sessions
    History {
        #[arg(long, default_value_t = 7, help = "Number of most recent entries to show")]
        last: usize,

        #[arg(long, conflicts_with = "last", help = "Show the whole history")]
        all: bool,
    },

    /// Show, toggle or set the geofence radius
    Radius {
        #[arg(long, conflicts_with = "set", help = "Toggle between the default and alternate radius")]
        toggle: bool,

        #[arg(
            long,
            value_name = "METERS",
            allow_negative_numbers = true,
            help = "Set the radius in meters"
        )]
        set: Option<f64>,
    },

    /// Feed a single position reading (or a position error) to the tracker
    Sample {
        #[arg(long, allow_negative_numbers = true, required_unless_present = "error")]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, required_unless_present = "error")]
        lng: Option<f64>,

        /// Reported accuracy in meters
        #[arg(long, default_value_t = 0.0)]
        accuracy: f64,

        /// Report a sampling error instead of a fix
        #[arg(long, value_name = "MSG", conflicts_with_all = ["lat", "lng"])]
        error: Option<String>,
    },

    /// Run the tracking loop on a stream of position readings
    Watch {
        /// JSON-lines file with position readings ('-' = stdin, default)
        #[arg(long, value_name = "FILE")]
        samples: Option<String>,

        /// Stop after N clock ticks
        #[arg(long)]
        ticks: Option<u64>,

        /// Pause between replayed readings, in milliseconds
        #[arg(long = "interval-ms", default_value_t = 0)]
        interval_ms: u64,

        /// Keep the clock running after the readings are exhausted
        #[arg(long)]
        follow: bool,
    },

    /// Erase history, office location and setup (irreversible)
    Reset {
        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}
