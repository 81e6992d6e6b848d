//! Logging setup using **tracing**.
//!
//! All narration goes to stderr so stdout stays clean for the nay list. The
//! default level is `warn`; `--verbose` raises it to `info`, which narrates
//! every step of the analysis. `RUST_LOG` overrides both.

use tracing_subscriber::EnvFilter;

/// How the global subscriber formats events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Narrate progress (info level)
    pub verbose: bool,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl LogOptions {
    /// Filter directive used when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Initializes the global tracing subscriber.
///
/// This should be called *once* at the beginning of the application's runtime.
/// Later calls are ignored.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=naylist_core=debug`)
pub fn init_logging(options: LogOptions) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(options.filter())
        .with_writer(std::io::stderr);

    let result = if options.json {
        builder
            .json()
            .with_ansi(false)
            .with_level(true)
            .with_target(true)
            .with_current_span(true)
            .try_init()
    } else {
        builder
            .without_time()
            .with_level(false)
            .with_target(false)
            .try_init()
    };

    // A subscriber installed earlier (tests, embedding applications) wins.
    let _ = result;
}
