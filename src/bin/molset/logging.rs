use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects debug and `-vv` trace
/// for this crate, and warnings are shown by default.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => "warn",
            1 => "molset=debug",
            _ => "molset=trace",
        };
        EnvFilter::new(level)
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
