use std::time::Duration;

/// How many entries pass between progress reports.
pub const REPORT_INTERVAL: usize = 100;

/// Receives periodic progress callbacks while a directory is loading.
pub trait ProgressSink {
    fn report(&mut self, count: usize, elapsed: Duration);
}

/// Default sink: prints `count elapsed_seconds` to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn report(&mut self, count: usize, elapsed: Duration) {
        println!("{count} {:.3}", elapsed.as_secs_f64());
    }
}
