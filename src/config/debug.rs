//! Debugging feature flags.

pub struct LogFlags {
    /// Activate trace_time macro (for scope-level timing)
    pub log_performance: bool,

    /// Log merge summaries (source counts, global timeline length)
    pub log_merge: bool,

    /// Log plot pass decisions (parallel vs sequential, segment sizes)
    pub log_plot: bool,
}

pub const DEBUG_FLAGS: LogFlags = LogFlags {
    log_performance: true,
    log_merge: true,
    log_plot: true,
};
