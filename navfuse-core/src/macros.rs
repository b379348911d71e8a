// Logging goes through the `log` facade when it is enabled and compiles away
// otherwise, so the run path stays free of formatting on bare targets.

#[cfg(feature = "log")]
macro_rules! est_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! est_trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! est_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! est_debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! est_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! est_info {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! est_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! est_warn {
    ($($arg:tt)*) => {{}};
}
