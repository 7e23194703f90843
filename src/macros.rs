// Diagnostics go through `log` only when `verbose-logging` is enabled. The
// disabled expansion still type-checks its arguments so call sites do not
// produce unused-variable warnings.

#[cfg(feature = "verbose-logging")]
macro_rules! emd_log {
    ($lvl:ident, $($arg:tt)+) => {
        log::$lvl!($($arg)+)
    };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! emd_log {
    ($lvl:ident, $($arg:tt)+) => {
        if false {
            let _ = core::format_args!($($arg)+);
        }
    };
}
