//! Logging macros that capture the call site.
//!
//! These wrap [`EnvLog::log_with_size_formatted`](crate::EnvLog::log_with_size_formatted)
//! (or the same method on [`AddonBootstrapLog`](crate::AddonBootstrapLog))
//! and fill in the enclosing function, file and line.
//!
//! # Examples
//!
//! ```
//! use runtime_env_log::prelude::*;
//! use runtime_env_log::{env_info, env_log, env_warn};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let env = EnvHandle::new("ext_a");
//! let log = EnvLog::with_dispatcher(&env, SinkDispatcher::to_sink(sink.clone()));
//!
//! env_info!(log, "Server listening on port {}", 8080);
//! env_warn!(log, category = "disk", "Low disk space");
//! env_log!(log, LogLevel::Error, "Error code: {}", 500);
//!
//! assert_eq!(sink.len(), 3);
//! assert_eq!(sink.records()[1].category(), Some("disk"));
//! ```

/// Name of the enclosing function, without its module path.
///
/// Inside closures this is still the function that defines them.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let path = __type_name_of(__here);
        let mut path = path.strip_suffix("::__here").unwrap_or(path);
        while let Some(outer) = path.strip_suffix("::{{closure}}") {
            path = outer;
        }
        match path.rfind("::") {
            Some(pos) => &path[pos + 2..],
            None => path,
        }
    }};
}

/// [`Location`](crate::Location) of the macro call site
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new($crate::function_name!(), file!(), line!())
    };
}

/// Log a formatted message at the given level.
///
/// ```
/// # use runtime_env_log::prelude::*;
/// # use std::sync::Arc;
/// # let sink = Arc::new(MemorySink::new());
/// # let env = EnvHandle::new("ext_a");
/// # let log = EnvLog::with_dispatcher(&env, SinkDispatcher::to_sink(sink.clone()));
/// use runtime_env_log::env_log;
/// env_log!(log, LogLevel::Info, "Simple message");
/// env_log!(log, LogLevel::Error, category = "net", "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! env_log {
    ($log:expr, $level:expr, category = $category:expr, $($arg:tt)+) => {
        $log.log_with_size_formatted(
            $level,
            &$crate::location!(),
            ::std::option::Option::Some($category),
            ::std::option::Option::None,
            format_args!($($arg)+),
        )
    };
    ($log:expr, $level:expr, $($arg:tt)+) => {
        $log.log_with_size_formatted(
            $level,
            &$crate::location!(),
            ::std::option::Option::None,
            ::std::option::Option::None,
            format_args!($($arg)+),
        )
    };
}

#[macro_export]
macro_rules! env_trace {
    ($log:expr, $($arg:tt)+) => {
        $crate::env_log!($log, $crate::LogLevel::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! env_debug {
    ($log:expr, $($arg:tt)+) => {
        $crate::env_log!($log, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! env_info {
    ($log:expr, $($arg:tt)+) => {
        $crate::env_log!($log, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! env_warn {
    ($log:expr, $($arg:tt)+) => {
        $crate::env_log!($log, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! env_error {
    ($log:expr, $($arg:tt)+) => {
        $crate::env_log!($log, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Fatal severity only; it does not stop the process.
#[macro_export]
macro_rules! env_fatal {
    ($log:expr, $($arg:tt)+) => {
        $crate::env_log!($log, $crate::LogLevel::Fatal, $($arg)+)
    };
}
