//! Public logging entry points for a runtime environment handle
//!
//! Two separate families exist on purpose:
//!
//! - [`EnvLog`]: refuses closed handles and requires the calling thread to
//!   own the handle. This is what every component should use.
//! - [`AddonBootstrapLog`]: skips both checks. It exists only for add-ons
//!   that have no owning thread yet and must never be chosen implicitly.
//!
//! Each family offers the direct (pre-built message) and formatted shapes,
//! with explicit-length `&str` inputs or NUL-terminated `&CStr` inputs.

use super::{
    closed_guard::{ClosedStateGuard, GuardOutcome},
    composer::MessageComposer,
    dispatcher::SinkDispatcher,
    fields::Fields,
    handle::{RuntimeEnv, ThreadCheck},
    log_level::LogLevel,
    log_record::Location,
};
use std::ffi::CStr;
use std::fmt;

/// Checked entry points: closed guard, then an enforced thread check
pub struct EnvLog<'e, E: RuntimeEnv + ?Sized> {
    env: &'e E,
    dispatcher: SinkDispatcher,
}

impl<'e, E: RuntimeEnv + ?Sized> EnvLog<'e, E> {
    /// Log through the process-wide sink
    pub fn new(env: &'e E) -> Self {
        Self::with_dispatcher(env, SinkDispatcher::global())
    }

    pub fn with_dispatcher(env: &'e E, dispatcher: SinkDispatcher) -> Self {
        Self { env, dispatcher }
    }

    pub fn env(&self) -> &'e E {
        self.env
    }

    /// Pre-built message
    pub fn log(
        &self,
        level: LogLevel,
        location: &Location<'_>,
        message: &str,
        category: Option<&str>,
        fields: Option<&Fields>,
    ) {
        if ClosedStateGuard::check(self.env, message) == GuardOutcome::Closed {
            return;
        }
        log_direct(
            self.env,
            &self.dispatcher,
            ThreadCheck::Enforced,
            level,
            location,
            message,
            category,
            fields,
        );
    }

    /// Pre-built NUL-terminated message, delivered through the plain
    /// dispatch form
    pub fn log_cstr(
        &self,
        level: LogLevel,
        location: &Location<'_>,
        message: &CStr,
        category: Option<&CStr>,
        fields: Option<&Fields>,
    ) {
        if ClosedStateGuard::check(self.env, message.to_string_lossy()) == GuardOutcome::Closed {
            return;
        }
        log_cstr_direct(
            self.env,
            &self.dispatcher,
            ThreadCheck::Enforced,
            level,
            location,
            message,
            category,
            fields,
        );
    }

    /// Formatted message; function and file lengths come from their
    /// NUL terminators
    #[allow(clippy::too_many_arguments)]
    pub fn log_formatted(
        &self,
        level: LogLevel,
        function: &CStr,
        file: &CStr,
        line: u32,
        category: Option<&str>,
        fields: Option<&Fields>,
        args: fmt::Arguments<'_>,
    ) {
        if ClosedStateGuard::check(self.env, args) == GuardOutcome::Closed {
            return;
        }
        let location = Location::from_c(function, file, line);
        log_formatted_sized(
            self.env,
            &self.dispatcher,
            ThreadCheck::Enforced,
            level,
            &location,
            category,
            fields,
            args,
        );
    }

    /// Formatted message with explicit-length location and category
    pub fn log_with_size_formatted(
        &self,
        level: LogLevel,
        location: &Location<'_>,
        category: Option<&str>,
        fields: Option<&Fields>,
        args: fmt::Arguments<'_>,
    ) {
        if ClosedStateGuard::check(self.env, args) == GuardOutcome::Closed {
            return;
        }
        log_formatted_sized(
            self.env,
            &self.dispatcher,
            ThreadCheck::Enforced,
            level,
            location,
            category,
            fields,
            args,
        );
    }
}

/// Unchecked entry points for add-ons without an owning thread.
///
/// Neither the closed flag nor thread ownership is consulted. Using this for
/// anything but add-on bootstrap reintroduces the races [`EnvLog`] prevents.
// TODO: remove once add-ons are given an owning thread at load time.
pub struct AddonBootstrapLog<'e, E: RuntimeEnv + ?Sized> {
    env: &'e E,
    dispatcher: SinkDispatcher,
}

impl<'e, E: RuntimeEnv + ?Sized> AddonBootstrapLog<'e, E> {
    pub fn new(env: &'e E) -> Self {
        Self::with_dispatcher(env, SinkDispatcher::global())
    }

    pub fn with_dispatcher(env: &'e E, dispatcher: SinkDispatcher) -> Self {
        Self { env, dispatcher }
    }

    pub fn env(&self) -> &'e E {
        self.env
    }

    pub fn log(
        &self,
        level: LogLevel,
        location: &Location<'_>,
        message: &str,
        category: Option<&str>,
        fields: Option<&Fields>,
    ) {
        log_direct(
            self.env,
            &self.dispatcher,
            ThreadCheck::UnenforcedForAddonBootstrap,
            level,
            location,
            message,
            category,
            fields,
        );
    }

    pub fn log_cstr(
        &self,
        level: LogLevel,
        location: &Location<'_>,
        message: &CStr,
        category: Option<&CStr>,
        fields: Option<&Fields>,
    ) {
        log_cstr_direct(
            self.env,
            &self.dispatcher,
            ThreadCheck::UnenforcedForAddonBootstrap,
            level,
            location,
            message,
            category,
            fields,
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn log_formatted(
        &self,
        level: LogLevel,
        function: &CStr,
        file: &CStr,
        line: u32,
        category: Option<&str>,
        fields: Option<&Fields>,
        args: fmt::Arguments<'_>,
    ) {
        let location = Location::from_c(function, file, line);
        log_formatted_sized(
            self.env,
            &self.dispatcher,
            ThreadCheck::UnenforcedForAddonBootstrap,
            level,
            &location,
            category,
            fields,
            args,
        );
    }

    pub fn log_with_size_formatted(
        &self,
        level: LogLevel,
        location: &Location<'_>,
        category: Option<&str>,
        fields: Option<&Fields>,
        args: fmt::Arguments<'_>,
    ) {
        log_formatted_sized(
            self.env,
            &self.dispatcher,
            ThreadCheck::UnenforcedForAddonBootstrap,
            level,
            location,
            category,
            fields,
            args,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn log_direct<E: RuntimeEnv + ?Sized>(
    env: &E,
    dispatcher: &SinkDispatcher,
    check: ThreadCheck,
    level: LogLevel,
    location: &Location<'_>,
    message: &str,
    category: Option<&str>,
    fields: Option<&Fields>,
) {
    let message = MessageComposer::compose(env, check, message);
    dispatcher.dispatch_with_size(level, location, &message, category, fields);
}

#[allow(clippy::too_many_arguments)]
fn log_cstr_direct<E: RuntimeEnv + ?Sized>(
    env: &E,
    dispatcher: &SinkDispatcher,
    check: ThreadCheck,
    level: LogLevel,
    location: &Location<'_>,
    message: &CStr,
    category: Option<&CStr>,
    fields: Option<&Fields>,
) {
    let message = MessageComposer::compose_cstr(env, check, message);
    dispatcher.dispatch(level, location, &message, category, fields);
}

#[allow(clippy::too_many_arguments)]
fn log_formatted_sized<E: RuntimeEnv + ?Sized>(
    env: &E,
    dispatcher: &SinkDispatcher,
    check: ThreadCheck,
    level: LogLevel,
    location: &Location<'_>,
    category: Option<&str>,
    fields: Option<&Fields>,
    args: fmt::Arguments<'_>,
) {
    let message = MessageComposer::compose_formatted(env, check, args);
    dispatcher.dispatch_with_size(level, location, &message, category, fields);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::handle::EnvHandle;
    use crate::core::thread_gate::assert_fatal_in_child;
    use crate::sinks::MemorySink;
    use std::sync::Arc;
    use std::thread;

    fn capture() -> (Arc<MemorySink>, SinkDispatcher) {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = SinkDispatcher::to_sink(sink.clone());
        (sink, dispatcher)
    }

    #[test]
    fn test_checked_direct_prefixes_name() {
        let (sink, dispatcher) = capture();
        let env = EnvHandle::new("ext_a");
        let log = EnvLog::with_dispatcher(&env, dispatcher);

        log.log(
            LogLevel::Info,
            &Location::new("on_start", "ext.rs", 3),
            "ready",
            Some("life"),
            None,
        );

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "[ext_a] ready");
        assert_eq!(records[0].category(), Some("life"));
        assert_eq!(records[0].location, Location::new("on_start", "ext.rs", 3));
    }

    #[test]
    fn test_checked_cstr_matches_direct() {
        let (sink, dispatcher) = capture();
        let env = EnvHandle::new("ext_a");
        let log = EnvLog::with_dispatcher(&env, dispatcher);
        let location = Location::new("f", "a.rs", 1);

        log.log(LogLevel::Debug, &location, "same", Some("c"), None);
        log.log_cstr(LogLevel::Debug, &location, c"same", Some(c"c"), None);

        let records = sink.records();
        assert_eq!(records[0].message, records[1].message);
        assert_eq!(records[0].category(), records[1].category());
    }

    #[test]
    fn test_formatted_variants_are_identical() {
        let (sink, dispatcher) = capture();
        let env = EnvHandle::new("ext_a");
        let log = EnvLog::with_dispatcher(&env, dispatcher);

        log.log_formatted(
            LogLevel::Warn,
            c"on_cmd",
            c"src/ext.rs",
            7,
            Some("cmd"),
            None,
            format_args!("{} items", 5),
        );
        log.log_with_size_formatted(
            LogLevel::Warn,
            &Location::new("on_cmd", "src/ext.rs", 7),
            Some("cmd"),
            None,
            format_args!("{} items", 5),
        );

        let records = sink.records();
        assert_eq!(records[0].message, "[ext_a] 5 items");
        assert_eq!(records[0].message, records[1].message);
        assert_eq!(records[0].location, records[1].location);
        assert_eq!(records[0].category(), records[1].category());
    }

    #[test]
    fn test_closed_handle_dispatches_nothing() {
        let (sink, dispatcher) = capture();
        let env = EnvHandle::new("ext_a");
        env.close();
        let log = EnvLog::with_dispatcher(&env, dispatcher);
        let location = Location::new("f", "a.rs", 1);

        log.log(LogLevel::Info, &location, "late", None, None);
        log.log_cstr(LogLevel::Info, &location, c"late", None, None);
        log.log_formatted(
            LogLevel::Info,
            c"f",
            c"a.rs",
            1,
            None,
            None,
            format_args!("late {}", 1),
        );
        log.log_with_size_formatted(
            LogLevel::Info,
            &location,
            None,
            None,
            format_args!("late {}", 2),
        );

        assert!(sink.is_empty());
    }

    #[test]
    fn test_addon_bootstrap_logs_from_any_thread() {
        let (sink, dispatcher) = capture();
        let env = Arc::new(EnvHandle::for_addon("addon_x"));

        let remote_env = Arc::clone(&env);
        thread::spawn(move || {
            let log = AddonBootstrapLog::with_dispatcher(&*remote_env, dispatcher);
            log.log(
                LogLevel::Info,
                &Location::new("register", "addon.rs", 5),
                "registered",
                None,
                None,
            );
            log.log_formatted(
                LogLevel::Info,
                c"register",
                c"addon.rs",
                6,
                None,
                None,
                format_args!("v{}", 2),
            );
        })
        .join()
        .unwrap();

        assert_eq!(sink.messages(), vec!["[addon_x] registered", "[addon_x] v2"]);
    }

    #[test]
    fn test_checked_log_without_owner_aborts() {
        assert_fatal_in_child(
            concat!(module_path!(), "::test_checked_log_without_owner_aborts"),
            || {
                let (_sink, dispatcher) = capture();
                let env = EnvHandle::for_addon("addon_x");
                EnvLog::with_dispatcher(&env, dispatcher).log(
                    LogLevel::Info,
                    &Location::new("f", "a.rs", 1),
                    "nope",
                    None,
                    None,
                );
            },
        );
    }
}
