use std::fmt;

/// Two-level log sink used by the client.
///
/// Implementations must not panic or block: the client calls them inline on
/// the request path and ignores whatever they do.
pub trait Logger: Send + Sync {
    fn debug(&self, args: fmt::Arguments<'_>);
    fn error(&self, args: fmt::Arguments<'_>);
}

/// Discards everything. The default sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _args: fmt::Arguments<'_>) {}

    fn error(&self, _args: fmt::Arguments<'_>) {}
}

/// Forwards to the `tracing` macros under the `manapool_http` target.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

#[cfg(feature = "tracing")]
impl Logger for TracingLogger {
    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "manapool_http", "{}", args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(target: "manapool_http", "{}", args);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        fmt,
        sync::{Mutex, PoisonError},
    };

    use super::{Logger, NoopLogger};

    /// Captures formatted lines for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingLogger {
        pub(crate) lines: Mutex<Vec<String>>,
    }

    impl RecordingLogger {
        pub(crate) fn lines(&self) -> Vec<String> {
            self.lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        fn push(&self, level: &str, args: fmt::Arguments<'_>) {
            self.lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(format!("{level}: {args}"));
        }
    }

    impl Logger for RecordingLogger {
        fn debug(&self, args: fmt::Arguments<'_>) {
            self.push("debug", args);
        }

        fn error(&self, args: fmt::Arguments<'_>) {
            self.push("error", args);
        }
    }

    #[test]
    fn noop_logger_accepts_anything() {
        NoopLogger.debug(format_args!("status={}", 200));
        NoopLogger.error(format_args!("boom"));
    }

    #[test]
    fn recording_logger_tags_levels() {
        let logger = RecordingLogger::default();
        logger.debug(format_args!("attempt {}/{}", 1, 4));
        logger.error(format_args!("server error {}", 503));
        assert_eq!(
            logger.lines(),
            vec!["debug: attempt 1/4".to_owned(), "error: server error 503".to_owned()]
        );
    }
}
