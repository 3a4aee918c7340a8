//! Global logging module
//!
//! Process-wide logging service with a thread-scoped override used by tests
//! and by the harness, plus the macro interface used across the workspace.

pub mod codes;
pub mod events;
#[macro_use]
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
#[cfg(feature = "logging")]
pub use service::FacadeLogger;
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static SCOPED_LOGGER: RefCell<Option<Arc<LoggingService>>> = const { RefCell::new(None) };
}

/// Initialize the global logging service from settings
pub fn init_global_logging(min_level: LogLevel, structured: bool) -> Result<(), String> {
    let service = Arc::new(LoggingService::with_settings(min_level, structured));
    init_global_logging_with_service(service.clone())?;

    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));
    Ok(())
}

/// Initialize with a custom service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Run `f` with `service` receiving every event logged on this thread
pub fn with_logger<F, R>(service: Arc<LoggingService>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = SCOPED_LOGGER.with(|scoped| scoped.borrow_mut().replace(service));
    let _restore = ScopeGuard { previous };
    f()
}

/// Puts back the enclosing scoped logger, also when `f` unwinds
struct ScopeGuard {
    previous: Option<Arc<LoggingService>>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        SCOPED_LOGGER.with(|scoped| *scoped.borrow_mut() = previous);
    }
}

/// Deliver an event to the scoped logger, falling back to the global one
pub fn dispatch(event: LogEvent) {
    let scoped = SCOPED_LOGGER.with(|scoped| scoped.borrow().clone());
    match scoped {
        Some(service) => service.log_event(event),
        None => {
            if let Some(logger) = try_get_global_logger() {
                logger.log_event(event);
            }
        }
    }
}

fn with_context_pairs(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    event
}

/// Used by `log_error!`
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_context_pairs(LogEvent::error(code, message), context));
}

/// Used by `log_warning!`
pub fn log_warning_with_context(code: Option<Code>, message: &str, context: Vec<(&str, &str)>) {
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    dispatch(with_context_pairs(event, context));
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_context_pairs(LogEvent::success(code, message), context));
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_context_pairs(LogEvent::info(message), context));
}

/// Used by `log_debug!`
pub fn log_debug_with_context(code: Option<Code>, message: &str, context: Vec<(&str, &str)>) {
    let event = match code {
        Some(code) => LogEvent::debug_with_code(code, message),
        None => LogEvent::debug(message),
    };
    dispatch(with_context_pairs(event, context));
}

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if try_get_global_logger().is_some() {
        dispatch(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_logger_receives_macro_events() {
        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));

        with_logger(service, || {
            log_error!(codes::graph::UNKNOWN_COMPONENT, "missing", "component" => "specs.x");
            log_warning!("slow", "elapsed_ms" => 12);
            log_info!("running");
            log_debug!("details");
        });

        let events = memory.get_events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].context.get("component").map(String::as_str), Some("specs.x"));
        assert_eq!(events[1].context.get("elapsed_ms").map(String::as_str), Some("12"));

        // Scope is restored afterwards
        log_info!("not captured");
        assert_eq!(memory.event_count(), 4);
    }

    #[test]
    fn test_scope_restored_after_panic() {
        let outer = Arc::new(MemoryLogger::new());
        let inner = Arc::new(MemoryLogger::new());
        let outer_service = Arc::new(LoggingService::new(outer.clone(), LogLevel::Debug));
        let inner_service = Arc::new(LoggingService::new(inner.clone(), LogLevel::Debug));

        with_logger(outer_service, || {
            let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                with_logger(inner_service, || {
                    log_info!("inner");
                    panic!("component blew up");
                })
            }));
            assert!(unwound.is_err());
            log_info!("outer");
        });

        assert_eq!(inner.event_count(), 1);
        assert_eq!(outer.event_count(), 1);
        assert_eq!(outer.get_events()[0].message, "outer");

        log_info!("not captured");
        assert_eq!(outer.event_count(), 1);
    }

    #[test]
    fn test_debug_with_code() {
        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
        with_logger(service, || {
            log_debug!(code = codes::execution::COMPONENT_SKIPPED, "skipped", "component" => "specs.x");
        });
        let events = memory.get_events_with_code(codes::execution::COMPONENT_SKIPPED);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_debug());
    }

    #[test]
    fn test_safe_logging() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }
}
