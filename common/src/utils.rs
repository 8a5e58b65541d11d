use crate::message_dialog;

/// Runs `f`, reporting a panic through an error dialog instead of dying
/// silently (the release build has no console to print to).
pub fn graceful_run<R>(f: impl FnOnce() -> R) -> Option<R> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(err) => {
            let description = if let Some(message) = err.downcast_ref::<&str>() {
                (*message).to_string()
            } else if let Some(message) = err.downcast_ref::<String>() {
                message.clone()
            } else {
                "未知错误".to_string()
            };
            message_dialog::error(description).show();
            None
        }
    }
}
