//! Running the selected action and mapping the outcome to an exit code.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::CliAction;
use crate::parser::ParseResult;

impl ParseResult {
    /// Run the selected action to completion on the current thread.
    ///
    /// Actions that need a tokio reactor (timers, sockets) should be run with
    /// [`ParseResult::invoke_async`] from inside a runtime instead.
    pub fn invoke(&self) -> i32 {
        futures::executor::block_on(self.invoke_async(CancellationToken::new()))
    }

    /// Run the selected action, handing it `cancel` unchanged.
    ///
    /// - parse errors the action does not handle: print them to stderr and
    ///   return `parse_error_exit_code`
    /// - no action: `0`
    /// - `Ok(code)`: `code`
    /// - `Err` or panic: `1`
    pub async fn invoke_async(&self, cancel: CancellationToken) -> i32 {
        let action = self.action();

        if self.has_errors() && !action.as_ref().is_some_and(|a| a.handles_parse_errors()) {
            debug!(errors = self.errors().len(), "reporting parse errors");
            for error in self.errors() {
                eprintln!("{error}");
            }
            return self.config().parse_error_exit_code;
        }

        let Some(action) = action else {
            return 0;
        };

        for pre in self.pre_actions() {
            if let Err(code) = run_guarded(pre, self, cancel.clone()).await {
                return code;
            }
        }

        match run_guarded(action, self, cancel).await {
            Ok(code) | Err(code) => code,
        }
    }
}

/// `Err` carries the exit code of a failed or panicking action.
async fn run_guarded(
    action: Arc<dyn CliAction>,
    result: &ParseResult,
    cancel: CancellationToken,
) -> Result<i32, i32> {
    // Building the future runs the action's synchronous prologue.
    let future = match panic::catch_unwind(AssertUnwindSafe(|| action.invoke(result, cancel))) {
        Ok(future) => future,
        Err(payload) => {
            warn!(panic = %panic_message(payload.as_ref()), "action panicked");
            return Err(1);
        }
    };

    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(code)) => Ok(code),
        Ok(Err(err)) => {
            warn!(error = %err, "action failed");
            Err(1)
        }
        Err(payload) => {
            warn!(panic = %panic_message(payload.as_ref()), "action panicked");
            Err(1)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
