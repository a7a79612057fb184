//! Executable behavior attached to commands and options.
//!
//! Every action is one capability, [`CliAction`], returning a boxed future.
//! Synchronous closures go through [`SyncAction`], which resolves on first
//! poll; there is no second code path for blocking actions.

mod invoke;

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::parser::{OptionResult, ParseResult};
use crate::symbol::{SymbolId, SymbolTree};

/// Behavior run after a successful (or error-tolerant) parse.
///
/// `Ok(code)` becomes the process exit code. `Err` and panics are reported
/// as exit code `1`.
pub trait CliAction: Send + Sync {
    fn invoke<'a>(
        &'a self,
        result: &'a ParseResult,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, anyhow::Result<i32>>;

    /// Exclusive actions replace everything else. Non-exclusive option
    /// actions also run ahead of a later selected action.
    fn is_exclusive(&self) -> bool {
        true
    }

    /// Run even when the parse reported errors (help does this).
    fn handles_parse_errors(&self) -> bool {
        false
    }
}

type SyncFn = dyn Fn(&ParseResult) -> anyhow::Result<i32> + Send + Sync;

/// A blocking closure exposed as an action.
#[derive(Clone)]
pub struct SyncAction {
    run: Arc<SyncFn>,
    exclusive: bool,
    handles_parse_errors: bool,
}

impl SyncAction {
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(&ParseResult) -> anyhow::Result<i32> + Send + Sync + 'static,
    {
        Self {
            run: Arc::new(run),
            exclusive: true,
            handles_parse_errors: false,
        }
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn handles_parse_errors(mut self, handles: bool) -> Self {
        self.handles_parse_errors = handles;
        self
    }
}

impl fmt::Debug for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncAction")
            .field("exclusive", &self.exclusive)
            .field("handles_parse_errors", &self.handles_parse_errors)
            .finish_non_exhaustive()
    }
}

impl CliAction for SyncAction {
    fn invoke<'a>(
        &'a self,
        result: &'a ParseResult,
        _cancel: CancellationToken,
    ) -> BoxFuture<'a, anyhow::Result<i32>> {
        // Run inside the future so a panic surfaces while it is polled.
        Box::pin(async move { (self.run)(result) })
    }

    fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    fn handles_parse_errors(&self) -> bool {
        self.handles_parse_errors
    }
}

type AsyncFn =
    dyn for<'a> Fn(&'a ParseResult, CancellationToken) -> BoxFuture<'a, anyhow::Result<i32>>
        + Send
        + Sync;

/// An async closure exposed as an action.
///
/// ```
/// use cmdtree::action::AsyncAction;
/// use futures::FutureExt;
///
/// let action = AsyncAction::new(|_result, cancel| {
///     async move {
///         if cancel.is_cancelled() {
///             return Ok(130);
///         }
///         Ok(0)
///     }
///     .boxed()
/// });
/// # let _ = action;
/// ```
#[derive(Clone)]
pub struct AsyncAction {
    run: Arc<AsyncFn>,
    exclusive: bool,
    handles_parse_errors: bool,
}

impl AsyncAction {
    pub fn new<F>(run: F) -> Self
    where
        F: for<'a> Fn(&'a ParseResult, CancellationToken) -> BoxFuture<'a, anyhow::Result<i32>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            run: Arc::new(run),
            exclusive: true,
            handles_parse_errors: false,
        }
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn handles_parse_errors(mut self, handles: bool) -> Self {
        self.handles_parse_errors = handles;
        self
    }
}

impl fmt::Debug for AsyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncAction")
            .field("exclusive", &self.exclusive)
            .field("handles_parse_errors", &self.handles_parse_errors)
            .finish_non_exhaustive()
    }
}

impl CliAction for AsyncAction {
    fn invoke<'a>(
        &'a self,
        result: &'a ParseResult,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, anyhow::Result<i32>> {
        (self.run)(result, cancel)
    }

    fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    fn handles_parse_errors(&self) -> bool {
        self.handles_parse_errors
    }
}

/// Pick the action to run and the non-exclusive option actions that precede
/// it.
///
/// The last matched option carrying an action wins; failing that, the
/// terminal command's own action.
pub(crate) fn select(
    tree: &SymbolTree,
    options: &[OptionResult],
    terminal: SymbolId,
) -> (Option<SymbolId>, Vec<SymbolId>) {
    let with_action: Vec<SymbolId> = options
        .iter()
        .map(OptionResult::option)
        .filter(|id| tree.option(*id).is_some_and(|def| def.action().is_some()))
        .collect();

    if let Some((selected, earlier)) = with_action.split_last() {
        let pre_actions: Vec<SymbolId> = earlier
            .iter()
            .copied()
            .filter(|id| {
                tree.option(*id)
                    .and_then(|def| def.action())
                    .is_some_and(|action| !action.action().is_exclusive())
            })
            .collect();
        debug!(
            option = tree.name(*selected),
            pre_actions = pre_actions.len(),
            "selected option action"
        );
        return (Some(*selected), pre_actions);
    }

    let command_action = tree
        .command(terminal)
        .is_some_and(|def| def.action().is_some());
    if command_action {
        debug!(command = tree.name(terminal), "selected command action");
        (Some(terminal), Vec::new())
    } else {
        debug!(command = tree.name(terminal), "no action selected");
        (None, Vec::new())
    }
}
