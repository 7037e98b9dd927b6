//! # cu-actions
//!
//! Decides what to do with each classified changelog entry and does it.
//!
//! An entry gets an action (explicit choice, a recommendation, or the
//! category default), is routed to the first registered handler that can
//! perform it, and is then executed as part of a batch. Acknowledgment-only
//! actions never reach a handler.
//!
//! ## Key components
//!
//! - [`UserAction`] — the closed set of things a user can do with an entry
//! - [`ActionHandler`] — trait for anything that can carry out an action
//! - [`HandlerRegistry`] — explicit, ordered handler list (no global state)
//! - [`ActionRouter`] — action assignment and routing into an execution plan
//! - [`execute_batch`] — dry-run, sequential or concurrent execution with
//!   every plan item accounted for in the [`BatchResult`]
//! - [`CommandHandler`] / [`HandlersConfig`] — external commands configured
//!   in `.changelog/handlers.toml`

pub mod action;
pub mod batch;
pub mod command_handler;
pub mod error;
pub mod handler;
pub mod plan;
pub mod registry;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;

pub use action::{HandlerKind, UserAction};
pub use batch::{
    execute_batch, execute_batch_parallel, execute_batch_sequential, BatchOptions, BatchResult,
    BatchStats, FailedItem,
};
pub use command_handler::{CommandHandler, HandlerRule, HandlersConfig};
pub use error::ActionError;
pub use handler::{ActionHandler, ActionResult};
pub use plan::{
    filter_actionable, filter_by_action, filter_by_category, preview, ExecutionPlanItem,
    PreviewItem,
};
pub use registry::HandlerRegistry;
pub use router::{default_action, recommended_action, ActionRouter, PlanStrategy, Recommendation};
