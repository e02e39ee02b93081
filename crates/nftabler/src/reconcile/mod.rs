//! Directory reconcile and the loop that drives it.

pub mod reconcile_loop;
pub mod reconciler;

pub use reconcile_loop::{LoopSummary, ReconcileLoop};
pub use reconciler::{DirectoryReconciler, ReconcileReport};
