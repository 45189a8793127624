//! The editor side of the service.

use ccx_format::CompletionItem;

use crate::context::BufferContext;

/// Receives results from the service's worker thread.
pub trait Host: Send + Sync {
    /// Delivers the completion list for `request`, anchored at `start_column`.
    fn complete(&self, request: &BufferContext, start_column: u32, items: Vec<CompletionItem>);

    /// Shows a message to the user.
    fn show_message(&self, message: &str);
}
