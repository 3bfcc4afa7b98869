//! Pages
//!
//! Each page owns its search box, selection and dialogs, and submits
//! mutations through its own pipeline. Pages share the underlying stores,
//! so a change made on one page is visible on every other.

pub mod client_details;
pub mod clients;
pub mod dashboard;
pub mod documents;
pub mod tasks;

pub use client_details::ClientDetailsPage;
pub use clients::ClientsPage;
pub use dashboard::DashboardPage;
pub use documents::DocumentsPage;
pub use tasks::TasksPage;

use crate::services::Dialog;
use serde::Serialize;

/// "Showing {shown} of {total}" under a filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    pub shown: usize,
    pub total: usize,
}

/// Replace whatever dialog is in `slot` with a freshly opened one
fn open(slot: &mut Option<Dialog>) -> Dialog {
    close(slot);
    let dialog = Dialog::open();
    *slot = Some(dialog.clone());
    dialog
}

fn close(slot: &mut Option<Dialog>) {
    if let Some(dialog) = slot.take() {
        dialog.close();
    }
}

fn signal(slot: &Option<Dialog>) -> Option<crate::services::CancelSignal> {
    slot.as_ref().map(Dialog::signal)
}
