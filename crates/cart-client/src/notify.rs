//! # Tracing Notifier
//!
//! Default notification sink: notices go to the log at `warn`.

use cart_core::{Notice, Notifier};
use tracing::warn;

/// Notifier that logs every notice
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        warn!(
            kind = ?notice.kind,
            product_id = notice.product_id,
            "{}",
            notice.message()
        );
    }
}
