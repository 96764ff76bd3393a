// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding-host notification and widget navigation traits.

use crate::types::{HostEvent, Route};

/// Channel to the page embedding the widget.
pub trait HostNotifier: Send + Sync {
    /// Delivers a callback event to the host page.
    fn notify(&self, event: HostEvent);
}

/// Widget-internal router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
