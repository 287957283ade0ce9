// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

/// Receives business events worth counting.
///
/// Implementations must not fail; a metrics outage never affects an operation.
pub trait OrderMetrics: Send + Sync {
    /// Records one completed order.
    fn completed_order(&self);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl OrderMetrics for NoopMetrics {
    fn completed_order(&self) {}
}

impl<T: OrderMetrics + ?Sized> OrderMetrics for Arc<T> {
    fn completed_order(&self) {
        (**self).completed_order();
    }
}
