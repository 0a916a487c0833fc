//! Expected size discovery from transfer progress.

use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::channel::Channel;

/// Collects the announced total of every part and persists their sum once
/// all parts have reported, unless the channel already knows a size.
pub(crate) struct ExpectedSizeRecorder {
    channel: Arc<dyn Channel>,
    guid: String,
    totals: Mutex<Vec<Option<u64>>>,
}

impl ExpectedSizeRecorder {
    pub(crate) fn new(channel: Arc<dyn Channel>, guid: impl Into<String>, part_count: usize) -> Self {
        Self {
            channel,
            guid: guid.into(),
            totals: Mutex::new(vec![None; part_count]),
        }
    }

    /// Records the total of one part. Only the first report per part counts.
    pub(crate) fn report(&self, index: usize, total: u64) {
        let sum = {
            let mut totals = self.totals.lock().unwrap();
            match totals.get_mut(index) {
                Some(slot) if slot.is_none() => *slot = Some(total),
                _ => return,
            }
            if !totals.iter().all(Option::is_some) {
                return;
            }
            totals.iter().flatten().sum::<u64>()
        };

        match self.channel.record_expected_size_if_unset(&self.guid, sum) {
            Ok(true) => debug!(guid = %self.guid, bytes = sum, "Recorded expected size"),
            Ok(false) => debug!(guid = %self.guid, "Expected size already known"),
            Err(e) => warn!(guid = %self.guid, "Failed to record expected size: {}", e),
        }
    }
}
