use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::IntervalIssue;

use super::machine::SchedulerState;

/// Everything a display needs to follow the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    StateChanged(SchedulerState),
    /// Whole seconds until the next track.
    Countdown { remaining: u64 },
    /// A track was picked and is being decoded.
    Loading(String),
    NowPlaying(String),
    DecodeFailed { track: String, reason: String },
    BoundsRejected(Vec<IntervalIssue>),
    /// Countdown and now-playing display should be blanked.
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct Subscription {
    pub id: SubscriptionId,
    pub events: Receiver<SchedulerEvent>,
}

#[derive(Default)]
pub(super) struct Observers {
    next_id: u64,
    senders: Vec<(SubscriptionId, Sender<SchedulerEvent>)>,
}

impl Observers {
    pub(super) fn subscribe(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (tx, events) = mpsc::channel();
        self.senders.push((id, tx));
        Subscription { id, events }
    }

    pub(super) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.senders.len();
        self.senders.retain(|(sid, _)| *sid != id);
        self.senders.len() != before
    }

    /// Deliver to everyone; subscribers whose receiver is gone are dropped.
    pub(super) fn emit(&mut self, event: SchedulerEvent) {
        self.senders.retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    pub(super) fn clear(&mut self) {
        self.senders.clear();
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.senders.len()
    }
}
