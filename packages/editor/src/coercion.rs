//! # Coercion Queue
//!
//! Property coercion is asynchronous and may overlap with other edits. Every
//! (page, element, property) triple gets its own lane; coercions in a lane are
//! awaited strictly in submission order and their results applied in that
//! order, so the value submitted last is the value that ends up visible.
//! Distinct lanes make progress concurrently.

use crate::element::ElementId;
use crate::page::PageId;
use crate::pattern::CoercionError;
use crate::value::Value;
use futures::future::{join_all, BoxFuture};
use std::collections::{HashMap, VecDeque};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    pub page_id: PageId,
    pub element_id: ElementId,
    pub property_id: String,
}

impl PropertyKey {
    pub fn new(page_id: &str, element_id: &str, property_id: &str) -> Self {
        Self {
            page_id: page_id.to_string(),
            element_id: element_id.to_string(),
            property_id: property_id.to_string(),
        }
    }
}

/// Handle identifying one submitted coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionTicket {
    pub key: PropertyKey,
    pub sequence: u64,
}

struct PendingCoercion {
    sequence: u64,
    path: Option<String>,
    future: BoxFuture<'static, Result<Value, CoercionError>>,
}

impl fmt::Debug for PendingCoercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCoercion")
            .field("sequence", &self.sequence)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Settled coercion, ready to be written to the document
#[derive(Debug)]
pub struct CoercionOutcome {
    pub key: PropertyKey,
    pub sequence: u64,
    pub path: Option<String>,
    pub result: Result<Value, CoercionError>,
}

#[derive(Debug, Default)]
pub struct CoercionQueue {
    lanes: HashMap<PropertyKey, VecDeque<PendingCoercion>>,
    next_sequence: u64,
}

impl CoercionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a coercion behind any earlier one for the same property
    pub fn submit(
        &mut self,
        key: PropertyKey,
        path: Option<String>,
        future: BoxFuture<'static, Result<Value, CoercionError>>,
    ) -> CoercionTicket {
        self.next_sequence += 1;
        let sequence = self.next_sequence;

        self.lanes.entry(key.clone()).or_default().push_back(PendingCoercion {
            sequence,
            path,
            future,
        });

        CoercionTicket { key, sequence }
    }

    /// Number of coercions not yet settled
    pub fn pending(&self) -> usize {
        self.lanes.values().map(VecDeque::len).sum()
    }

    pub fn is_pending(&self, key: &PropertyKey) -> bool {
        self.lanes.get(key).map_or(false, |lane| !lane.is_empty())
    }

    /// Await every queued coercion; outcomes come back lane by lane in
    /// submission order
    pub async fn drain(&mut self) -> Vec<CoercionOutcome> {
        let mut lanes: Vec<_> = self.lanes.drain().collect();
        lanes.sort_by_key(|(_, lane)| lane.front().map(|p| p.sequence));

        let settled = join_all(lanes.into_iter().map(|(key, lane)| settle_lane(key, lane))).await;
        settled.into_iter().flatten().collect()
    }

    /// Await only the coercions queued for `key`
    pub async fn drain_key(&mut self, key: &PropertyKey) -> Vec<CoercionOutcome> {
        match self.lanes.remove(key) {
            Some(lane) => settle_lane(key.clone(), lane).await,
            None => Vec::new(),
        }
    }
}

async fn settle_lane(key: PropertyKey, lane: VecDeque<PendingCoercion>) -> Vec<CoercionOutcome> {
    let mut outcomes = Vec::with_capacity(lane.len());
    for pending in lane {
        let result = pending.future.await;
        outcomes.push(CoercionOutcome {
            key: key.clone(),
            sequence: pending.sequence,
            path: pending.path,
            result,
        });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::time::Duration;

    fn delayed(value: &str, millis: u64) -> BoxFuture<'static, Result<Value, CoercionError>> {
        let value = Value::from(value);
        async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            Ok(value)
        }
        .boxed()
    }

    #[tokio::test]
    async fn test_lane_keeps_submission_order() {
        let mut queue = CoercionQueue::new();
        let key = PropertyKey::new("page", "e-1", "text");

        // The first coercion is slower but still settles first
        queue.submit(key.clone(), None, delayed("first", 30));
        queue.submit(key.clone(), None, delayed("second", 1));
        assert_eq!(queue.pending(), 2);
        assert!(queue.is_pending(&key));

        let outcomes = queue.drain().await;
        let values: Vec<_> = outcomes.iter().map(|o| o.result.clone().unwrap()).collect();

        assert_eq!(values, vec![Value::from("first"), Value::from("second")]);
        assert_eq!(queue.pending(), 0);
    }

    #[tokio::test]
    async fn test_drain_key_leaves_other_lanes() {
        let mut queue = CoercionQueue::new();
        let text = PropertyKey::new("page", "e-1", "text");
        let color = PropertyKey::new("page", "e-1", "color");

        queue.submit(text.clone(), None, delayed("hello", 0));
        let ticket = queue.submit(color.clone(), Some("fill".to_string()), delayed("red", 0));
        assert_eq!(ticket.key, color);

        let outcomes = queue.drain_key(&text).await;
        assert_eq!(outcomes.len(), 1);
        assert!(queue.is_pending(&color));
        assert!(!queue.is_pending(&text));
    }
}
