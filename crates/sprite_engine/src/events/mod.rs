//! Per-frame event bus
//!
//! Events are plain values queued by payload type. Every event is stamped
//! with the frame and engine time at which it was raised, and old events are
//! dropped at the start of each frame according to a [`CleanupPolicy`].
//!
//! The default policy keeps one previous frame, so a system that runs before
//! the raiser in frame `n` still sees the event in frame `n + 1`.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ecs::AsAny;

/// How long raised events are retained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CleanupPolicy {
    /// Keep events raised during the last `n` frames plus the current one
    KeepFrames(u64),
    /// Keep everything until cleared explicitly
    Manual,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self::KeepFrames(1)
    }
}

/// An event together with when it was raised
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<E> {
    /// Payload
    pub event: E,
    /// Frame number at raise time
    pub frame: u64,
    /// Engine time in seconds at raise time
    pub timestamp: f64,
}

trait EventQueue: AsAny {
    fn retain_from(&mut self, frame: u64);
    fn len(&self) -> usize;
}

impl<E: 'static> EventQueue for Vec<Stamped<E>> {
    fn retain_from(&mut self, frame: u64) {
        self.retain(|stamped| stamped.frame >= frame);
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Type-keyed store of stamped events
pub struct EventBus {
    queues: HashMap<TypeId, Box<dyn EventQueue>>,
    policy: CleanupPolicy,
    frame: u64,
    time: f64,
}

impl EventBus {
    /// Create an empty bus
    pub fn new(policy: CleanupPolicy) -> Self {
        Self {
            queues: HashMap::new(),
            policy,
            frame: 0,
            time: 0.0,
        }
    }

    /// Active cleanup policy
    pub fn policy(&self) -> CleanupPolicy {
        self.policy
    }

    /// Change the cleanup policy; applies from the next frame on
    pub fn set_policy(&mut self, policy: CleanupPolicy) {
        self.policy = policy;
    }

    /// Current frame number
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Engine time of the current frame, in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Start a new frame and drop expired events
    pub fn begin_frame(&mut self, frame: u64, time: f64) {
        self.frame = frame;
        self.time = time;

        if let CleanupPolicy::KeepFrames(frames) = self.policy {
            let oldest = frame.saturating_sub(frames);
            for queue in self.queues.values_mut() {
                queue.retain_from(oldest);
            }
            self.queues.retain(|_, queue| queue.len() > 0);
        }
    }

    /// Queue an event stamped with the current frame and time
    pub fn raise<E: Any>(&mut self, event: E) {
        let stamped = Stamped {
            event,
            frame: self.frame,
            timestamp: self.time,
        };
        let (frame, time) = (self.frame, self.time);

        if let Some(queue) = self.queue_mut::<E>() {
            queue.push(stamped);
            return;
        }

        log::trace!(
            "First {} raised at frame {} ({:.3}s)",
            std::any::type_name::<E>(),
            frame,
            time
        );
        self.queues.insert(TypeId::of::<E>(), Box::new(vec![stamped]));
    }

    /// Every retained event of type `E`, oldest first
    pub fn events<E: Any>(&self) -> &[Stamped<E>] {
        self.queue::<E>().map(Vec::as_slice).unwrap_or_default()
    }

    /// Events of type `E` raised during the current frame
    pub fn current<E: Any>(&self) -> impl Iterator<Item = &E> {
        self.events_since::<E>(self.frame)
    }

    /// Events of type `E` raised at or after `frame`
    pub fn events_since<E: Any>(&self, frame: u64) -> impl Iterator<Item = &E> {
        self.events::<E>()
            .iter()
            .filter(move |stamped| stamped.frame >= frame)
            .map(|stamped| &stamped.event)
    }

    /// Most recently raised event of type `E`
    pub fn latest<E: Any>(&self) -> Option<&Stamped<E>> {
        self.events::<E>().last()
    }

    /// Number of retained events of type `E`
    pub fn count<E: Any>(&self) -> usize {
        self.events::<E>().len()
    }

    /// Drop every event of type `E`
    pub fn clear_kind<E: Any>(&mut self) {
        self.queues.remove(&TypeId::of::<E>());
    }

    /// Drop every event
    pub fn clear(&mut self) {
        self.queues.clear();
    }

    fn queue<E: Any>(&self) -> Option<&Vec<Stamped<E>>> {
        self.queues
            .get(&TypeId::of::<E>())
            .and_then(|queue| (**queue).as_any().downcast_ref::<Vec<Stamped<E>>>())
    }

    fn queue_mut<E: Any>(&mut self) -> Option<&mut Vec<Stamped<E>>> {
        self.queues
            .get_mut(&TypeId::of::<E>())
            .and_then(|queue| (**queue).as_any_mut().downcast_mut::<Vec<Stamped<E>>>())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(CleanupPolicy::default())
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let retained: usize = self.queues.values().map(|queue| queue.len()).sum();
        f.debug_struct("EventBus")
            .field("policy", &self.policy)
            .field("frame", &self.frame)
            .field("kinds", &self.queues.len())
            .field("retained", &retained)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Collision {
        a: u64,
        b: u64,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Scored(u32);

    #[test]
    fn test_events_are_keyed_by_type() {
        let mut bus = EventBus::default();
        bus.raise(Collision { a: 1, b: 2 });
        bus.raise(Scored(10));
        bus.raise(Scored(20));

        assert_eq!(bus.count::<Collision>(), 1);
        assert_eq!(bus.count::<Scored>(), 2);
        assert_eq!(bus.latest::<Scored>().map(|s| &s.event), Some(&Scored(20)));
        assert_eq!(bus.count::<u32>(), 0);
    }

    #[test]
    fn test_events_are_stamped() {
        let mut bus = EventBus::default();
        bus.begin_frame(4, 1.25);
        bus.raise(Scored(1));

        let stamped = bus.latest::<Scored>().unwrap();
        assert_eq!(stamped.frame, 4);
        assert!((stamped.timestamp - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_policy_keeps_previous_frame() {
        let mut bus = EventBus::default();
        bus.begin_frame(1, 0.0);
        bus.raise(Scored(1));

        bus.begin_frame(2, 0.016);
        assert_eq!(bus.count::<Scored>(), 1);
        assert_eq!(bus.current::<Scored>().count(), 0);
        bus.raise(Scored(2));
        assert_eq!(bus.current::<Scored>().collect::<Vec<_>>(), vec![&Scored(2)]);

        bus.begin_frame(3, 0.032);
        assert_eq!(bus.events::<Scored>().len(), 1);
        assert_eq!(bus.events::<Scored>()[0].event, Scored(2));
    }

    #[test]
    fn test_keep_zero_frames() {
        let mut bus = EventBus::new(CleanupPolicy::KeepFrames(0));
        bus.begin_frame(1, 0.0);
        bus.raise(Scored(1));
        bus.begin_frame(2, 0.0);
        assert_eq!(bus.count::<Scored>(), 0);
    }

    #[test]
    fn test_manual_policy_retains_until_cleared() {
        let mut bus = EventBus::new(CleanupPolicy::Manual);
        for frame in 0..10 {
            bus.begin_frame(frame, frame as f64);
            bus.raise(Scored(frame as u32));
        }
        bus.raise(Collision { a: 0, b: 1 });

        assert_eq!(bus.count::<Scored>(), 10);
        assert_eq!(bus.events_since::<Scored>(7).count(), 3);

        bus.clear_kind::<Scored>();
        assert_eq!(bus.count::<Scored>(), 0);
        assert_eq!(bus.count::<Collision>(), 1);

        bus.clear();
        assert_eq!(bus.count::<Collision>(), 0);
    }
}
