//! Notifications emitted by the camera controller.

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

use ahash::RandomState;
use game_common::entity::EntityId;
use game_targeting::size::SizeCategory;
use glam::Vec3;

use crate::controller::LockState;

#[derive(Clone, Debug, PartialEq)]
pub enum CameraEvent {
    StateChanged {
        from: LockState,
        to: LockState,
    },
    TargetChanged {
        previous: Option<EntityId>,
        current: Option<EntityId>,
    },
    /// A smooth or instant camera reset finished.
    ResetComplete,
    /// The camera started correcting towards `target`.
    CorrectionStarted { target: EntityId },
    /// The advanced camera adjustment ran.
    CameraAdjusted {
        size: SizeCategory,
        distance: f32,
        anchor: Vec3,
    },
}

impl CameraEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StateChanged { .. } => EventKind::StateChanged,
            Self::TargetChanged { .. } => EventKind::TargetChanged,
            Self::ResetComplete => EventKind::ResetComplete,
            Self::CorrectionStarted { .. } => EventKind::CorrectionStarted,
            Self::CameraAdjusted { .. } => EventKind::CameraAdjusted,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    StateChanged,
    TargetChanged,
    ResetComplete,
    CorrectionStarted,
    CameraAdjusted,
}

pub type Subscriber = Box<dyn FnMut(&CameraEvent)>;

/// Subscribers to [`CameraEvent`]s, keyed by [`EventKind`].
///
/// Subscribers are called synchronously in the order they were added.
#[derive(Default)]
pub struct CameraEvents {
    subscribers: HashMap<EventKind, Vec<Subscriber>, RandomState>,
}

impl CameraEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, f: F)
    where
        F: FnMut(&CameraEvent) + 'static,
    {
        self.subscribers.entry(kind).or_default().push(Box::new(f));
    }

    pub fn on_reset_complete<F>(&mut self, mut f: F)
    where
        F: FnMut() + 'static,
    {
        self.subscribe(EventKind::ResetComplete, move |_| f());
    }

    pub fn on_correction_started<F>(&mut self, mut f: F)
    where
        F: FnMut(EntityId) + 'static,
    {
        self.subscribe(EventKind::CorrectionStarted, move |event| {
            if let CameraEvent::CorrectionStarted { target } = event {
                f(*target);
            }
        });
    }

    pub fn on_camera_adjusted<F>(&mut self, mut f: F)
    where
        F: FnMut(SizeCategory, f32, Vec3) + 'static,
    {
        self.subscribe(EventKind::CameraAdjusted, move |event| {
            if let CameraEvent::CameraAdjusted {
                size,
                distance,
                anchor,
            } = event
            {
                f(*size, *distance, *anchor);
            }
        });
    }

    pub fn emit(&mut self, event: CameraEvent) {
        tracing::trace!("{:?}", event);

        if let Some(subscribers) = self.subscribers.get_mut(&event.kind()) {
            for subscriber in subscribers {
                subscriber(&event);
            }
        }
    }

    /// Returns the number of subscribers for `kind`.
    pub fn len(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl Debug for CameraEvents {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, subscribers) in &self.subscribers {
            map.entry(kind, &subscribers.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use game_targeting::size::SizeCategory;
    use glam::Vec3;

    use super::{CameraEvent, CameraEvents, EventKind};

    #[test]
    fn emit_to_matching_kind() {
        let mut events = CameraEvents::new();

        let resets = Rc::new(RefCell::new(0));
        let adjusted = Rc::new(RefCell::new(Vec::new()));

        {
            let resets = resets.clone();
            events.on_reset_complete(move || *resets.borrow_mut() += 1);
        }
        {
            let adjusted = adjusted.clone();
            events.on_camera_adjusted(move |size, distance, _| {
                adjusted.borrow_mut().push((size, distance));
            });
        }

        events.emit(CameraEvent::ResetComplete);
        events.emit(CameraEvent::CameraAdjusted {
            size: SizeCategory::Large,
            distance: 400.0,
            anchor: Vec3::ZERO,
        });
        events.emit(CameraEvent::ResetComplete);

        assert_eq!(*resets.borrow(), 2);
        assert_eq!(*adjusted.borrow(), [(SizeCategory::Large, 400.0)]);
        assert_eq!(events.len(EventKind::ResetComplete), 1);
        assert_eq!(events.len(EventKind::StateChanged), 0);
    }
}
