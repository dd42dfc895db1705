//! Save notifications and host lifecycle events
//!
//! Subscribers registered on a [`Settings`](crate::Settings) façade are told
//! before and after every save. Host applications forward their own reload
//! and shutdown signals as [`HostEvent`]s so pending changes are flushed.

use std::fmt;

/// Points in a façade save that subscribers can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveEvent {
    /// Before any repository is saved
    BeforeSave,
    /// After every repository has been saved
    AfterSave,
}

impl fmt::Display for SaveEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeSave => write!(f, "before-save"),
            Self::AfterSave => write!(f, "after-save"),
        }
    }
}

/// Lifecycle signals from the hosting application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// The host is about to tear down and reload its state
    BeforeReload,
    /// The host process is about to exit
    Quitting,
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeReload => write!(f, "before-reload"),
            Self::Quitting => write!(f, "quitting"),
        }
    }
}

type Listener = Box<dyn FnMut(SaveEvent)>;

/// Ordered save subscribers.
#[derive(Default)]
pub struct SaveHooks {
    listeners: Vec<(SaveEvent, Listener)>,
}

impl SaveHooks {
    pub fn subscribe(&mut self, event: SaveEvent, listener: impl FnMut(SaveEvent) + 'static) {
        self.listeners.push((event, Box::new(listener)));
    }

    /// Call every listener registered for `event`, in subscription order.
    ///
    /// A panicking listener is not caught.
    pub fn notify(&mut self, event: SaveEvent) {
        for (_, listener) in self.listeners.iter_mut().filter(|(e, _)| *e == event) {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for SaveHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveHooks")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
