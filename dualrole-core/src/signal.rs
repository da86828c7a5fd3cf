//! Flags shared between interrupt context and the coordinator
//!
//! Interrupt handlers only ever raise flags; the coordinator is the single
//! consumer that observes and clears them. Both primitives are built on
//! `portable-atomic` so they work on cores without native compare-and-swap
//! (the firmware enables its critical-section fallback).
//!
//! [`SharedSignal`] counts raised edges instead of storing a single bit. The
//! coordinator observes the count before handling an event and acknowledges
//! exactly that many edges afterwards, so an edge raised while the event is
//! being handled stays pending for the next loop pass instead of being folded
//! into the stale cycle.

use portable_atomic::{AtomicU32, AtomicU8, Ordering};

/// Edge-counting flag raised from interrupt context
#[derive(Debug)]
pub struct SharedSignal {
    pending: AtomicU32,
}

/// Pending edges seen by [`SharedSignal::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use = "observed edges must be acknowledged"]
pub struct Observed(u32);

impl Observed {
    /// Number of edges observed
    pub fn edges(&self) -> u32 {
        self.0
    }
}

impl Default for SharedSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedSignal {
    /// Create a lowered flag
    pub const fn new() -> Self {
        Self {
            pending: AtomicU32::new(0),
        }
    }

    /// Raise the flag
    ///
    /// Safe to call from interrupt context.
    pub fn set(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    /// Check whether any edge is pending
    pub fn is_set(&self) -> bool {
        self.pending.load(Ordering::Acquire) != 0
    }

    /// Clear the flag, returning whether it was raised
    pub fn test_and_clear(&self) -> bool {
        self.pending.swap(0, Ordering::AcqRel) != 0
    }

    /// Observe pending edges without clearing them
    pub fn observe(&self) -> Option<Observed> {
        match self.pending.load(Ordering::Acquire) {
            0 => None,
            n => Some(Observed(n)),
        }
    }

    /// Acknowledge previously observed edges
    ///
    /// Edges raised after the observation stay pending. Returns `true` if the
    /// flag is still raised afterwards.
    pub fn acknowledge(&self, observed: Observed) -> bool {
        let previous = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(observed.0))
            })
            .unwrap_or(0);
        previous.saturating_sub(observed.0) != 0
    }
}

/// Joystick navigation input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Nav {
    /// Scroll forward
    Right,
    /// Scroll backward
    Left,
    /// Push / select
    Select,
}

impl Nav {
    const fn bit(self) -> u8 {
        match self {
            Nav::Right => NAV_RIGHT,
            Nav::Left => NAV_LEFT,
            Nav::Select => NAV_SELECT,
        }
    }
}

const NAV_RIGHT: u8 = 1 << 0;
const NAV_LEFT: u8 = 1 << 1;
const NAV_SELECT: u8 = 1 << 2;
const NAV_DIRTY: u8 = 1 << 7;

/// Navigation deltas accumulated since the last repaint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavDeltas {
    pub forward: bool,
    pub backward: bool,
    pub select: bool,
}

impl NavDeltas {
    fn from_bits(bits: u8) -> Self {
        Self {
            forward: bits & NAV_RIGHT != 0,
            backward: bits & NAV_LEFT != 0,
            select: bits & NAV_SELECT != 0,
        }
    }
}

/// Cursor state: dirty flag plus pending joystick deltas
#[derive(Debug)]
pub struct NavSignal {
    bits: AtomicU8,
}

impl Default for NavSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl NavSignal {
    /// Create a clean cursor state
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    /// Record a joystick input and mark the cursor dirty
    ///
    /// Safe to call from interrupt context.
    pub fn push(&self, nav: Nav) {
        self.bits.fetch_or(nav.bit() | NAV_DIRTY, Ordering::AcqRel);
    }

    /// Mark the cursor dirty without a navigation delta
    pub fn request_repaint(&self) {
        self.bits.fetch_or(NAV_DIRTY, Ordering::AcqRel);
    }

    /// Check whether a repaint is pending
    pub fn is_dirty(&self) -> bool {
        self.bits.load(Ordering::Acquire) & NAV_DIRTY != 0
    }

    /// Take the pending deltas, leaving the cursor clean
    ///
    /// Returns `None` if the cursor was already clean.
    pub fn take(&self) -> Option<NavDeltas> {
        let bits = self.bits.swap(0, Ordering::AcqRel);
        (bits & NAV_DIRTY != 0).then(|| NavDeltas::from_bits(bits))
    }

    /// Discard pending deltas
    pub fn clear(&self) {
        self.bits.store(0, Ordering::Release);
    }
}

/// All flags shared between interrupt handlers and the coordinator
#[derive(Debug, Default)]
pub struct Signals {
    /// PD controller alert line
    pub alert: SharedSignal,
    /// Charger interrupt line
    pub charger: SharedSignal,
    /// Joystick cursor state
    pub cursor: NavSignal,
}

impl Signals {
    /// Create a set of lowered flags
    pub const fn new() -> Self {
        Self {
            alert: SharedSignal::new(),
            charger: SharedSignal::new(),
            cursor: NavSignal::new(),
        }
    }

    /// Check whether any flag needs the coordinator's attention
    pub fn any_pending(&self) -> bool {
        self.alert.is_set() || self.charger.is_set() || self.cursor.is_dirty()
    }
}
