// Latest pointer position, shared between the input side (window mouse) and
// the particle field. The (x, y) pair is packed into one AtomicU64 so a reader
// can never see x from one event and y from another.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Bit pattern meaning "no pointer event yet". Two quiet NaNs, never produced by `pack`.
const UNSET: u64 = u64::MAX;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

/// Cloning shares the same underlying state (Arc).
#[derive(Clone, Debug)]
pub struct SharedPointer {
    inner: Arc<PointerInner>,
}

#[derive(Debug)]
struct PointerInner {
    radius: f32,         // squared-distance reach of the repulsion
    pos: AtomicU64,      // packed (x, y) or UNSET
    active: AtomicBool,  // pointer currently over the surface
}

impl SharedPointer {
    pub fn new(radius: f32) -> Self {
        Self {
            inner: Arc::new(PointerInner {
                radius,
                pos: AtomicU64::new(UNSET),
                active: AtomicBool::new(false),
            }),
        }
    }

    pub fn radius(&self) -> f32 {
        self.inner.radius
    }

    /// Replace the position in one store. Non-finite input is ignored.
    /// Visual: particles near (x,y) start scattering on the next frame.
    pub fn set(&self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.inner.pos.store(pack(x, y), Ordering::Release);
    }

    /// None until the first pointer event arrives.
    pub fn position(&self) -> Option<PointerPos> {
        match self.inner.pos.load(Ordering::Acquire) {
            UNSET => None,
            bits => Some(unpack(bits)),
        }
    }

    pub fn set_active(&self, active: bool) {
        self.inner.active.store(active, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Relaxed)
    }
}

#[inline]
fn pack(x: f32, y: f32) -> u64 {
    ((x.to_bits() as u64) << 32) | y.to_bits() as u64
}

#[inline]
fn unpack(bits: u64) -> PointerPos {
    PointerPos {
        x: f32::from_bits((bits >> 32) as u32),
        y: f32::from_bits(bits as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_until_first_event() {
        let p = SharedPointer::new(20_000.0);
        assert_eq!(p.position(), None);
        assert_eq!(p.radius(), 20_000.0);
        assert!(!p.is_active());
    }

    #[test]
    fn clones_see_the_latest_pair() {
        let p = SharedPointer::new(20_000.0);
        let reader = p.clone();
        p.set(12.5, -3.0);
        p.set(100.0, 200.25);
        assert_eq!(reader.position(), Some(PointerPos { x: 100.0, y: 200.25 }));
    }

    #[test]
    fn non_finite_positions_are_dropped() {
        let p = SharedPointer::new(1.0);
        p.set(1.0, 2.0);
        p.set(f32::NAN, 2.0);
        p.set(1.0, f32::INFINITY);
        assert_eq!(p.position(), Some(PointerPos { x: 1.0, y: 2.0 }));
    }
}
