//! Carriage update rule.
use crate::{InvalidSlot, Mechanism, Slot};

/// Carriages affected when a slot is moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    /// The carriage on the same rail, kept at its current height
    pub partner: Slot,
    /// The carriages on the other rail, each moved by `-delta / 2`
    pub mirrors: [Slot; 2],
}

/// Pairing table, indexed by the moved slot.
pub const PAIRING: [Pairing; 4] = {
    use Slot::*;
    [
        Pairing { partner: Car2, mirrors: [Car3, Car4] },
        Pairing { partner: Car1, mirrors: [Car3, Car4] },
        Pairing { partner: Car4, mirrors: [Car1, Car2] },
        Pairing { partner: Car3, mirrors: [Car1, Car2] },
    ]
};

impl Slot {
    /// The pairing of this slot.
    pub const fn pairing(self) -> Pairing {
        PAIRING[self.index()]
    }
}

/// Apply the update rule to the carriage heights.
///
/// The moved slot gets `+delta`, its partner stays, and the two mirrors get
/// `-delta / 2` each.
///
/// ```
/// use rail_square::{displace, Slot};
///
/// let ys = displace([35., -35., -35., 35.], Slot::Car1, 2.);
/// assert_eq!(ys, [37., -35., -36., 34.]);
/// ```
pub fn displace(ys: [f64; 4], slot: Slot, delta: f64) -> [f64; 4] {
    let Pairing { partner, mirrors } = slot.pairing();
    let mut next = ys;
    next[slot.index()] += delta;
    for m in mirrors {
        next[m.index()] -= delta * 0.5;
    }
    next[partner.index()] = ys[partner.index()];
    next
}

impl Mechanism {
    /// Move a carriage by its index and apply the update rule in-place.
    ///
    /// The mechanism is left untouched if the index is not a slot.
    pub fn displace(&mut self, index: isize, delta: f64) -> Result<Slot, InvalidSlot> {
        let slot = Slot::try_from(index)?;
        self.ys = displace(self.ys, slot, delta);
        Ok(slot)
    }
}
