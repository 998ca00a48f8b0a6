use super::Side;

/// Carriage slot.
///
/// The slots are ordered as the body corners: top-left, bottom-left,
/// bottom-right, top-right.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Slot {
    /// Top-left carriage on the left rail
    #[cfg_attr(feature = "serde", serde(alias = "CAR1"))]
    Car1 = 0,
    /// Bottom-left carriage on the left rail
    #[cfg_attr(feature = "serde", serde(alias = "CAR2"))]
    Car2 = 1,
    /// Bottom-right carriage on the right rail
    #[cfg_attr(feature = "serde", serde(alias = "CAR3"))]
    Car3 = 2,
    /// Top-right carriage on the right rail
    #[cfg_attr(feature = "serde", serde(alias = "CAR4"))]
    Car4 = 3,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a carriage index outside the four slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSlot(pub isize);

impl std::fmt::Display for InvalidSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "invalid carriage slot {}, expected 0 to 3", self.0)
    }
}

impl std::error::Error for InvalidSlot {}

impl TryFrom<isize> for Slot {
    type Error = InvalidSlot;

    fn try_from(value: isize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Car1),
            1 => Ok(Self::Car2),
            2 => Ok(Self::Car3),
            3 => Ok(Self::Car4),
            _ => Err(InvalidSlot(value)),
        }
    }
}

impl TryFrom<usize> for Slot {
    type Error = InvalidSlot;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        isize::try_from(value)
            .map_err(|_| InvalidSlot(isize::MAX))
            .and_then(Self::try_from)
    }
}

impl Slot {
    /// All slots in order.
    pub const ALL: [Self; 4] = [Self::Car1, Self::Car2, Self::Car3, Self::Car4];

    /// Index of the slot.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rail side of the slot.
    pub const fn side(self) -> Side {
        match self {
            Self::Car1 | Self::Car2 => Side::Left,
            Self::Car3 | Self::Car4 => Side::Right,
        }
    }

    /// Check if the slot is linked to a top corner.
    pub const fn is_top(self) -> bool {
        matches!(self, Self::Car1 | Self::Car4)
    }

    /// Get the uppercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Car1 => "CAR1",
            Self::Car2 => "CAR2",
            Self::Car3 => "CAR3",
            Self::Car4 => "CAR4",
        }
    }
}

#[test]
fn slot_from_index() {
    for (i, slot) in Slot::ALL.into_iter().enumerate() {
        assert_eq!(Slot::try_from(i), Ok(slot));
        assert_eq!(slot.index(), i);
    }
    assert_eq!(Slot::try_from(4isize), Err(InvalidSlot(4)));
    assert_eq!(Slot::try_from(-1isize), Err(InvalidSlot(-1)));
    assert_eq!(Slot::Car3.side(), Side::Right);
}
