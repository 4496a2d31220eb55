//! Outstanding floor requests
//!
//! An 8-slot boolean table indexed by floor number, slot 0 = ground. The
//! panel link sets slots, the scheduler clears them on arrival, the status
//! reporter packs them into one byte. In the firmware the whole table sits
//! behind a single mutex, and every mutation here touches exactly one slot,
//! so a racing set and clear resolve last-writer-wins without disturbing
//! neighboring slots.

/// Largest number of floors any cabin configuration may address
pub const MAX_FLOORS: usize = 8;

/// Set of floors with an outstanding request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorRequestSet {
    slots: [bool; MAX_FLOORS],
    /// Requests at or above this floor index are rejected
    floor_count: u8,
}

impl FloorRequestSet {
    /// Create an empty request set serving `floor_count` floors
    pub const fn new(floor_count: u8) -> Self {
        Self::from_mask(floor_count, 0)
    }

    /// Create a request set from an initial bitmap (bit i = floor i)
    ///
    /// Bits at or above `floor_count` are dropped.
    pub const fn from_mask(floor_count: u8, mask: u8) -> Self {
        let mut slots = [false; MAX_FLOORS];
        let mut floor = 0;
        while floor < MAX_FLOORS {
            slots[floor] = floor < floor_count as usize && (mask >> floor) & 1 == 1;
            floor += 1;
        }
        Self { slots, floor_count }
    }

    /// Number of floors this set serves
    pub fn floor_count(&self) -> u8 {
        self.floor_count
    }

    /// Record a request for `floor`
    ///
    /// Returns whether the request was accepted. Out-of-range floors are
    /// ignored rather than indexed; the caller may log them but nothing
    /// here can fault.
    pub fn request(&mut self, floor: u8) -> bool {
        if floor >= self.floor_count {
            return false;
        }
        self.slots[floor as usize] = true;
        true
    }

    /// Clear the request for `floor`; called on confirmed arrival
    pub fn clear(&mut self, floor: u8) {
        if floor < self.floor_count {
            self.slots[floor as usize] = false;
        }
    }

    /// Whether `floor` has an outstanding request (out of range reads false)
    pub fn is_requested(&self, floor: u8) -> bool {
        floor < self.floor_count && self.slots[floor as usize]
    }

    /// No floor is requested
    pub fn is_empty(&self) -> bool {
        !self.slots.iter().any(|&s| s)
    }

    /// Pack the table into one byte: bit i = floor i, LSB = ground
    pub fn encode(&self) -> u8 {
        self.slots
            .iter()
            .enumerate()
            .fold(0u8, |mask, (floor, &set)| mask | (u8::from(set) << floor))
    }

    /// Nearest requested floor strictly above `floor`, scanning upward
    pub fn nearest_above(&self, floor: u8) -> Option<u8> {
        (floor + 1..self.floor_count).find(|&f| self.slots[f as usize])
    }

    /// Nearest requested floor at or below `floor`, scanning downward
    ///
    /// The inclusive lower bound is deliberate: a request at the current
    /// floor is honored on the downward scan (and only there).
    pub fn nearest_at_or_below(&self, floor: u8) -> Option<u8> {
        let top = floor.min(self.floor_count.saturating_sub(1));
        (0..=top).rev().find(|&f| self.slots[f as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_and_clear() {
        let mut set = FloorRequestSet::new(4);
        assert!(set.is_empty());

        assert!(set.request(2));
        assert!(set.is_requested(2));
        assert!(!set.is_empty());

        set.clear(2);
        assert!(!set.is_requested(2));
        assert!(set.is_empty());
    }

    #[test]
    fn test_out_of_range_request_ignored() {
        let mut set = FloorRequestSet::new(8);
        let before = set;

        assert!(!set.request(8));
        assert!(!set.request(200));
        assert_eq!(set, before);
    }

    #[test]
    fn test_request_respects_floor_count() {
        // A 4-floor cabin rejects floors 4..8 even though slots exist
        let mut set = FloorRequestSet::new(4);
        assert!(!set.request(4));
        assert!(set.is_empty());
    }

    #[test]
    fn test_single_slot_updates_leave_neighbors_alone() {
        let mut set = FloorRequestSet::new(8);
        set.request(2);
        set.request(3);
        set.request(4);

        set.clear(3);
        assert!(set.is_requested(2));
        assert!(!set.is_requested(3));
        assert!(set.is_requested(4));

        set.request(3);
        assert!(set.is_requested(2));
        assert!(set.is_requested(4));
    }

    #[test]
    fn test_encode_layout() {
        let mut set = FloorRequestSet::new(8);
        set.request(0);
        set.request(3);
        set.request(7);
        assert_eq!(set.encode(), 0b1000_1001);
    }

    #[test]
    fn test_from_mask_drops_out_of_range_bits() {
        let set = FloorRequestSet::from_mask(4, 0b1111_1000);
        assert_eq!(set.encode(), 0b0000_1000);
    }

    #[test]
    fn test_nearest_above_is_exclusive() {
        let mut set = FloorRequestSet::new(8);
        set.request(3);
        set.request(5);

        assert_eq!(set.nearest_above(3), Some(5));
        assert_eq!(set.nearest_above(2), Some(3));
        assert_eq!(set.nearest_above(5), None);
    }

    #[test]
    fn test_nearest_at_or_below_is_inclusive() {
        let mut set = FloorRequestSet::new(8);
        set.request(3);

        assert_eq!(set.nearest_at_or_below(3), Some(3));
        assert_eq!(set.nearest_at_or_below(5), Some(3));
        assert_eq!(set.nearest_at_or_below(2), None);
        assert_eq!(set.nearest_at_or_below(0), None);
    }

    #[test]
    fn test_nearest_at_or_below_at_ground() {
        let mut set = FloorRequestSet::new(8);
        set.request(0);
        assert_eq!(set.nearest_at_or_below(0), Some(0));
    }
}
