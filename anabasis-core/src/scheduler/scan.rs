//! SCAN destination arbitration and arrival detection
//!
//! The scheduler runs one [`tick`](Scheduler::tick) per control-loop pass
//! and tells the caller what to do with the motor. It owns direction,
//! current floor, and the seek state machine; the caller owns the motor,
//! the dwells, and the shared-state lock around each tick.

use crate::requests::FloorRequestSet;
use crate::traits::SensorArray;

use super::plan::{FloorPlan, StallPolicy};
use super::Direction;

/// Cabin motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    /// No destination; waiting for a request
    Idle,
    /// Traveling toward a chosen destination
    Seeking {
        /// The floor being pursued
        destination: u8,
    },
    /// Arrival confirmed; dwelling before the next seek
    Arriving {
        /// The floor just reached
        floor: u8,
    },
}

/// What the control task should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickCommand {
    /// Nothing to service; poll again after the idle backoff
    Idle,
    /// Drive one step burst in `direction`, then yield briefly
    Drive {
        /// Travel direction for the burst
        direction: Direction,
    },
    /// Destination reached: halt the motor, dwell the settle delay, then
    /// call [`Scheduler::settle_complete`]
    Arrived {
        /// The floor just reached
        floor: u8,
    },
    /// Seek abandoned after the stall window budget: halt the motor and
    /// report diagnostics
    Stalled {
        /// The destination that was never reached
        destination: u8,
        /// No-progress windows that elapsed before giving up
        windows: u8,
    },
}

/// SCAN floor scheduler
pub struct Scheduler {
    plan: FloorPlan,
    stall: StallPolicy,
    /// Half-steps the control task drives per `Drive` command; used for
    /// dead-reckoning distance accounting
    burst_steps: u32,
    direction: Direction,
    current_floor: u8,
    motion: Motion,
    /// Drive ticks since the last sensor progress in this seek
    ticks_without_progress: u32,
    /// No-progress windows elapsed in this seek
    stall_windows: u8,
    /// Half-steps driven past the last sensed floor toward a
    /// dead-reckoning stop
    overrun_steps: u32,
}

impl Scheduler {
    /// Create a scheduler for one shaft
    ///
    /// `burst_steps` must match the burst the control task actually drives
    /// per [`TickCommand::Drive`]; dead-reckoning arrival is counted in
    /// those units.
    pub fn new(plan: FloorPlan, stall: StallPolicy, burst_steps: u32, initial_floor: u8) -> Self {
        Self {
            plan,
            stall,
            burst_steps,
            direction: Direction::Up,
            current_floor: initial_floor,
            motion: Motion::Idle,
            ticks_without_progress: 0,
            stall_windows: 0,
            overrun_steps: 0,
        }
    }

    /// Last floor at which arrival was confirmed
    pub fn current_floor(&self) -> u8 {
        self.current_floor
    }

    /// Current travel direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current motion state
    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Pick the next destination, flipping direction when the current one
    /// is exhausted
    ///
    /// Scanning up starts one floor above the cabin; scanning down includes
    /// the cabin's own floor. The asymmetry is deliberate: a request at the
    /// current floor is honored on the way down, and never triggers a
    /// pointless reversal on the way up. When the direction is already Down
    /// and nothing is at or below, the direction flips to Up but no second
    /// scan happens this round - the next tick retries upward.
    pub fn select_destination(&mut self, requests: &FloorRequestSet) -> Option<u8> {
        let mut destination = None;
        if self.direction == Direction::Up {
            destination = requests.nearest_above(self.current_floor);
            if destination.is_none() {
                self.direction = Direction::Down;
            }
        }
        if self.direction == Direction::Down {
            destination = requests.nearest_at_or_below(self.current_floor);
            if destination.is_none() {
                self.direction = Direction::Up;
            }
        }
        destination
    }

    /// Run one control-loop pass
    ///
    /// Must be called with the request table locked; arrival clears the
    /// serviced slot under the same lock that the panel link writes under.
    pub fn tick(
        &mut self,
        requests: &mut FloorRequestSet,
        sensors: &impl SensorArray,
    ) -> TickCommand {
        match self.motion {
            Motion::Arriving { .. } => TickCommand::Idle,
            Motion::Idle => match self.select_destination(requests) {
                Some(destination) => {
                    self.motion = Motion::Seeking { destination };
                    self.ticks_without_progress = 0;
                    self.stall_windows = 0;
                    self.overrun_steps = 0;
                    // The selection tick also seeks: a request at the
                    // current floor services immediately, without a burst.
                    self.seek(requests, sensors, destination)
                }
                None => TickCommand::Idle,
            },
            Motion::Seeking { destination } => self.seek(requests, sensors, destination),
        }
    }

    /// Called by the control task when the post-arrival settle dwell ends
    pub fn settle_complete(&mut self) {
        if matches!(self.motion, Motion::Arriving { .. }) {
            self.motion = Motion::Idle;
        }
    }

    fn seek(
        &mut self,
        requests: &mut FloorRequestSet,
        sensors: &impl SensorArray,
        destination: u8,
    ) -> TickCommand {
        if self.arrival_detected(sensors, destination) {
            requests.clear(destination);
            self.current_floor = destination;
            self.motion = Motion::Arriving { floor: destination };
            return TickCommand::Arrived { floor: destination };
        }

        // Passing an intermediate floor updates the reported position
        // without stopping, and counts as seek progress.
        if let Some(next) = self.next_floor() {
            if next != destination && sensors.cabin_present(next) {
                self.current_floor = next;
                self.ticks_without_progress = 0;
            }
        }

        // Between the last sensed floor and a dead-reckoning stop, distance
        // driven is the only progress there is; it is bounded by the step
        // budget, so it also resets the stall window.
        if self.dead_reckoning_leg(destination) {
            self.overrun_steps = self.overrun_steps.saturating_add(self.burst_steps);
            self.ticks_without_progress = 0;
        } else {
            self.ticks_without_progress += 1;
        }

        if self.ticks_without_progress >= self.stall.ticks_per_window {
            self.ticks_without_progress = 0;
            self.stall_windows += 1;
            if self.stall_windows >= self.stall.max_windows {
                // Drop the unreachable request: leaving it set would make
                // the next selection round pick it right back.
                requests.clear(destination);
                self.motion = Motion::Idle;
                return TickCommand::Stalled {
                    destination,
                    windows: self.stall_windows,
                };
            }
        }

        TickCommand::Drive {
            direction: self.direction,
        }
    }

    fn arrival_detected(&self, sensors: &impl SensorArray, destination: u8) -> bool {
        if let Some(dead) = self.plan.dead_reckoning {
            if destination == dead.floor {
                return self.overrun_steps >= dead.steps;
            }
        }

        let sensor_floor = match self.direction {
            Direction::Up => destination,
            Direction::Down => destination.saturating_add(self.plan.descent_sensor_offset),
        };
        sensors.cabin_present(sensor_floor)
    }

    /// The adjacent floor ahead in the travel direction, if one exists
    fn next_floor(&self) -> Option<u8> {
        match self.direction {
            Direction::Up => {
                let next = self.current_floor + 1;
                (next < self.plan.floor_count).then_some(next)
            }
            Direction::Down => self.current_floor.checked_sub(1),
        }
    }

    /// Whether the cabin is on the sensorless final leg toward a
    /// dead-reckoning floor
    fn dead_reckoning_leg(&self, destination: u8) -> bool {
        match self.plan.dead_reckoning {
            Some(dead) => {
                destination == dead.floor
                    && self.direction == Direction::Down
                    && self.current_floor == dead.floor.saturating_add(1)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::plan::DeadReckoning;
    use super::*;

    /// Sensor fake: one switchable bool per floor slot
    struct FakeSensors {
        present: [bool; 8],
    }

    impl FakeSensors {
        fn none() -> Self {
            Self {
                present: [false; 8],
            }
        }

        fn at(floor: u8) -> Self {
            let mut sensors = Self::none();
            sensors.set(floor, true);
            sensors
        }

        fn set(&mut self, floor: u8, present: bool) {
            self.present[floor as usize] = present;
        }
    }

    impl SensorArray for FakeSensors {
        fn cabin_present(&self, floor: u8) -> bool {
            // Out-of-range floors behave like unmapped sensors
            self.present.get(floor as usize).copied().unwrap_or(false)
        }
    }

    fn relaxed_stall() -> StallPolicy {
        StallPolicy {
            ticks_per_window: 1000,
            max_windows: 3,
        }
    }

    fn make_scheduler(floor_count: u8, initial_floor: u8) -> Scheduler {
        Scheduler::new(
            FloorPlan::simple(floor_count),
            relaxed_stall(),
            10,
            initial_floor,
        )
    }

    fn requests_of(floor_count: u8, floors: &[u8]) -> FloorRequestSet {
        let mut set = FloorRequestSet::new(floor_count);
        for &floor in floors {
            set.request(floor);
        }
        set
    }

    #[test]
    fn test_scan_continues_in_current_direction() {
        // Requests {2, 5}, cabin at 3 going up: the nearer floor behind is
        // ignored, 5 wins.
        let mut scheduler = make_scheduler(8, 3);
        let requests = requests_of(8, &[2, 5]);

        assert_eq!(scheduler.select_destination(&requests), Some(5));
        assert_eq!(scheduler.direction(), Direction::Up);
    }

    #[test]
    fn test_scan_reverses_when_exhausted() {
        // After servicing 5 with only {2} left, the scan flips down.
        let mut scheduler = make_scheduler(8, 5);
        let requests = requests_of(8, &[2]);

        assert_eq!(scheduler.select_destination(&requests), Some(2));
        assert_eq!(scheduler.direction(), Direction::Down);
    }

    #[test]
    fn test_current_floor_honored_only_scanning_down() {
        // A request at the cabin's own floor is invisible to the upward
        // scan and selected by the downward scan.
        let mut scheduler = make_scheduler(8, 3);
        let requests = requests_of(8, &[3]);

        assert_eq!(scheduler.select_destination(&requests), Some(3));
        assert_eq!(scheduler.direction(), Direction::Down);

        // With a floor above also pending, up keeps winning and the
        // same-floor request waits for the return pass.
        let mut scheduler = make_scheduler(8, 3);
        let requests = requests_of(8, &[3, 5]);
        assert_eq!(scheduler.select_destination(&requests), Some(5));
        assert_eq!(scheduler.direction(), Direction::Up);
    }

    #[test]
    fn test_down_exhausted_flips_without_second_scan() {
        // Going down with requests only above: this round yields nothing
        // and flips the direction; the next round finds the floor above.
        let mut scheduler = make_scheduler(8, 3);
        scheduler.direction = Direction::Down;
        let requests = requests_of(8, &[5]);

        assert_eq!(scheduler.select_destination(&requests), None);
        assert_eq!(scheduler.direction(), Direction::Up);
        assert_eq!(scheduler.select_destination(&requests), Some(5));
    }

    #[test]
    fn test_no_requests_idles() {
        let mut scheduler = make_scheduler(8, 3);
        let mut requests = FloorRequestSet::new(8);
        let sensors = FakeSensors::none();

        assert_eq!(scheduler.tick(&mut requests, &sensors), TickCommand::Idle);
        assert_eq!(scheduler.motion(), Motion::Idle);
    }

    #[test]
    fn test_seek_and_arrive_end_to_end() {
        // Requests {3}, cabin at 0: drive up until sensor 3 fires, then
        // stop, clear, settle, idle.
        let mut scheduler = make_scheduler(4, 0);
        let mut requests = requests_of(4, &[3]);
        let mut sensors = FakeSensors::none();

        for _ in 0..5 {
            assert_eq!(
                scheduler.tick(&mut requests, &sensors),
                TickCommand::Drive {
                    direction: Direction::Up
                }
            );
        }
        assert_eq!(scheduler.motion(), Motion::Seeking { destination: 3 });

        sensors.set(3, true);
        assert_eq!(
            scheduler.tick(&mut requests, &sensors),
            TickCommand::Arrived { floor: 3 }
        );
        assert_eq!(scheduler.current_floor(), 3);
        assert!(requests.is_empty());
        assert_eq!(scheduler.motion(), Motion::Arriving { floor: 3 });

        scheduler.settle_complete();
        assert_eq!(scheduler.motion(), Motion::Idle);
        assert_eq!(scheduler.tick(&mut requests, &sensors), TickCommand::Idle);
    }

    #[test]
    fn test_request_at_current_floor_services_without_motion() {
        // Selection and arrival land on the same tick when the cabin is
        // already standing at the requested floor.
        let mut scheduler = make_scheduler(4, 2);
        let mut requests = requests_of(4, &[2]);
        let sensors = FakeSensors::at(2);

        assert_eq!(
            scheduler.tick(&mut requests, &sensors),
            TickCommand::Arrived { floor: 2 }
        );
        assert!(requests.is_empty());
    }

    #[test]
    fn test_passing_floor_updates_position_without_stopping() {
        let mut scheduler = make_scheduler(4, 0);
        let mut requests = requests_of(4, &[3]);
        let mut sensors = FakeSensors::none();

        scheduler.tick(&mut requests, &sensors);
        assert_eq!(scheduler.current_floor(), 0);

        sensors.set(1, true);
        assert_eq!(
            scheduler.tick(&mut requests, &sensors),
            TickCommand::Drive {
                direction: Direction::Up
            }
        );
        assert_eq!(scheduler.current_floor(), 1);
        assert!(requests.is_requested(3));
    }

    #[test]
    fn test_descent_sensor_offset_reads_one_above() {
        let plan = FloorPlan {
            floor_count: 4,
            descent_sensor_offset: 1,
            dead_reckoning: None,
        };
        let mut scheduler = Scheduler::new(plan, relaxed_stall(), 10, 3);
        let mut requests = requests_of(4, &[1]);

        // Descending to 1: the floor-2 sensor is the arrival signal.
        let sensors = FakeSensors::at(2);
        assert_eq!(
            scheduler.tick(&mut requests, &sensors),
            TickCommand::Arrived { floor: 1 }
        );
        assert_eq!(scheduler.current_floor(), 1);
    }

    #[test]
    fn test_dead_reckoning_arrival_by_step_budget() {
        let plan = FloorPlan {
            floor_count: 4,
            descent_sensor_offset: 0,
            dead_reckoning: Some(DeadReckoning { floor: 0, steps: 30 }),
        };
        // burst 10 -> three drive bursts past floor 1 reach the budget
        let mut scheduler = Scheduler::new(plan, relaxed_stall(), 10, 2);
        let mut requests = requests_of(4, &[0]);
        let mut sensors = FakeSensors::none();

        // First leg: sensors still in play down to floor 1
        scheduler.tick(&mut requests, &sensors);
        sensors.set(1, true);
        scheduler.tick(&mut requests, &sensors);
        assert_eq!(scheduler.current_floor(), 1);
        sensors.set(1, false);

        // Final sensorless leg: budget of 30 at 10 per burst
        scheduler.tick(&mut requests, &sensors);
        scheduler.tick(&mut requests, &sensors);
        assert_eq!(
            scheduler.tick(&mut requests, &sensors),
            TickCommand::Arrived { floor: 0 }
        );
        assert_eq!(scheduler.current_floor(), 0);
        assert!(requests.is_empty());
    }

    #[test]
    fn test_stall_gives_up_and_drops_request() {
        let mut scheduler = Scheduler::new(
            FloorPlan::simple(4),
            StallPolicy {
                ticks_per_window: 5,
                max_windows: 2,
            },
            10,
            0,
        );
        let mut requests = requests_of(4, &[3]);
        let sensors = FakeSensors::none(); // cabin never moves

        let mut stalled = None;
        for _ in 0..20 {
            match scheduler.tick(&mut requests, &sensors) {
                TickCommand::Stalled {
                    destination,
                    windows,
                } => {
                    stalled = Some((destination, windows));
                    break;
                }
                TickCommand::Drive { .. } => {}
                other => panic!("unexpected command {other:?}"),
            }
        }

        assert_eq!(stalled, Some((3, 2)));
        assert_eq!(scheduler.motion(), Motion::Idle);
        assert!(requests.is_empty(), "unreachable request must be dropped");
    }

    #[test]
    fn test_unmapped_sensor_floor_never_arrives() {
        // Floor 6 exists in the plan but has no sensor: the seek can only
        // end through the stall path, never through a phantom arrival.
        let mut scheduler = Scheduler::new(
            FloorPlan::simple(8),
            StallPolicy {
                ticks_per_window: 4,
                max_windows: 1,
            },
            10,
            5,
        );
        let mut requests = requests_of(8, &[6]);
        let sensors = FakeSensors::none();

        let mut saw_arrival = false;
        for _ in 0..10 {
            match scheduler.tick(&mut requests, &sensors) {
                TickCommand::Arrived { .. } => saw_arrival = true,
                TickCommand::Stalled { destination, .. } => {
                    assert_eq!(destination, 6);
                    break;
                }
                _ => {}
            }
        }
        assert!(!saw_arrival);
    }
}
