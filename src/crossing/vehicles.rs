use crate::crossing::crossroad::Crossroad;
use crate::crossing::directions::Direction;

/// A Bidirectional Autonomous Trolley travelling through the crossing.
///
/// A BAT owns nothing shared; every shared mutation goes through the
/// [`Crossroad`] it is driving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bat {
    /// Unique sequential id, assigned once at creation.
    pub id: u64,
    /// The approach the BAT arrives from.
    pub origin: Direction,
}

impl Bat {
    pub fn new(id: u64, origin: Direction) -> Self {
        Self { id, origin }
    }

    /// Drives the full lifecycle: arrive, cross, leave.
    ///
    /// Each phase blocks as needed; once this returns the BAT has left the
    /// crossing and its gate counter has been given back.
    pub fn run(&self, crossroad: &Crossroad) {
        crossroad.arrive(self);
        crossroad.cross(self);
        crossroad.leave(self);
    }
}
