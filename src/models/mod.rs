//! Timetabling domain models.
//!
//! Provides the value types the engine reads (class sections, curriculum,
//! instructors, school groups, region rules) and the ones it produces
//! (timetables, synthetic positions).
//!
//! # Domain Mappings
//!
//! | u-timetable | Generic scheduling |
//! |-------------|--------------------|
//! | ClassSection | Task (demand owner) |
//! | DemandItem (see `demand`) | Activity |
//! | Instructor | Resource (human) |
//! | Timetable | Schedule |

mod class_section;
mod curriculum;
mod instructor;
mod position;
mod region;
mod school_group;
mod timetable;

pub use class_section::{ClassSection, Shift, Weekday};
pub use curriculum::{Curriculum, CurriculumRequirement, DayPlan};
pub use instructor::{
    EmploymentKind, Instructor, InstructorLoad, InstructorPool, InstructorState, ShiftPreference,
};
pub use position::SyntheticPosition;
pub use region::{
    RegionCompatibility, RegionPair, COMPATIBLE_PAIR_TIER, SAME_REGION_TIER,
};
pub use school_group::{SchoolAdjacency, SchoolGroup};
pub use timetable::{Cell, Timetable, TimetableRow, EMPTY_CELL_MARKER, SLOTS_PER_DAY};
