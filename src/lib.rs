//! Specialist-teacher timetabling for school districts.
//!
//! Assigns itinerant and permanent specialist instructors to the daily
//! lesson slots of every class section, then sizes the new positions a
//! district would need to cover what is left.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ClassSection`, `Curriculum`, `DayPlan`,
//!   `Instructor`, `InstructorPool`, `SchoolGroup`, `Timetable`,
//!   `SyntheticPosition`
//! - **`demand`**: Expansion of curriculum quotas into per-slot demand
//! - **`eligibility`**: Hard constraints and candidate scoring for one slot
//! - **`search`**: Randomized restart search per bucket, whole-district runs
//! - **`reconcile`**: Uncovered lessons by (region, subject), coverage KPIs
//! - **`staffing`**: Peak-concurrency position synthesis and workload splits
//! - **`records`**: Flat spreadsheet rows in and out
//! - **`config`**: Engine settings, loadable from TOML
//! - **`validation`**: Input integrity checks (duplicate codes, missing curricula, routes)
//!
//! # Quick start
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use u_timetable::config::EngineConfig;
//! use u_timetable::models::*;
//! use u_timetable::search::{RunInput, TimetableRun};
//! use u_timetable::staffing::{PositionIdAllocator, StaffingSynthesizer};
//!
//! let classes = vec![
//!     ClassSection::new("Escola A", "1 ano", "A", Shift::Morning, "Norte"),
//!     ClassSection::new("Escola A", "1 ano", "B", Shift::Afternoon, "Norte"),
//! ];
//! let curriculum = Curriculum::new().with_requirement("1 ano", "Arte", 2);
//! let staff = vec![Instructor::itinerant("P1", "Norte").with_subject("Arte").with_capacity(30)];
//!
//! let config = EngineConfig::default();
//! let input = RunInput::new(classes.clone(), curriculum.clone(), staff);
//! let report = TimetableRun::new(config.clone())
//!     .execute(&input, &mut StdRng::seed_from_u64(7))
//!     .unwrap();
//! assert!(report.is_fully_covered());
//!
//! let synth = StaffingSynthesizer::new(config);
//! let estimates = synth.analyze(&classes, &curriculum, &DayPlan::default());
//! let positions = synth.propose(&estimates, &classes, &mut PositionIdAllocator::new());
//! assert_eq!(positions.iter().map(|p| p.weekly_lessons).sum::<u32>(), 4);
//! ```
//!
//! # References
//!
//! - Kolisch & Hartmann (2006), "Experimental investigation of heuristics
//!   for resource-constrained project scheduling: An update"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod config;
pub mod demand;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod normalize;
pub mod reconcile;
pub mod records;
pub mod search;
pub mod staffing;
pub mod validation;
