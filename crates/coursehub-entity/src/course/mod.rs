//! Course catalogue entities: courses, programs, and scheduled sessions.

pub mod model;
pub mod program;
pub mod session;

pub use model::{Course, CoursePatch, CreateCourse};
pub use program::{CreateProgram, Program, ProgramPatch};
pub use session::{CreateSession, Session, SessionPatch};
