#![forbid(unsafe_code)]

pub mod model;
pub mod session;
pub mod time;

pub use session::{
    AiAnswer, Applied, AskTicket, LoadTicket, LoadedLesson, Session, SessionError, SessionPhase,
    Submission,
};
pub use time::Clock;
