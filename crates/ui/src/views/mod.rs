mod lesson;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use lesson::LessonView;
pub use state::{ViewError, ViewState};
