mod lesson_vm;

pub use lesson_vm::{
    AiVm, LANGUAGE_CHOICES, LanguageChoiceVm, LessonVm, OptionFeedback, OptionVm, QuestionVm,
    ResultVm, lesson_state,
};
