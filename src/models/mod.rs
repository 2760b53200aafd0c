pub mod question;
pub mod section;
pub mod subject;

pub use question::{ImportMetadata, Question, QuestionBank, QuestionRecord, Track};
pub use section::{Section, SectionKind, SectionSummary, DEFAULT_SECTION_NAME};
pub use subject::Subject;
