pub mod resume;

pub use resume::{
    CritiqueRecord, EducationEntry, ProjectEntry, ResumeRecord, StructuredRecord,
};
