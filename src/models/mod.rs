mod submission;

pub use submission::{Marker, NewSubmission, Submission};
