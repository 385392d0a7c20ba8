mod outcome;

pub use outcome::{Control, Outcome};
