pub mod script;

pub use script::{apply, demo_script, replay, Op, Outcome, ParseOpError, Step, DEMO_CAPACITY};
