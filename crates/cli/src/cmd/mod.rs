mod extract;

pub use extract::{ExtractArgs, cmd_extract};
