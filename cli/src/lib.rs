pub mod pipeline;
pub mod pscalc_commands;
pub mod report;
