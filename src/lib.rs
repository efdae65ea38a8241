#![forbid(unsafe_code)]

pub mod check;
pub mod classification;
pub mod cli;
pub mod episodes;
pub mod logging;
pub mod matching;
pub mod page;
pub mod pipeline;
pub mod records;
pub mod resolve;
pub mod sources;
pub mod store;
