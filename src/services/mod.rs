pub mod extractor;
pub mod group_sync;
pub mod token;
pub mod update;
