pub mod context;
pub mod envelope;
pub mod events;
pub mod transcript_ready;
