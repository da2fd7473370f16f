pub mod db;
pub mod party;
pub mod queue;
pub mod redis;
