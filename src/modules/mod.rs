pub mod events;
pub mod tips;
pub mod video_resource;
