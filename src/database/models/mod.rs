pub mod user;
pub mod video;

pub use user::{Password, User, UserProfile, UserRow};
pub use video::{NewVideo, Video};
