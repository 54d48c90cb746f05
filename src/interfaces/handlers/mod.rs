pub mod comments;
pub mod contact_me;
pub mod home;
pub mod posts;
pub mod projects;
pub mod skills;
pub mod system;
pub mod timeline;
