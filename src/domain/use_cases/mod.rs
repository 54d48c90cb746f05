pub mod comment;
pub mod contact;
pub mod extractors;
pub mod post;
pub mod project;
pub mod skill;
pub mod tag;
pub mod timeline;
