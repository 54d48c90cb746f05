pub mod comment;
pub mod contact_me;
pub mod option_fields;
pub mod post;
pub mod project;
pub mod skill;
pub mod tag;
pub mod timeline;
pub mod translations;
pub mod validation;
