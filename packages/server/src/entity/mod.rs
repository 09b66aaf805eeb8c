pub mod announcement;
pub mod contact_message;
pub mod content;
pub mod event;
pub mod faculty_member;
pub mod gallery_item;
pub mod user;
