pub mod announcement;
pub mod auth;
pub mod contact;
pub mod content;
pub mod event;
pub mod faculty;
pub mod gallery;
pub mod shared;
