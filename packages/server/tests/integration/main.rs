mod common;

mod announcement;
mod auth;
mod contact;
mod content;
mod event;
mod gallery;
