pub mod buffer;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod document;
pub mod editor;
pub mod file;
pub mod history;
pub mod keymap;
pub mod messages;
pub mod position;
pub mod prompt;
pub mod search;
pub mod selection;
