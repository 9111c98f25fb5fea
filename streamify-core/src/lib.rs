#![allow(clippy::new_without_default)]

pub mod actor;
pub mod error;
pub mod media;
pub mod player;
pub mod session;
pub mod util;
pub mod webapi;
