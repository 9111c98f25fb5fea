#![allow(clippy::new_without_default)]

pub mod cli;
pub mod cmd;
mod controller;
pub mod data;
pub mod delegate;
pub mod task;
mod timer;
pub mod view;

pub use crate::{
    cmd::{Command, Event},
    delegate::{Delegate, EngineFactory},
};
