//! Per-component command and result handlers of the `Delegate`.

mod avatar;
mod catalog;
mod detail;
mod hero;
mod playback;
mod profile;
mod session;
