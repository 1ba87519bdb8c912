//! trispin - a window with a spinning, vertex-coloured triangle
//!
//! The binary sequences these pieces: load [`config::AppConfig`], create the
//! window, bring up the GPU and the triangle pipeline, then advance the
//! rotation once per frame, sleeping between frames.

pub mod config;
pub mod error;
pub mod input;
pub mod systems;
