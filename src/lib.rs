//! Sketchy, a drawing toy in the style of the etch-a-sketch.
//!
//! A cursor moves over a full-screen canvas under pointer or joystick
//! control and leaves a trail. Pressing the shake button fades the drawing
//! under a fresh background.

pub mod canvas;
pub mod config;
pub mod controller;
pub mod ui;
