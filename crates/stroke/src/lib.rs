//! Sumi stroke engine - freehand stroke resampling and smoothing
//!
//! This crate turns a sparse, jittery sequence of pointer/stylus samples
//! into a dense, evenly spaced sequence of stamp points suitable for
//! painting a brush texture:
//! - [`sample::StrokeSample`] - Input sample / stamp point value type
//! - [`settings::StrokeSettings`] - Smoothing and spacing factors
//! - [`queue::PointQueue`] - Collected point queue with a single read cursor
//! - [`spline::SplineSegment`] - Arc-length parameterized Catmull-Rom piece
//! - [`engine::StrokeEngine`] - Incremental stroke resampling engine
//!
//! The engine is driven synchronously from an input-event callback or a
//! render tick: feed each sample with [`engine::StrokeEngine::add_point`],
//! pull stamps with [`engine::StrokeEngine::retrieve_next_stamp_point`]
//! until it returns `None`, and call [`engine::StrokeEngine::finalize`]
//! when the pointer is released, draining once more.

pub mod constants;
pub mod engine;
pub mod queue;
pub mod sample;
pub mod settings;
pub mod spline;

pub use constants::*;
pub use engine::*;
pub use queue::*;
pub use sample::*;
pub use settings::*;
pub use spline::*;
