//! Tessel Core Types
//!
//! This crate provides the foundational types shared by Tessel diagrams:
//!
//! - **Geometry**: points, sizes and bounds ([`geometry`] module)
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Draw**: outlines and rendering surfaces ([`draw`] module)
//! - **Text**: labels and text metrics ([`text`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod text;
