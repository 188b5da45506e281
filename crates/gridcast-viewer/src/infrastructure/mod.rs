//! Infrastructure layer for the viewer.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `gridcast_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`renderer`** – `FrameRenderer` implementations: plain text rows and
//!   JSON snapshots, both over any `std::io::Write`.
//!
//! - **`storage`** – TOML configuration file loading and saving.
//!
//! - **`demo`** – A built-in sample stream for `--emit-demo`.

pub mod demo;
pub mod renderer;
pub mod storage;
