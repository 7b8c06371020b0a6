//! clawcage library - decide which host paths the OpenClaw gateway may see and
//! compile that decision into a container mount plan

pub mod cli;
pub mod config;
pub mod containers;
pub mod openclaw;
pub mod plan;
pub mod scan;
pub mod selection;
pub mod tui;
