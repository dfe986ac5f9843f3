//! API layer - native in-process client and REST surface

pub mod native;
pub mod rest;
