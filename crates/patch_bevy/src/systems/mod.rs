//! Patch LOD systems, run in `Update` in the order listed by
//! [`crate::PatchBevyPlugin`].

pub mod console;
pub mod entities;
pub mod lod;
pub mod startup;
