//! Orbiter `.msh` text meshes (header `MSHX1`).
pub mod reader;
pub mod types;
pub mod writer;

#[cfg(test)]
mod tests;
