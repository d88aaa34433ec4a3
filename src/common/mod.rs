pub mod coordinate_systems;
