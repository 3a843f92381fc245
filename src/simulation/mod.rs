pub mod snapshot_generator;
