pub mod clear;
pub mod launch;
pub mod list;
pub mod repair;
pub mod sync;
