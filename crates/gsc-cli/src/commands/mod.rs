pub mod batch;
pub mod export;
pub mod generate;
pub mod solve;
pub mod solvers;
pub mod util;
