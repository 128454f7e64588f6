pub mod flex_solver;
pub mod pagination;
