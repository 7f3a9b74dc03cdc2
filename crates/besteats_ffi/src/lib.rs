//! Mobile host bridge for BestEats core.

pub mod api;
