pub mod graph;
pub mod cust_error;
pub mod cover;
pub mod heuristics;
pub mod cnf;
pub mod oracle;
pub mod exact_search;
pub mod commands;
pub mod session;
pub mod generate;
pub mod config;
