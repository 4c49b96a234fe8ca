mod board;
mod common;
mod filter;
