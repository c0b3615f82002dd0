pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fallback;
pub mod notice;
pub mod pages;
pub mod route;
pub mod session;
pub mod widgets;

#[cfg(test)]
pub(crate) mod testing;
