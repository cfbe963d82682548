pub mod conf;
pub mod controller;
pub mod logging;
pub mod monitor;
pub mod service;

#[cfg(test)]
mod test_support;
