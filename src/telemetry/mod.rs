pub mod logging;

pub use logging::init_logging;
#[cfg(test)]
pub(crate) use logging::init_test_logging;
