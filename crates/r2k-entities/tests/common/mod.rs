#![allow(dead_code)]

pub mod mock_call_control;
pub mod pool_test;

pub use mock_call_control::{MockCallControl, UpCall};
pub use pool_test::*;
