//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the mock machine.  All tests run on the host with no stepper
//! loop or real switches required.

mod mock_hw;
mod service_tests;
