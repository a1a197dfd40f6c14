//! Integration test harness.

mod helpers;

mod file_test;
mod folder_test;
