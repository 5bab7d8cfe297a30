pub mod check;
pub mod locate_window;
pub mod template;

#[cfg(test)]
#[path = "../commands_test.rs"]
mod commands_test;
