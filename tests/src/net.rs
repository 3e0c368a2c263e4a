#[cfg(target_os = "linux")]
mod interface_test;
mod util;
