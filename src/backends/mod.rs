mod headless;
pub use headless::Headless;

#[cfg(target_os = "linux")]
mod fbdev;
#[cfg(target_os = "linux")]
pub use fbdev::{FbDev, FbDevOptions};
