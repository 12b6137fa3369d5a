mod patch;
#[cfg(target_os = "windows")]
mod process;
mod reader;

#[cfg(test)]
pub mod mock;

pub use patch::PatchMemory;
#[cfg(target_os = "windows")]
pub use process::ProcessMemory;
pub use reader::ReadMemory;

#[cfg(test)]
pub use mock::MockMemory;
