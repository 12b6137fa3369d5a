//! Configured game window size.
//!
//! The game persists its resolution choice as a registry value. Only two
//! window sizes ever shipped; anything unexpected falls back to the larger
//! one, matching what the game itself renders.

/// Pixel size of the game window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const SMALL: WindowSize = WindowSize {
        width: 640,
        height: 480,
    };
    pub const LARGE: WindowSize = WindowSize {
        width: 800,
        height: 600,
    };
}

/// Map the stored resolution selector to a window size. Absent or
/// unrecognized values mean the larger window.
fn size_for_resolution_value(value: Option<u32>) -> WindowSize {
    match value {
        Some(0) => WindowSize::SMALL,
        _ => WindowSize::LARGE,
    }
}

/// Window size the game is configured to use.
#[cfg(target_os = "windows")]
pub fn configured_window_size() -> WindowSize {
    size_for_resolution_value(registry::read_resolution_value())
}

#[cfg(not(target_os = "windows"))]
pub fn configured_window_size() -> WindowSize {
    size_for_resolution_value(None)
}

#[cfg(target_os = "windows")]
mod registry {
    use tracing::debug;
    use windows::Win32::System::Registry::{
        HKEY, HKEY_CURRENT_USER, KEY_READ, REG_VALUE_TYPE, RegCloseKey, RegOpenKeyExW,
        RegQueryValueExW,
    };
    use windows::core::w;

    pub fn read_resolution_value() -> Option<u32> {
        let mut key = HKEY::default();
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                w!("SOFTWARE\\Blizzard Entertainment\\Diablo II"),
                0,
                KEY_READ,
                &mut key,
            )
        };
        if status.is_err() {
            debug!("Game registry key not present, assuming default window size");
            return None;
        }

        let mut value = 0u32;
        let mut size = std::mem::size_of::<u32>() as u32;
        let mut kind = REG_VALUE_TYPE::default();
        let status = unsafe {
            RegQueryValueExW(
                key,
                w!("Resolution"),
                None,
                Some(&mut kind as *mut _),
                Some(&mut value as *mut u32 as *mut u8),
                Some(&mut size as *mut _),
            )
        };
        let _ = unsafe { RegCloseKey(key) };

        status.is_ok().then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_selects_small_window() {
        assert_eq!(size_for_resolution_value(Some(0)), WindowSize::SMALL);
    }

    #[test]
    fn test_absent_or_other_selects_large_window() {
        assert_eq!(size_for_resolution_value(None), WindowSize::LARGE);
        assert_eq!(size_for_resolution_value(Some(1)), WindowSize::LARGE);
        assert_eq!(size_for_resolution_value(Some(42)), WindowSize::LARGE);
    }
}
