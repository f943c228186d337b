//! Pinning the window to the desktop surface.
//!
//! On Windows the window is parented under the shell's `Progman` window,
//! which owns the wallpaper, and marked `WS_EX_TOOLWINDOW` so it stays out
//! of the taskbar and Alt+Tab. Elsewhere these calls do nothing and the
//! window behaves as a normal undecorated top-level window.

use winit::window::Window;

/// Reparent `window` under the desktop root and make it a tool window.
///
/// Returns false when the window stays a normal top-level window, either
/// because the desktop root was not found or the platform has none.
pub fn unstyle(window: &Window) -> bool {
    imp::unstyle(window)
}

/// Place `window` at the bottom of the Z-order, keeping its geometry and
/// without activating it.
pub fn send_to_bottom(window: &Window) {
    imp::send_to_bottom(window);
}

/// Detach `window` from the desktop root and clear the tool-window style.
pub fn restyle(window: &Window) {
    imp::restyle(window);
}

#[cfg(target_os = "windows")]
mod imp {
    use std::iter::once;
    use windows_sys::Win32::Foundation::HWND;
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        FindWindowW, GWL_EXSTYLE, GetWindowLongW, HWND_BOTTOM, SWP_NOACTIVATE, SWP_NOMOVE,
        SWP_NOSIZE, SWP_SHOWWINDOW, SetParent, SetWindowLongW, SetWindowPos, WS_EX_TOOLWINDOW,
    };
    use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};
    use winit::window::Window;

    /// Class name of the shell window that owns the wallpaper
    const DESKTOP_ROOT_CLASS: &str = "Progman";

    fn hwnd(window: &Window) -> Option<HWND> {
        match window.window_handle().ok()?.as_raw() {
            RawWindowHandle::Win32(handle) => Some(handle.hwnd.get() as HWND),
            _ => None,
        }
    }

    fn wide(text: &str) -> Vec<u16> {
        text.encode_utf16().chain(once(0)).collect()
    }

    pub fn unstyle(window: &Window) -> bool {
        let Some(hwnd) = hwnd(window) else {
            log::warn!("No Win32 handle for the window; desktop embedding skipped");
            return false;
        };
        let class = wide(DESKTOP_ROOT_CLASS);

        // SAFETY: `hwnd` belongs to a live window owned by this thread and
        // `class` is a NUL-terminated UTF-16 buffer that outlives the call.
        unsafe {
            let root = FindWindowW(class.as_ptr(), std::ptr::null());
            if root.is_null() {
                log::warn!("Desktop root window {DESKTOP_ROOT_CLASS:?} not found; staying a normal window");
                return false;
            }
            SetParent(hwnd, root);

            let style = GetWindowLongW(hwnd, GWL_EXSTYLE);
            SetWindowLongW(hwnd, GWL_EXSTYLE, style | WS_EX_TOOLWINDOW as i32);
        }
        log::info!("Window embedded into the desktop");
        true
    }

    pub fn send_to_bottom(window: &Window) {
        let Some(hwnd) = hwnd(window) else {
            return;
        };
        // SAFETY: `hwnd` is a live window; the flags keep position and size
        // and suppress activation.
        unsafe {
            SetWindowPos(
                hwnd,
                HWND_BOTTOM,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_SHOWWINDOW,
            );
        }
    }

    pub fn restyle(window: &Window) {
        let Some(hwnd) = hwnd(window) else {
            return;
        };
        // SAFETY: `hwnd` is a live window; a null parent makes it top-level again.
        unsafe {
            let style = GetWindowLongW(hwnd, GWL_EXSTYLE);
            SetWindowLongW(hwnd, GWL_EXSTYLE, style & !(WS_EX_TOOLWINDOW as i32));
            SetParent(hwnd, std::ptr::null_mut());
        }
        log::info!("Window detached from the desktop");
    }
}

#[cfg(not(target_os = "windows"))]
mod imp {
    use winit::window::Window;

    pub fn unstyle(_window: &Window) -> bool {
        log::debug!("Desktop embedding is not supported on this platform");
        false
    }

    pub fn send_to_bottom(_window: &Window) {
        log::debug!("send_to_bottom is a no-op on this platform");
    }

    pub fn restyle(_window: &Window) {
        log::debug!("restyle is a no-op on this platform");
    }
}
