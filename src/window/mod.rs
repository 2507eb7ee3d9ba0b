//! PDF Quote Saver - Active window module
//!
//! Reads the focused window title and pulls a PDF file name out of it

/// Window inspection error type
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Windows API error: {0}")]
    Os(String),
}

/// Source of the focused window's title
pub trait WindowInspector {
    /// Title of the window holding input focus, empty if there is none
    fn active_window_title(&self) -> Result<String, WindowError>;
}

/// The desktop's real foreground window
#[derive(Debug, Default, Clone, Copy)]
pub struct ForegroundWindow;

#[cfg(target_os = "windows")]
impl WindowInspector for ForegroundWindow {
    fn active_window_title(&self) -> Result<String, WindowError> {
        use windows::Win32::UI::WindowsAndMessaging::{
            GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW,
        };

        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.0.is_null() {
            return Ok(String::new());
        }

        let len = unsafe { GetWindowTextLengthW(hwnd) };
        if len <= 0 {
            return Ok(String::new());
        }

        let mut buf = vec![0u16; len as usize + 1];
        let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
        if copied <= 0 {
            // Length was non-zero, so an empty copy means the call failed
            return Err(WindowError::Os(windows::core::Error::from_win32().to_string()));
        }

        Ok(String::from_utf16_lossy(&buf[..copied as usize]))
    }
}

#[cfg(not(target_os = "windows"))]
impl WindowInspector for ForegroundWindow {
    fn active_window_title(&self) -> Result<String, WindowError> {
        // No portable foreground-window query; behaves as "no PDF focused"
        Ok(String::new())
    }
}

/// Extract the PDF file name from a window title
///
/// Returns everything up to and including the first case-insensitive
/// ".pdf", trimmed. Tokens such as "notes.pdfx" still match.
pub fn extract_pdf_name(window_title: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with the original title
    let end = window_title.to_ascii_lowercase().find(".pdf")? + ".pdf".len();
    Some(window_title[..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_prefix_through_extension() {
        assert_eq!(extract_pdf_name("spec.pdf - Reader").as_deref(), Some("spec.pdf"));
        assert_eq!(
            extract_pdf_name("  Annual Report 2023.pdf - Adobe Acrobat Reader (64-bit)").as_deref(),
            Some("Annual Report 2023.pdf")
        );
    }

    #[test]
    fn matching_is_case_insensitive_and_keeps_original_case() {
        assert_eq!(extract_pdf_name("THESIS.PDF - SumatraPDF").as_deref(), Some("THESIS.PDF"));
        assert_eq!(extract_pdf_name("Paper.Pdf").as_deref(), Some("Paper.Pdf"));
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(extract_pdf_name("a.pdf and b.pdf").as_deref(), Some("a.pdf"));
    }

    #[test]
    fn longer_extension_is_accepted() {
        assert_eq!(extract_pdf_name("notes.pdfx - Editor").as_deref(), Some("notes.pdf"));
    }

    #[test]
    fn titles_without_pdf_are_rejected() {
        assert_eq!(extract_pdf_name(""), None);
        assert_eq!(extract_pdf_name("Inbox - Mail"), None);
        assert_eq!(extract_pdf_name("report.pd - Viewer"), None);
    }

    #[test]
    fn non_ascii_titles_slice_safely() {
        assert_eq!(extract_pdf_name("Über Café.pdf – Vorschau").as_deref(), Some("Über Café.pdf"));
    }
}
