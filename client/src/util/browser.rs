//! Browser window helpers: confirm and text prompts, page origin and file reads.
//!
//! TRADE-OFFS
//! ==========
//! Everything here needs a live `window`. Server rendering and native tests
//! get inert fallbacks: `confirm` declines, so no destructive request can
//! start outside a browser.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

/// Show a blocking confirmation dialog; true only if the user accepted.
pub fn confirm(message: &str) -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = message;
        false
    }
}

/// Ask for a line of text; `None` when cancelled or outside a browser.
pub fn prompt(message: &str, default: &str) -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.prompt_with_message_and_default(message, default).ok())
            .flatten()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (message, default);
        None
    }
}

/// `scheme://host[:port]` of the current page, empty outside a browser.
pub fn origin() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}

/// Read a file picked in an `<input type="file">` into memory.
///
/// # Errors
///
/// Returns a display message when the browser refuses the read.
#[cfg(feature = "hydrate")]
pub async fn read_file(file: &web_sys::File) -> Result<crate::services::media::MediaUpload, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("could not read {}: {e:?}", file.name()))?;
    Ok(crate::services::media::MediaUpload {
        file_name: file.name(),
        content_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

/// First file selected in the input that fired `ev`.
#[cfg(feature = "hydrate")]
pub fn selected_file(ev: &leptos::ev::Event) -> Option<web_sys::File> {
    use wasm_bindgen::JsCast;

    let input = ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()?;
    let file = input.files()?.get(0);
    // Reset so picking the same file again still fires `change`.
    input.set_value("");
    file
}
