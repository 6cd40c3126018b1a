//! Direct-URL selection from an extraction result.

use cr_core::ExtractionResult;

/// Pick the URL to return to the caller.
///
/// In order: the top-level direct URL; the first muxed (audio + video)
/// candidate; the last candidate, whatever it carries; otherwise `None`.
pub fn select_direct_url(result: &ExtractionResult) -> Option<String> {
    if let Some(ref url) = result.direct_url {
        return Some(url.clone());
    }

    if let Some(muxed) = result.formats.iter().find(|f| f.is_muxed()) {
        return muxed.url.clone();
    }

    result.formats.last().and_then(|f| f.url.clone())
}
