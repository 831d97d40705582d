//! Per-navigation configuration threaded through the pipeline as plain data
//! (§4.8, §9 "Configuration"), grounded on hastur's `engine::Options`.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigateOptions {
    pub layout_width: f32,
    pub viewport_height: f32,
    pub dark_mode: bool,
    pub enable_js: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        NavigateOptions { layout_width: 600.0, viewport_height: 800.0, dark_mode: false, enable_js: false }
    }
}

impl NavigateOptions {
    pub(crate) fn media_context(&self) -> css::MediaContext {
        css::MediaContext {
            viewport_width: self.layout_width,
            viewport_height: self.viewport_height,
            dark_mode: self.dark_mode,
            ..css::MediaContext::default()
        }
    }

    pub(crate) fn resolution_info(&self) -> css::ResolutionInfo {
        css::ResolutionInfo { viewport_width: self.layout_width, viewport_height: self.viewport_height, ..css::ResolutionInfo::default() }
    }
}
