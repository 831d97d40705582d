//! The engine orchestrator (§4.8): `navigate`/`relayout`/`load`. Grounded on
//! hastur's `engine::Engine::navigate`/`relayout`/`load`, adapted from a
//! class holding `std::unique_ptr<StyledNode>` (pointer stability across
//! moves, fine in C++) to Rust's ownership model, where a styled/layout
//! tree borrowing the DOM cannot also be stored *alongside* that DOM in a
//! freely-movable struct. [`PageState`] therefore owns only the data that
//! survives a navigation (URL, response, DOM, stylesheet); [`relayout`]
//! rebuilds the styled and layout trees on demand and hands them to a
//! caller-supplied continuation, which is where the borrow from `page.dom`
//! actually gets used (painting, dumping, asserting).

use core_types::{RequestId, ResourceKind};
use html::Document;
use layout::{FontCache, ImageSizeLookup, LayoutBox, LayoutContext};
use log::{info, warn};
use net::ProtocolHandler;
use url::Url;

use crate::default_stylesheet::default_stylesheet;
use crate::error::NavigationError;
use crate::options::NavigateOptions;

/// Everything a navigation produces that can be freely stored, moved, and
/// handed back to `relayout` later (§4.8 `PageState`).
pub struct PageState {
    pub uri: Url,
    pub response: net::Response,
    pub dom: Document,
    pub stylesheet: css::Stylesheet,
}

/// Raw fetch with redirect handling, exposed for sub-resource loads
/// (images, favicons) per §4.8.
pub fn load(handler: &dyn ProtocolHandler, url: Url) -> Result<(net::Response, Url), net::NetError> {
    net::load(handler, url)
}

/// §4.8 `navigate`: fetch, decompress, parse, assemble the stylesheet (UA
/// + inline `<style>` + fetched `<link>` sheets, spliced in document
/// order), then hand control to `relayout` for styling/layout of the
/// result.
pub fn navigate(handler: &dyn ProtocolHandler, url: Url, options: &NavigateOptions) -> Result<PageState, NavigationError> {
    info!("navigating to {url} ({:?})", ResourceKind::Html);
    let (mut response, final_url) = load(handler, url.clone()).map_err(|source| NavigationError { uri: url.clone(), source })?;

    if let Some(encoding) = response.header("content-encoding").map(str::to_string) {
        response.body = net::decompress(&response.body, &encoding)
            .map_err(|source| NavigationError { uri: final_url.clone(), source })?;
    }

    let dom = html::parse(&response.body, html::ParseOptions { enable_js: options.enable_js });

    if options.enable_js {
        tokenize_scripts(&dom);
    }

    let mut stylesheet = default_stylesheet();

    let mut style_elements = Vec::new();
    html::dom_utils::collect_style_texts(&dom.root, &mut style_elements);
    for style_el in style_elements {
        let text = html::dom_utils::style_text_of(style_el);
        stylesheet.splice(css::parse_stylesheet(&text));
    }

    let mut link_elements = Vec::new();
    html::dom_utils::collect_stylesheet_links(&dom.root, &mut link_elements);
    let fetch_targets: Vec<Url> = link_elements
        .iter()
        .filter_map(|link| {
            let href = link.attr("href")?;
            match final_url.join(href) {
                Ok(u) => Some(u),
                Err(_) => {
                    warn!("failed to parse href {href:?}, skipping stylesheet");
                    None
                }
            }
        })
        .collect();

    for fetched in fetch_stylesheets(handler, &fetch_targets) {
        stylesheet.splice(fetched);
    }

    info!("styling dom with {} rules", stylesheet.rules.len());
    Ok(PageState { uri: final_url, response, dom, stylesheet })
}

/// Tokenizes every `<script>` body purely to flag malformed script text
/// (an unterminated string literal) without ever evaluating it, per the
/// explicit JS Non-goal.
fn tokenize_scripts(dom: &Document) {
    let mut scripts = Vec::new();
    html::dom_utils::collect_script_texts(&dom.root, &mut scripts);
    for script in scripts {
        let text = html::dom_utils::style_text_of(script);
        for token in js::tokenize(&text) {
            if token.kind == js::TokenKind::String && token.text.len() == 1 {
                warn!("unterminated string literal in <script>: {}", token.text);
            }
        }
    }
}

/// One task per `<link>`, joined in issue order (not completion order) so
/// the spliced stylesheet matches document order regardless of which
/// download finishes first (§4.8, §5 "Ordering guarantees"). Each task gets
/// a [`RequestId`] (its issue index) purely so its log lines can be told
/// apart when several stylesheet fetches race each other (§5 "Shared
/// resources").
fn fetch_stylesheets(handler: &dyn ProtocolHandler, targets: &[Url]) -> Vec<css::Stylesheet> {
    std::thread::scope(|scope| {
        let tasks: Vec<_> = targets
            .iter()
            .enumerate()
            .map(|(id, url)| scope.spawn(move || fetch_one_stylesheet(handler, id as RequestId, url)))
            .collect();
        tasks.into_iter().map(|t| t.join().unwrap_or_default()).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use net::test_support::MockProtocolHandler;
    use net::StatusLine;

    fn ok(body: &str) -> net::Response {
        net::Response { status_line: StatusLine::default(), headers: Vec::new(), body: body.as_bytes().to_vec() }
    }

    fn redirect_to(location: &str) -> net::Response {
        net::Response {
            status_line: StatusLine { code: 301, reason: "Moved Permanently".to_string(), ..Default::default() },
            headers: vec![("Location".to_string(), location.to_string())],
            body: Vec::new(),
        }
    }

    fn find_text<'a>(node: &'a html::Node) -> Option<&'a str> {
        if let Some(t) = node.text() {
            return Some(t);
        }
        node.children().iter().find_map(find_text)
    }

    #[test]
    fn navigates_and_finds_inline_style_rule_scenario_1() {
        let mock = MockProtocolHandler::new();
        mock.set(
            "https://a.example/",
            ok("<html><head><style>p{font-size:123em}</style></head></html>"),
        );

        let page = navigate(&mock, Url::parse("https://a.example/").unwrap(), &NavigateOptions::default()).unwrap();
        let rule = page
            .stylesheet
            .rules
            .iter()
            .find(|r| r.selectors == vec!["p".to_string()] && r.declarations.iter().any(|(id, _)| *id == css::PropertyId::FontSize))
            .unwrap();
        assert_eq!(rule.declarations, vec![(css::PropertyId::FontSize, "123em".to_string())]);
    }

    #[test]
    fn navigates_and_fetches_linked_stylesheet_scenario_2() {
        let mock = MockProtocolHandler::new();
        mock.set(
            "https://a.example/",
            ok("<html><head><link rel=stylesheet href=one.css></head></html>"),
        );
        mock.set("https://a.example/one.css", ok("p{color:green}"));

        let page = navigate(&mock, Url::parse("https://a.example/").unwrap(), &NavigateOptions::default()).unwrap();
        let rule = page
            .stylesheet
            .rules
            .iter()
            .find(|r| r.selectors == vec!["p".to_string()] && r.declarations.iter().any(|(id, _)| *id == css::PropertyId::Color))
            .unwrap();
        assert_eq!(rule.declarations, vec![(css::PropertyId::Color, "green".to_string())]);
    }

    #[test]
    fn follows_a_redirect_to_the_final_page_scenario_7() {
        let mock = MockProtocolHandler::new();
        mock.set("https://a.example/", redirect_to("/next"));
        mock.set("https://a.example/next", ok("<html><body>hi</body></html>"));

        let page = navigate(&mock, Url::parse("https://a.example/").unwrap(), &NavigateOptions::default()).unwrap();
        assert_eq!(page.uri.path(), "/next");
        let body = page.dom.body_element().unwrap();
        assert_eq!(find_text(body), Some("hi"));
    }

    #[test]
    fn eleven_redirects_fails_navigation_scenario_8() {
        let mock = MockProtocolHandler::new();
        for i in 0..11 {
            mock.set(&format!("https://a.example/{i}"), redirect_to(&format!("/{}", i + 1)));
        }
        mock.set("https://a.example/11", ok("never reached"));

        let err = navigate(&mock, Url::parse("https://a.example/0").unwrap(), &NavigateOptions::default()).unwrap_err();
        assert!(matches!(err.source, net::NetError::RedirectLimit));
    }

    #[test]
    fn concurrent_stylesheet_fetches_splice_in_issue_order_not_completion_order() {
        let mock = MockProtocolHandler::new();
        mock.set(
            "https://a.example/",
            ok("<html><head><link rel=stylesheet href=slow.css><link rel=stylesheet href=fast.css></head></html>"),
        );
        // Both resolve instantly in this mock (no real latency to race), but
        // splice order must still match document discovery order.
        mock.set("https://a.example/slow.css", ok("mark{color:red}"));
        mock.set("https://a.example/fast.css", ok("aside{color:blue}"));

        let page = navigate(&mock, Url::parse("https://a.example/").unwrap(), &NavigateOptions::default()).unwrap();
        let a_idx = page.stylesheet.rules.iter().position(|r| r.selectors == vec!["mark".to_string()]).unwrap();
        let b_idx = page.stylesheet.rules.iter().position(|r| r.selectors == vec!["aside".to_string()]).unwrap();
        assert!(a_idx < b_idx, "slow.css's rule must splice before fast.css's, regardless of fetch completion order");
    }

    #[test]
    fn failed_stylesheet_fetch_degrades_to_an_empty_sheet_rather_than_failing_navigation() {
        let mock = MockProtocolHandler::new();
        mock.set(
            "https://a.example/",
            ok("<html><head><link rel=stylesheet href=missing.css></head></html>"),
        );
        // No mock response registered for missing.css: MockProtocolHandler
        // returns NetError::Unresolved, which fetch_one_stylesheet must
        // degrade to an empty stylesheet rather than bubbling up.
        let page = navigate(&mock, Url::parse("https://a.example/").unwrap(), &NavigateOptions::default()).unwrap();
        assert!(!page.stylesheet.rules.is_empty(), "the UA stylesheet is still present");
    }
}

fn fetch_one_stylesheet(handler: &dyn ProtocolHandler, request_id: RequestId, url: &Url) -> css::Stylesheet {
    info!("[{request_id}] downloading {:?} from {url}", ResourceKind::Css);
    let (mut response, final_url) = match load(handler, url.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!("[{request_id}] error downloading {url}: {e}");
            return css::Stylesheet::default();
        }
    };

    if (final_url.scheme() == "http" || final_url.scheme() == "https") && response.status_line.code != 200 {
        warn!("[{request_id}] error {} downloading {url}", response.status_line.code);
        return css::Stylesheet::default();
    }

    if let Some(encoding) = response.header("content-encoding").map(str::to_string) {
        match net::decompress(&response.body, &encoding) {
            Ok(decoded) => response.body = decoded,
            Err(e) => {
                warn!("[{request_id}] failed decoding {url}: {e}");
                return css::Stylesheet::default();
            }
        }
    }

    css::parse_stylesheet(&tools::utf8::decode_lossy_chunked(&response.body, 8192))
}

/// §4.8 `relayout`: re-run the cascade and layout against the existing DOM
/// and stylesheet (no network I/O). The styled and layout trees borrow
/// `page.dom`/an intermediate arena, so rather than returning them (which
/// would require `page` or the arena to be self-referential) this hands
/// both to `with_result` while everything is still alive on the stack.
pub fn relayout<'a, R>(
    page: &'a PageState,
    options: &NavigateOptions,
    images: &dyn ImageSizeLookup,
    fonts: &FontCache,
    with_result: impl FnOnce(&css::StyleTree<'a>, Option<&LayoutBox<'a, '_>>) -> R,
) -> R {
    let media = options.media_context();
    let styled = css::build_style_tree(&page.dom, &page.stylesheet, &media);
    let ctx = LayoutContext { resolution: options.resolution_info() };
    let layout_tree = layout::build_layout_tree(styled.root(), images, fonts, &ctx);
    with_result(&styled, layout_tree.as_ref())
}
