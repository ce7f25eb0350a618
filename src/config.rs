use web_sys::{Element, UrlSearchParams};

const API_DEBUG_KEY: &str = "zaseki.debug.api_base";
const ENDPOINT_ATTR: &str = "data-endpoint";
const PLAYER_ATTR: &str = "data-player-id";
const PLAY_PATH: &str = "play_card";

/// Board configuration resolved once at load. A missing endpoint selects the
/// local commit adapter.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BoardConfig {
    pub(crate) api_base: Option<String>,
    pub(crate) player_id: Option<String>,
}

pub(crate) fn load_board_config(root: Option<&Element>) -> BoardConfig {
    let api_base = load_api_base(root);
    let player_id = root
        .and_then(|element| element.get_attribute(PLAYER_ATTR))
        .and_then(|raw| non_empty(&raw));
    BoardConfig {
        api_base,
        player_id,
    }
}

/// Resolution order: compile-time override, localStorage debug key, `?api=`
/// query parameter, `data-endpoint` attribute on the board root.
fn load_api_base(root: Option<&Element>) -> Option<String> {
    if let Some(raw) = option_env!("ZASEKI_API_BASE").or(option_env!("TRUNK_PUBLIC_ZASEKI_API_BASE"))
    {
        if let Some(base) = normalize_api_base(raw) {
            return Some(base);
        }
    }
    if let Some(raw) = read_storage_value(API_DEBUG_KEY) {
        if let Some(base) = normalize_api_base(&raw) {
            return Some(base);
        }
    }
    if let Some(raw) = load_api_base_from_query() {
        if let Some(base) = normalize_api_base(&raw) {
            return Some(base);
        }
    }
    root.and_then(|element| element.get_attribute(ENDPOINT_ATTR))
        .and_then(|raw| normalize_api_base(&raw))
}

pub(crate) fn play_endpoint(api_base: &str) -> String {
    let base = api_base.trim_end_matches('/');
    format!("{base}/{PLAY_PATH}")
}

pub(crate) fn normalize_api_base(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.trim_end_matches('/').to_string())
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn read_storage_value(key: &str) -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    storage.get_item(key).ok()?
}

fn load_api_base_from_query() -> Option<String> {
    let window = web_sys::window()?;
    let search = window.location().search().ok()?;
    let search = search.trim();
    if search.is_empty() {
        return None;
    }
    let params = UrlSearchParams::new_with_str(search).ok()?;
    params.get("api").or_else(|| params.get("api_base"))
}
