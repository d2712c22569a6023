//! Serializable freeze/restore of the Store plus bound context, and the script-tag
//! escaping helper for embedding a snapshot in server-rendered HTML.

use serde::{Deserialize, Serialize};

use crate::entry::ConfigEntry;
use crate::value::Context;

/// The global name the embeddable-script helper assigns into. Stable across versions.
pub const SNAPSHOT_GLOBAL: &str = "__DYNCONF_SNAPSHOT__";

/// A freeze of a client's Store plus its bound context. Intentionally identical in
/// shape to the initial-load wire format, so a restored client is indistinguishable
/// from one that just initialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub configs: Vec<ConfigEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

impl Snapshot {
    pub fn new(configs: Vec<ConfigEntry>, context: Option<Context>) -> Self {
        Self { configs, context }
    }

    /// Renders the snapshot as a payload suitable for inlining in server-rendered
    /// HTML: an assignment to [`SNAPSHOT_GLOBAL`]. Any case-insensitive `</script`
    /// sequence inside the serialized payload is escaped so a string value under
    /// attacker control can't break out of the script context.
    pub fn to_embeddable_script(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        let escaped = escape_script_close_tags(&json);
        Ok(format!("window.{SNAPSHOT_GLOBAL} = {escaped};"))
    }
}

/// Escapes every case-insensitive occurrence of `</script` in `json` by splitting the
/// forward slash out of the HTML parser's closing-tag token, e.g. `<\/script`. This is
/// deliberately narrow (not a general HTML escaper): it only has to defeat the
/// `</script>` sequence, because that's the only way embedded JSON can escape a
/// `<script>` block.
fn escape_script_close_tags(json: &str) -> String {
    const NEEDLE: &str = "</script";
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut i = 0;
    while i < chars.len() {
        let window_matches = i + NEEDLE.len() <= chars.len()
            && chars[i..i + NEEDLE.len()]
                .iter()
                .zip(NEEDLE.chars())
                .all(|(a, b)| a.eq_ignore_ascii_case(&b));

        if window_matches {
            out.push_str("<\\/");
            out.extend(chars[i + 1..i + NEEDLE.len()].iter().copied());
            i += NEEDLE.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}
