//! Canonical AU identifiers.
//!
//! An AUID is built from a plugin identifier and the defining parameters:
//!
//! ```text
//! org.lockss.plugin.Foo + {year: 2001, base_url: http://x/}
//!   => org|lockss|plugin|Foo&base_url~http%3A%2F%2Fx%2F&year~2001
//! ```
//!
//! AUIDPLUS additionally appends the non-defining parameters, each preceded
//! by [`NONDEF_SEPARATOR`].

/// Marker placed before each non-defining parameter in an AUIDPLUS.
pub const NONDEF_SEPARATOR: &str = "@@@NONDEF@@@";

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encode one key or value.
///
/// ASCII alphanumerics and `-`, `_`, `*` pass through, a space becomes `+`,
/// and every other byte of the UTF-8 encoding becomes `%XX`.
pub fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'*' => out.push(b as char),
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(HEX[usize::from(b >> 4)] as char);
                out.push(HEX[usize::from(b & 0x0f)] as char);
            }
        }
    }
    out
}

/// Compute the AUID for `plugin` and its defining parameters.
///
/// Parameter order is irrelevant: pairs are sorted by key before encoding.
pub fn auid<I, K, V>(plugin: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = plugin.replace('.', "|");
    for (key, value) in sorted(params) {
        out.push('&');
        push_pair(&mut out, &key, &value);
    }
    out
}

/// Compute the AUIDPLUS: the AUID followed by the non-defining parameters.
///
/// With no non-defining parameters the result equals [`auid`] exactly.
pub fn auidplus<I, J, K, V, K2, V2>(plugin: &str, params: I, nondef_params: J) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    J: IntoIterator<Item = (K2, V2)>,
    K2: AsRef<str>,
    V2: AsRef<str>,
{
    let mut out = auid(plugin, params);
    for (key, value) in sorted(nondef_params) {
        out.push_str(NONDEF_SEPARATOR);
        push_pair(&mut out, &key, &value);
    }
    out
}

fn sorted<I, K, V>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();
    pairs.sort();
    pairs
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(&encode(key));
    out.push('~');
    out.push_str(&encode(value));
}
