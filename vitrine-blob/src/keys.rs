use rand::Rng;
use unicode_normalization::UnicodeNormalization;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 6;

fn is_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

fn is_key_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Turn an arbitrary user filename into a storage-safe key fragment.
///
/// Accents are decomposed and dropped (`é` → `e`); every other character
/// outside `[A-Za-z0-9._-]` becomes `-`.
pub fn sanitize_filename(original: &str) -> String {
    original
        .nfd()
        .filter(|c| !is_diacritic(*c))
        .map(|c| if is_key_safe(c) { c } else { '-' })
        .collect()
}

/// `{millis}-{token}-{sanitized name}`
pub fn compose_key(millis: i64, token: &str, original: &str) -> String {
    format!("{}-{}-{}", millis, token, sanitize_filename(original))
}

/// Strategy for naming uploaded objects
pub trait KeyStrategy: Send + Sync {
    fn object_key(&self, original_name: &str) -> String;
}

/// Default strategy: upload time in milliseconds plus a random base-36
/// token. Collisions are not guarded further; the backend rejects an
/// exact duplicate key.
#[derive(Debug, Clone, Default)]
pub struct TimestampKeyStrategy;

impl TimestampKeyStrategy {
    fn token() -> String {
        let mut rng = rand::thread_rng();
        (0..TOKEN_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect()
    }
}

impl KeyStrategy for TimestampKeyStrategy {
    fn object_key(&self, original_name: &str) -> String {
        compose_key(
            chrono::Utc::now().timestamp_millis(),
            &Self::token(),
            original_name,
        )
    }
}
