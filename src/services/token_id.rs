/*
 * Responsibility
 * - Single place that mints unique identifiers for `jti` and `client_id`
 * - Protocol code depends on the trait only, so the generator can be swapped
 *   (or made deterministic in tests) without touching claim assembly
 * - Implementations must provide at least 122 bits of randomness
 */
use uuid::Uuid;

pub trait TokenIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUID v4 (122 random bits), hyphenated lower-case form.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidV4Generator;

impl TokenIdGenerator for UuidV4Generator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<T: TokenIdGenerator + ?Sized> TokenIdGenerator for &T {
    fn generate(&self) -> String {
        (**self).generate()
    }
}

impl<T: TokenIdGenerator + ?Sized> TokenIdGenerator for std::sync::Arc<T> {
    fn generate(&self) -> String {
        (**self).generate()
    }
}
